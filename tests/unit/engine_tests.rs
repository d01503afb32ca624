// Engine tests against real image files on disk

use std::sync::Arc;

use image::ImageFormat;
use rstest::rstest;

use mockup::catalog::NotFound;
use mockup::engine::{DesignInput, Engine};
use mockup::error::ServiceError;
use mockup::imaging::{self, HttpImageLoader, ImageLoaderConfig, ImagingError};

use super::support::{rgb_at, solid, CountingLoader, Fixture, TEMPLATE_GRAY};

fn engine() -> Engine {
    Engine::new(Arc::new(
        HttpImageLoader::new(ImageLoaderConfig::default()).unwrap(),
    ))
}

fn named(name: &str) -> DesignInput {
    DesignInput::Named(name.to_string())
}

#[tokio::test]
async fn test_black_square_scenario() {
    let fixture = Fixture::new();
    let encoded = engine()
        .paste(&fixture.catalog(), "shirt-front", "chest", &named("black-square"))
        .await
        .unwrap();

    let result = imaging::decode(&encoded).unwrap();
    assert_eq!(result.format, ImageFormat::Png);
    assert_eq!((result.image.width(), result.image.height()), (800, 1000));

    for (x, y) in [(300, 200), (499, 200), (300, 399), (499, 399), (400, 300)] {
        assert_eq!(rgb_at(&result.image, x, y), [0, 0, 0], "inside at {x},{y}");
    }
    for (x, y) in [(299, 200), (500, 200), (300, 199), (300, 400), (0, 0)] {
        assert_eq!(
            rgb_at(&result.image, x, y),
            [TEMPLATE_GRAY; 3],
            "outside at {x},{y}"
        );
    }
}

#[tokio::test]
async fn test_white_square_scenario() {
    let fixture = Fixture::new();
    let encoded = engine()
        .paste(&fixture.catalog(), "shirt-front", "chest", &named("white-square"))
        .await
        .unwrap();

    let result = imaging::decode(&encoded).unwrap();
    assert_eq!(
        result.image.to_rgb8(),
        solid(800, 1000, TEMPLATE_GRAY).to_rgb8()
    );
}

#[rstest]
#[case("shirt-front", [0, 0, 0])]
#[case("shirt-negative", [255, 255, 255])]
#[tokio::test]
async fn test_negative_flag(#[case] template: &str, #[case] expected: [u8; 3]) {
    let fixture = Fixture::new();
    let result = engine()
        .paste_image(&fixture.catalog(), template, "chest", &named("black-square"))
        .await
        .unwrap();

    assert_eq!(rgb_at(&result.image, 400, 300), expected);
}

#[tokio::test]
async fn test_aspect_ratio_height_is_used() {
    let fixture = Fixture::new();
    let result = engine()
        .paste_image(&fixture.catalog(), "shirt-front", "pocket", &named("black-square"))
        .await
        .unwrap();

    // pocket: 100 wide, ratio 2:3 -> 150 high
    assert_eq!(rgb_at(&result.image, 100, 249), [0, 0, 0]);
    assert_eq!(rgb_at(&result.image, 100, 250), [TEMPLATE_GRAY; 3]);
}

#[tokio::test]
async fn test_paste_twice_is_identical() {
    let fixture = Fixture::new();
    let catalog = fixture.catalog();
    let engine = engine();

    let first = engine
        .paste(&catalog, "shirt-front", "chest", &named("black-square"))
        .await
        .unwrap();
    let second = engine
        .paste(&catalog, "shirt-front", "chest", &named("black-square"))
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_inline_design() {
    let fixture = Fixture::new();
    let inline = imaging::encode(&solid(8, 8, 0), ImageFormat::Png).unwrap();
    let data_uri = format!("data:image/png;base64,{}", inline);

    let result = engine()
        .paste_image(
            &fixture.catalog(),
            "shirt-front",
            "chest",
            &DesignInput::Inline(data_uri),
        )
        .await
        .unwrap();

    assert_eq!(rgb_at(&result.image, 300, 200), [0, 0, 0]);
}

#[rstest]
#[case("nope", "chest", "black-square", NotFound::Template("nope".to_string()))]
#[case(
    "shirt-front",
    "sleeve",
    "black-square",
    NotFound::Position { template: "shirt-front".to_string(), position: "sleeve".to_string() }
)]
#[case("shirt-front", "chest", "nope", NotFound::Design("nope".to_string()))]
#[tokio::test]
async fn test_lookup_misses_load_nothing(
    #[case] template: &str,
    #[case] position: &str,
    #[case] design: &str,
    #[case] expected: NotFound,
) {
    let fixture = Fixture::new();
    let loader = CountingLoader::new();
    let engine = Engine::new(loader.clone());

    let err = engine
        .paste(&fixture.catalog(), template, position, &named(design))
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::NotFound(expected));
    assert_eq!(loader.calls(), 0);
}

#[tokio::test]
async fn test_outline_miss_loads_nothing() {
    let fixture = Fixture::new();
    let loader = CountingLoader::new();

    let err = Engine::new(loader.clone())
        .outline(&fixture.catalog(), "shirt-front", "sleeve")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(loader.calls(), 0);
}

#[tokio::test]
async fn test_missing_template_file_is_load_error() {
    let fixture = Fixture::new();
    let err = engine()
        .outline(&fixture.catalog(), "missing-file", "chest")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Imaging(ImagingError::Load(_))));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_outline_output() {
    let fixture = Fixture::new();
    let encoded = engine()
        .outline(&fixture.catalog(), "shirt-front", "chest")
        .await
        .unwrap();

    let result = imaging::decode(&encoded).unwrap();
    assert_eq!(rgb_at(&result.image, 300, 200), [255, 121, 0]);
    assert_eq!(rgb_at(&result.image, 497, 397), [255, 121, 0]);
    assert_ne!(rgb_at(&result.image, 400, 300), [TEMPLATE_GRAY; 3]);
    assert_ne!(rgb_at(&result.image, 400, 300), [255, 121, 0]);
    assert_eq!(rgb_at(&result.image, 500, 400), [TEMPLATE_GRAY; 3]);
}
