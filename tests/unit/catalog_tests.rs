// Catalog loading and tenant selection tests

use mockup::catalog::{
    AccessError, CatalogError, CatalogSource, CatalogStore, FileCatalogSource, NotFound,
};
use mockup::config::Config;

use super::support::Fixture;

#[tokio::test]
async fn test_file_catalog_resolves_positions() {
    let fixture = Fixture::new();
    let path = fixture.write_catalog("catalog.yaml");

    let catalog = FileCatalogSource::new(&path).load().await.unwrap();
    let template = catalog.resolve_template("shirt-front").unwrap();

    let chest = catalog.resolve_position(template, "chest").unwrap();
    assert_eq!((chest.left, chest.top, chest.width, chest.height), (300, 200, 200, 200));

    let pocket = catalog.resolve_position(template, "pocket").unwrap();
    assert_eq!((pocket.width, pocket.height), (100, 150));
}

#[tokio::test]
async fn test_position_requires_its_own_template() {
    let fixture = Fixture::new();
    let catalog = fixture.catalog();
    let negative = catalog.resolve_template("shirt-negative").unwrap();

    assert_eq!(
        catalog.resolve_position(negative, "pocket").unwrap_err(),
        NotFound::Position {
            template: "shirt-negative".to_string(),
            position: "pocket".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unparseable_catalog_file() {
    let fixture = Fixture::new();
    let path = fixture.path("broken.yaml");
    std::fs::write(&path, "templates: [ { name: x").unwrap();

    let err = FileCatalogSource::new(&path).load().await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse { .. }));
}

#[tokio::test]
async fn test_store_from_multi_tenant_config() {
    let fixture = Fixture::new();
    let acme = fixture.write_catalog("acme.yaml");
    let globex = fixture.path("globex.json");
    std::fs::write(&globex, r#"{"templates":[]}"#).unwrap();

    let yaml = format!(
        r#"
tenants:
  - name: acme
    api_key: acme-key
    catalog: {{ type: file, path: "{}" }}
  - name: globex
    api_key: globex-key
    catalog: {{ type: file, path: "{}" }}
"#,
        acme.display(),
        globex.display()
    );
    let config = Config::from_yaml_with_env(&yaml).unwrap();
    config.validate().unwrap();

    let store = CatalogStore::load(&config, &reqwest::Client::new())
        .await
        .unwrap();

    assert!(store.is_multi_tenant());
    assert_eq!(store.tenant_count(), 2);

    let selected = store.catalog_for(Some("acme-key")).unwrap();
    assert_eq!(selected.tenant, "acme");
    assert!(selected.catalog.resolve_template("shirt-front").is_ok());

    let globex = store.catalog_for(Some("globex-key")).unwrap();
    assert!(globex.catalog.templates.is_empty());

    assert_eq!(store.catalog_for(None).unwrap_err(), AccessError::MissingApiKey);
    assert_eq!(
        store.catalog_for(Some("nope")).unwrap_err(),
        AccessError::InvalidApiKey
    );
}
