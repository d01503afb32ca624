// Logging tests: subscriber initialization

use mockup::logging::{init_subscriber, LogFormat};

#[test]
fn test_can_initialize_tracing_subscriber() {
    let result = init_subscriber();
    assert!(
        result.is_ok(),
        "Tracing subscriber initialization should succeed, got error: {:?}",
        result.err()
    );

    // A second call finds the subscriber already installed
    assert!(init_subscriber().is_ok());

    tracing::info!(request_id = "test", "Structured event after init");
}

#[test]
fn test_default_format_is_json() {
    assert_eq!(LogFormat::parse(None), LogFormat::Json);
}
