// Configuration module tests

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use mockup::config::*;

#[test]
fn test_full_config_example() {
    std::env::set_var("MOCKUP_UNIT_ACME_KEY", "acme-secret");
    std::env::set_var("MOCKUP_UNIT_STORE_TOKEN", "store-secret");

    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 9000
  threads: 2
  max_body_size: 2048
fetch:
  timeout_seconds: 5
tenants:
  - name: acme
    api_key: ${MOCKUP_UNIT_ACME_KEY}
    catalog:
      type: remote
      url: https://store.example.com/catalogs/acme
      token: ${MOCKUP_UNIT_STORE_TOKEN}
  - name: local
    api_key: local-key
    catalog:
      type: file
      path: ./catalogs/local.yaml
"#;

    let config = Config::from_yaml_with_env(yaml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.server.listen_addr(), "127.0.0.1:9000");
    assert_eq!(config.server.threads, 2);
    assert_eq!(config.server.max_body_size, 2048);
    assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
    assert!(config.is_multi_tenant());

    assert_eq!(config.tenants[0].api_key, "acme-secret");
    assert_eq!(
        config.tenants[0].catalog,
        CatalogSourceConfig::Remote {
            url: "https://store.example.com/catalogs/acme".to_string(),
            token: Some("store-secret".to_string()),
        }
    );
    assert_eq!(
        config.tenants[1].catalog,
        CatalogSourceConfig::File {
            path: PathBuf::from("./catalogs/local.yaml")
        }
    );
}

#[test]
fn test_defaults_apply_to_single_tenant_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"catalog: { type: file, path: catalog.yaml }\n")
        .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.threads, 4);
    assert_eq!(config.server.max_body_size, 10 * 1024 * 1024);
    assert_eq!(config.fetch.timeout_seconds, 30);
    assert!(!config.is_multi_tenant());
}

#[test]
fn test_validate_rejects_duplicate_tenant_names() {
    let yaml = r#"
tenants:
  - { name: acme, api_key: a, catalog: { type: file, path: a.yaml } }
  - { name: acme, api_key: b, catalog: { type: file, path: b.yaml } }
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("Duplicate tenant"));
}

#[test]
fn test_validate_rejects_empty_api_key() {
    let yaml = r#"
tenants:
  - { name: acme, api_key: "", catalog: { type: file, path: a.yaml } }
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("empty api_key"));
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let yaml = r#"
server:
  port: [invalid syntax here}
"#;
    assert!(Config::from_yaml_with_env(yaml).is_err());
}
