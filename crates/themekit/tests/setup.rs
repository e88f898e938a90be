use std::{fs, path::Path, sync::Arc};

use async_trait::async_trait;
use serial_test::serial;
use tempfile::TempDir;
use themekit::{
    cli::{execute, Commands},
    config::{ConfigManager, Environment},
    http::{shared_client, HttpClientTrait, HttpConfig, HttpError},
    registry::{DEFAULT_REGISTRY_URL, DEV_REGISTRY_URL},
    stores::ThemeStore,
    ModuleError, ThemesModule,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const MANIFEST: &str = r#"{
    "journal": {
        "url": "https://themes.example.com/journal.zip",
        "version": "2.0.1",
        "description": "Long-form writing"
    },
    "minimal": {"url": "https://themes.example.com/minimal.zip"}
}"#;

/// Client for tests that must not touch the network
struct OfflineClient;

#[async_trait]
impl HttpClientTrait for OfflineClient {
    async fn get_bytes(&self, url: &str) -> themekit::http::Result<Vec<u8>> {
        Err(HttpError::InvalidUrl(format!("offline: {}", url)))
    }
}

fn write_config(data_dir: &Path, body: &str) {
    fs::write(data_dir.join("themekit.toml"), body).unwrap();
}

fn add_theme(root: &Path, name: &str, files: &[&str]) {
    for file in files {
        let path = root.join(name).join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }
}

async fn mock_registry() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/registry.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
#[serial]
async fn test_setup_wires_stores_and_syncs_registry() {
    let server = mock_registry().await;
    let data = TempDir::new().unwrap();
    write_config(
        data.path(),
        &format!(
            "[themes]\npath = \"custom\"\nregistry_url = \"{}/registry.json\"\n",
            server.uri()
        ),
    );
    add_theme(&data.path().join("custom"), "blog", &["page.html", "assets/site.css"]);
    add_theme(&data.path().join("internal_themes"), "admin", &["index.html"]);

    let config = ConfigManager::new(data.path()).with_environment(Environment::Production);
    let client = shared_client(HttpConfig::registry()).unwrap();
    let module = ThemesModule::setup(&config, client).await.unwrap();

    assert_eq!(module.theme_store().root(), data.path().join("custom"));
    assert_eq!(module.internal_store().root(), data.path().join("internal_themes"));
    assert_eq!(module.stores().len(), 3);

    let names = module.stores().list().await.unwrap();
    assert_eq!(names.as_slice(), &["basic", "blog", "admin"]);
    assert_eq!(module.stores().get("blog").await.unwrap().origin, "themes");
    assert_eq!(module.stores().get("admin").await.unwrap().origin, "internal");

    assert_eq!(module.registry_url(), format!("{}/registry.json", server.uri()));
    assert!(module.registry().is_synced());
    assert_eq!(module.registry().names(), vec!["journal", "minimal"]);
}

#[tokio::test]
#[serial]
async fn test_setup_survives_failed_sync() {
    let data = TempDir::new().unwrap();
    let config = ConfigManager::new(data.path()).with_environment(Environment::Production);

    let module = ThemesModule::setup(&config, Arc::new(OfflineClient))
        .await
        .unwrap();

    assert!(!module.registry().is_synced());
    assert!(module.registry().manifest().is_empty());
    // Default themes directory is created under the data dir
    assert!(data.path().join("themes").is_dir());
    assert!(module.stores().exists("basic").await);
}

#[tokio::test]
#[serial]
async fn test_registry_url_follows_environment() {
    let data = TempDir::new().unwrap();

    let dev = ConfigManager::new(data.path()).with_environment(Environment::Development);
    let module = ThemesModule::setup(&dev, Arc::new(OfflineClient)).await.unwrap();
    assert_eq!(module.registry_url(), DEV_REGISTRY_URL);

    let prod = ConfigManager::new(data.path()).with_environment(Environment::Production);
    let module = ThemesModule::setup(&prod, Arc::new(OfflineClient)).await.unwrap();
    assert_eq!(module.registry_url(), DEFAULT_REGISTRY_URL);

    write_config(
        data.path(),
        "[themes]\nregistry_url = \"https://mirror.example.com/registry.json\"\n",
    );
    let module = ThemesModule::setup(&dev, Arc::new(OfflineClient)).await.unwrap();
    assert_eq!(module.registry_url(), "https://mirror.example.com/registry.json");
}

#[tokio::test]
#[serial]
async fn test_invalid_config_is_fatal() {
    let data = TempDir::new().unwrap();
    write_config(data.path(), "[themes]\nregistry_url = \"ftp://example.com/r.json\"\n");
    let config = ConfigManager::new(data.path());

    let err = ThemesModule::setup(&config, Arc::new(OfflineClient))
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::Config(_)));

    write_config(data.path(), "[themes\npath = ");
    let err = ThemesModule::setup(&config, Arc::new(OfflineClient))
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::Config(_)));
}

#[tokio::test]
#[serial]
async fn test_unusable_theme_root_is_fatal() {
    let data = TempDir::new().unwrap();
    fs::write(data.path().join("not-a-dir"), "file").unwrap();
    write_config(data.path(), "[themes]\npath = \"not-a-dir\"\n");
    let config = ConfigManager::new(data.path());

    let err = ThemesModule::setup(&config, Arc::new(OfflineClient))
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::Store(_)));
}

#[tokio::test]
#[serial]
async fn test_cli_commands() {
    let server = mock_registry().await;
    let data = TempDir::new().unwrap();
    write_config(
        data.path(),
        &format!("[themes]\nregistry_url = \"{}/registry.json\"\n", server.uri()),
    );
    add_theme(&data.path().join("themes"), "blog", &["page.html"]);

    let config = ConfigManager::new(data.path());
    let client = shared_client(HttpConfig::registry()).unwrap();
    let module = ThemesModule::setup(&config, client).await.unwrap();

    let listed = execute(&Commands::List, &module).await.unwrap();
    let lines: Vec<_> = listed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("basic") && lines[0].ends_with("default"));
    assert!(lines[1].starts_with("blog") && lines[1].ends_with("themes"));

    let shown = execute(
        &Commands::Show {
            name: "blog".to_string(),
        },
        &module,
    )
    .await
    .unwrap();
    assert!(shown.starts_with("blog (themes, 1 file(s))"));
    assert!(shown.contains("  page.html"));

    let missing = execute(
        &Commands::Show {
            name: "nope".to_string(),
        },
        &module,
    )
    .await;
    assert!(missing.is_err());

    let found = execute(
        &Commands::Search {
            query: "writing".to_string(),
        },
        &module,
    )
    .await
    .unwrap();
    assert!(found.starts_with("journal"));

    let manifest = execute(&Commands::Registry, &module).await.unwrap();
    assert!(manifest.contains("2.0.1"));
    assert!(manifest.contains("https://themes.example.com/minimal.zip"));

    let url = execute(&Commands::Url, &module).await.unwrap();
    assert_eq!(url.trim(), format!("{}/registry.json", server.uri()));
}
