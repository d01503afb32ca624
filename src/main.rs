use anyhow::{anyhow, Context};
use clap::Parser;
use pingora::server::configuration::Opt;
use pingora::server::Server;
use std::path::PathBuf;
use std::sync::Arc;

use mockup::catalog::CatalogStore;
use mockup::config::Config;
use mockup::engine::Engine;
use mockup::imaging::{HttpImageLoader, ImageLoaderConfig};
use mockup::server::{build_service, AppState};

/// Mockup - composites designs onto product template images
#[derive(Parser, Debug)]
#[command(name = "mockup")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Load configuration and catalogs, then exit
    #[arg(long)]
    test: bool,
}

fn main() {
    if let Err(e) = mockup::logging::init_subscriber() {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        std::process::exit(1);
    }

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!(error = %format!("{:#}", e), "Startup failed");
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_file(&args.config)
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        threads = config.server.threads,
        multi_tenant = config.is_multi_tenant(),
        tenants = config.tenants.len(),
        fetch_timeout_seconds = config.fetch.timeout_seconds,
        "Configuration loaded successfully"
    );

    // Catalogs are loaded once, on a runtime that only lives for startup
    let store = {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create startup runtime")?;
        let http_client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .context("Failed to create HTTP client")?;
        runtime
            .block_on(CatalogStore::load(&config, &http_client))
            .context("Failed to load catalogs")?
    };

    tracing::info!(
        tenants = store.tenant_count(),
        multi_tenant = store.is_multi_tenant(),
        "Catalogs ready"
    );

    if args.test {
        tracing::info!("Configuration test successful");
        return Ok(());
    }

    let loader = HttpImageLoader::new(ImageLoaderConfig {
        timeout: config.fetch_timeout(),
    })?;
    let state = AppState::new(Arc::new(store), Engine::new(Arc::new(loader)));

    let opt = Opt {
        daemon: args.daemon,
        ..Default::default()
    };

    let mut server =
        Server::new(Some(opt)).map_err(|e| anyhow!("Failed to create Pingora server: {}", e))?;
    server.bootstrap();

    let service = build_service(&config.server, state);

    tracing::info!(
        address = %config.server.listen_addr(),
        "Starting Mockup API"
    );

    server.add_service(service);
    server.run_forever()
}
