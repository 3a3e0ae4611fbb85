//! Image classification HTTP service.
//!
//! # Usage
//!
//! ```bash
//! imgcls-server \
//!     --model-path models/resnet50.onnx \
//!     --labels-path models/imagenet_classes.txt \
//!     --port 5000
//! ```
//!
//! Settings can also come from a JSON file; flags override the file:
//!
//! ```bash
//! imgcls-server --config service.json --database-url postgresql://user:password@db:5432/mydatabase
//! ```

use clap::Parser;
use imgcls::core::{
    ConfigValidator, LabelSource, PersistencePolicy, PostgresConfig, ServiceConfig,
    StorageBackend, init_tracing,
};
use imgcls::server::{self, AppState};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for the classification service.
#[derive(Parser, Debug)]
#[command(name = "imgcls-server")]
#[command(about = "Classify uploaded images with a frozen ImageNet model")]
struct Args {
    /// JSON configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the ONNX export of the classifier.
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Local label file, one class name per line.
    #[arg(long, conflicts_with = "labels_url")]
    labels_path: Option<PathBuf>,

    /// URL of the label file, fetched once at startup.
    #[arg(long)]
    labels_url: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Postgres URL. Predictions are recorded when set.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// `fail_request` or `log_and_continue`.
    #[arg(long)]
    persistence_policy: Option<PersistencePolicy>,

    /// Number of ONNX Runtime sessions serving requests.
    #[arg(long)]
    session_pool_size: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(model_path) = self.model_path {
            config.model_path = model_path;
        }
        if let Some(path) = self.labels_path {
            config.labels = LabelSource::Path(path);
        }
        if let Some(url) = self.labels_url {
            config.labels = LabelSource::Url(url);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.database_url {
            let pool_max = match &config.storage {
                StorageBackend::Postgres(pg) => pg.pool_max,
                _ => PostgresConfig::default_pool_max(),
            };
            config.storage = StorageBackend::Postgres(PostgresConfig {
                db_url: url,
                pool_max,
            });
        }
        if let Some(policy) = self.persistence_policy {
            config.persistence_policy = policy;
        }
        if let Some(size) = self.session_pool_size {
            config.session_pool_size = size;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Args::parse().into_config()?;
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    info!(
        model = %config.model_path.display(),
        policy = ?config.persistence_policy,
        "starting image classification service"
    );

    let pipeline = server::load_pipeline(&config).await?;
    let app = server::build_app(AppState::new(pipeline), config.max_upload_bytes);
    server::serve(app, &config.bind_address()).await?;

    Ok(())
}
