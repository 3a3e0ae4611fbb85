//! Postgres prediction storage.
//!
//! The `predictions` table is created on connect if it does not exist yet.

use super::{NewPrediction, PredictionId, PredictionSink};
use crate::core::{ClassifierError, ClassifierResult, PostgresConfig};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use std::str::FromStr;
use tokio_postgres::NoTls;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS predictions (
        id SERIAL PRIMARY KEY,
        image_name VARCHAR(120) NOT NULL,
        predicted_class VARCHAR(120) NOT NULL,
        confidence_score DOUBLE PRECISION NOT NULL
    );";

const INSERT_PREDICTION: &str = "
    INSERT INTO predictions (image_name, predicted_class, confidence_score)
    VALUES ($1, $2, $3)
    RETURNING id";

/// Writes prediction records through a pooled Postgres connection.
pub struct PostgresPredictionSink {
    pool: Pool,
}

impl std::fmt::Debug for PostgresPredictionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresPredictionSink")
            .field("pool_max", &self.pool.status().max_size)
            .finish()
    }
}

impl PostgresPredictionSink {
    /// Connects to the database and ensures the schema exists.
    pub async fn connect(config: &PostgresConfig) -> ClassifierResult<Self> {
        let pg_config = tokio_postgres::Config::from_str(config.db_url.as_str())
            .map_err(|e| ClassifierError::storage("invalid postgres connection url", e))?;
        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(pg_config, NoTls, mgr_config);
        let pool = Pool::builder(mgr)
            .max_size(config.pool_max)
            .build()
            .map_err(|e| ClassifierError::storage("failed to build postgres pool", e))?;

        let sink = Self { pool };
        sink.initialize_schema().await?;
        Ok(sink)
    }

    async fn initialize_schema(&self) -> ClassifierResult<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| ClassifierError::storage("failed to acquire postgres connection", e))?;
        client
            .batch_execute(CREATE_TABLE)
            .await
            .map_err(|e| ClassifierError::storage("failed to create predictions table", e))?;
        Ok(())
    }
}

#[async_trait]
impl PredictionSink for PostgresPredictionSink {
    async fn record(&self, prediction: NewPrediction) -> ClassifierResult<PredictionId> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| ClassifierError::storage("failed to acquire postgres connection", e))?;
        let row = client
            .query_one(
                INSERT_PREDICTION,
                &[
                    &prediction.image_name,
                    &prediction.predicted_class,
                    &f64::from(prediction.confidence_score),
                ],
            )
            .await
            .map_err(|e| ClassifierError::storage("failed to insert prediction", e))?;
        let id: i32 = row.get(0);
        Ok(PredictionId::from(id))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
