// src/config.rs

use std::{env, path::Path, sync::Arc, time::Duration};

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::{
    db::{MedicineRepository, TransactionRepository},
    services::{
        auth::{AuthService, StaticCredentialStore},
        stock_service::StockService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub stock_service: StockService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:inventory.db?mode=rwc".into());
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let credentials_file =
            env::var("CREDENTIALS_FILE").unwrap_or_else(|_| "credentials.json".into());

        // The acquire timeout doubles as the request timeout at the store
        // boundary: a stuck database fails the action instead of hanging it.
        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Database connection established");

        // Credentials are fixed configuration, loaded once and never mutated.
        let credential_store = StaticCredentialStore::from_file(Path::new(&credentials_file))?;
        let auth_service = AuthService::new(Arc::new(credential_store), jwt_secret);

        let medicine_repo = MedicineRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let stock_service = StockService::new(medicine_repo, transaction_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            stock_service,
        })
    }
}
