// src/db/transaction_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::{
        auth::ALL_CLINICS,
        stock::{TransactionEvent, TransactionType},
    },
};

/// The ledger. Insert-only by construction: this repository exposes no
/// update or delete, and the schema has no path that mutates a row.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends one event with a server-assigned id and timestamp. Callers
    /// pass the transaction's executor so the append commits (or rolls back)
    /// together with the quantity change it records.
    #[allow(clippy::too_many_arguments)]
    pub async fn record<'e, E>(
        &self,
        executor: E,
        clinic: &str,
        drug_id: i64,
        kind: TransactionType,
        quantity: i64,
        patient_name: Option<&str>,
        remarks: Option<&str>,
    ) -> Result<TransactionEvent, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if quantity <= 0 {
            return Err(AppError::NonPositiveQuantity);
        }

        let event = sqlx::query_as::<_, TransactionEvent>(
            r#"
            INSERT INTO transactions
                (clinic, drug_id, type, quantity, patient_name, remarks, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(clinic)
        .bind(drug_id)
        .bind(kind)
        .bind(quantity)
        .bind(patient_name)
        .bind(remarks)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(event)
    }

    pub async fn list(&self, clinic_filter: &str) -> Result<Vec<TransactionEvent>, AppError> {
        let events = if clinic_filter == ALL_CLINICS {
            sqlx::query_as::<_, TransactionEvent>("SELECT * FROM transactions ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, TransactionEvent>(
                "SELECT * FROM transactions WHERE clinic = ?1 ORDER BY id ASC",
            )
            .bind(clinic_filter)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(events)
    }

    pub async fn list_for_drug(&self, drug_id: i64) -> Result<Vec<TransactionEvent>, AppError> {
        let events = sqlx::query_as::<_, TransactionEvent>(
            "SELECT * FROM transactions WHERE drug_id = ?1 ORDER BY id ASC",
        )
        .bind(drug_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
