// src/db/medicine_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::{auth::ALL_CLINICS, stock::Medicine},
};

#[derive(Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Reads (run on the shared pool)
    // ---

    /// All medicines visible under a clinic filter, in insertion order.
    /// The "All" sentinel returns the union across clinics.
    pub async fn list(&self, clinic_filter: &str) -> Result<Vec<Medicine>, AppError> {
        let medicines = if clinic_filter == ALL_CLINICS {
            sqlx::query_as::<_, Medicine>("SELECT * FROM medicines ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, Medicine>(
                "SELECT * FROM medicines WHERE clinic = ?1 ORDER BY id ASC",
            )
            .bind(clinic_filter)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(medicines)
    }

    // ---
    // Transactional operations (take an executor so they compose with the
    // ledger append inside one transaction)
    // ---

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Medicine>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let medicine = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(medicine)
    }

    /// Inserts a new batch. Receiving never merges into an existing batch
    /// with the same drug/batch number; every receive is its own row.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        clinic: &str,
        drug_name: &str,
        generic_name: Option<&str>,
        strength: Option<&str>,
        batch_no: &str,
        expiry_date: NaiveDate,
        quantity: i64,
        low_stock_threshold: i64,
    ) -> Result<Medicine, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            INSERT INTO medicines
                (clinic, drug_name, generic_name, strength, batch_no,
                 expiry_date, quantity, low_stock_threshold, date_added)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING *
            "#,
        )
        .bind(clinic)
        .bind(drug_name)
        .bind(generic_name)
        .bind(strength)
        .bind(batch_no)
        .bind(expiry_date)
        .bind(quantity)
        .bind(low_stock_threshold)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(medicine)
    }

    /// Conditional decrement: the store itself refuses to take quantity below
    /// zero, so two concurrent issuers cannot both win a race. Returns the
    /// number of rows changed; 0 means the stock was insufficient (or the id
    /// does not exist) and nothing was written.
    pub async fn decrement_quantity<'e, E>(
        &self,
        executor: E,
        id: i64,
        quantity: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE medicines SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?1",
        )
        .bind(quantity)
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
