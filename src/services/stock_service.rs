// src/services/stock_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{MedicineRepository, TransactionRepository},
    models::{
        auth::CurrentUser,
        stock::{
            ClassifiedMedicine, IssueStockPayload, Medicine, ReceiveStockPayload, StockStatus,
            StockSummary, TransactionEvent, TransactionType,
        },
    },
    services::classifier::classify,
};

#[derive(Clone)]
pub struct StockService {
    medicine_repo: MedicineRepository,
    transaction_repo: TransactionRepository,
    pool: SqlitePool,
}

impl StockService {
    pub fn new(
        medicine_repo: MedicineRepository,
        transaction_repo: TransactionRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            medicine_repo,
            transaction_repo,
            pool,
        }
    }

    // --- CURRENT STOCK (classified view) ---

    pub async fn current_stock(&self, scope: &str) -> Result<Vec<ClassifiedMedicine>, AppError> {
        self.current_stock_at(scope, Utc::now().date_naive()).await
    }

    /// Same as `current_stock` but against an explicit reference date.
    pub(crate) async fn current_stock_at(
        &self,
        scope: &str,
        reference_date: NaiveDate,
    ) -> Result<Vec<ClassifiedMedicine>, AppError> {
        let medicines = self.medicine_repo.list(scope).await?;

        Ok(medicines
            .into_iter()
            .map(|medicine| {
                let classification = classify(
                    medicine.quantity,
                    medicine.low_stock_threshold,
                    medicine.expiry_date,
                    reference_date,
                );
                ClassifiedMedicine {
                    medicine,
                    status: classification.status,
                    days_to_expiry: classification.days_to_expiry,
                }
            })
            .collect())
    }

    pub async fn summary(&self, scope: &str) -> Result<StockSummary, AppError> {
        let stock = self.current_stock(scope).await?;
        let mut summary = StockSummary::default();
        for record in &stock {
            match record.status {
                StockStatus::Expired => summary.expired += 1,
                StockStatus::NearExpiry => summary.near_expiry += 1,
                StockStatus::LowStock => summary.low_stock += 1,
                StockStatus::Normal => {}
            }
        }
        Ok(summary)
    }

    pub async fn ledger(&self, scope: &str) -> Result<Vec<TransactionEvent>, AppError> {
        self.transaction_repo.list(scope).await
    }

    // --- RECEIVE (new batch in) ---

    /// Creates a new medicine record and its "in" ledger event in one
    /// transaction. Each receive is a new batch row; existing batches are
    /// never incremented.
    pub async fn receive_stock(
        &self,
        clinic: &str,
        payload: &ReceiveStockPayload,
    ) -> Result<Medicine, AppError> {
        if payload.expiry_date < Utc::now().date_naive() {
            return Err(AppError::ExpiryDateInPast);
        }

        let mut tx = self.pool.begin().await?;

        let medicine = self
            .medicine_repo
            .create(
                &mut *tx,
                clinic,
                &payload.drug_name,
                payload.generic_name.as_deref(),
                payload.strength.as_deref(),
                &payload.batch_no,
                payload.expiry_date,
                payload.quantity,
                payload.low_stock_threshold,
            )
            .await?;

        self.transaction_repo
            .record(
                &mut *tx,
                clinic,
                medicine.id,
                TransactionType::In,
                payload.quantity,
                None,
                Some(&format!("Received {}", payload.batch_no)),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Received {} x {} into {}",
            payload.quantity,
            payload.drug_name,
            clinic
        );
        Ok(medicine)
    }

    // --- ISSUE (stock out) ---

    /// Decrements a record's quantity and appends the matching "out" event.
    /// The decrement is conditional at the store (`WHERE quantity >= ?`), so
    /// an over-issue changes nothing; the transaction rolls back on any
    /// failure and the ledger stays consistent with the quantity.
    pub async fn issue_stock(
        &self,
        user: &CurrentUser,
        payload: &IssueStockPayload,
    ) -> Result<Medicine, AppError> {
        let mut tx = self.pool.begin().await?;

        let medicine = self
            .medicine_repo
            .find_by_id(&mut *tx, payload.medicine_id)
            .await?
            .ok_or(AppError::MedicineNotFound)?;

        if !user.may_access_clinic(&medicine.clinic) {
            return Err(AppError::ClinicScopeDenied);
        }

        let rows_changed = self
            .medicine_repo
            .decrement_quantity(&mut *tx, medicine.id, payload.quantity)
            .await?;
        if rows_changed == 0 {
            // Conditional update refused: not enough stock. Dropping the
            // transaction rolls back (nothing was written anyway).
            return Err(AppError::InsufficientStock {
                requested: payload.quantity,
                available: medicine.quantity,
            });
        }

        self.transaction_repo
            .record(
                &mut *tx,
                &medicine.clinic,
                medicine.id,
                TransactionType::Out,
                payload.quantity,
                payload.patient_name.as_deref(),
                payload.remarks.as_deref(),
            )
            .await?;

        let updated = self
            .medicine_repo
            .find_by_id(&mut *tx, medicine.id)
            .await?
            .ok_or(AppError::MedicineNotFound)?;

        tx.commit().await?;

        tracing::info!(
            "Issued {} x {} from {}",
            payload.quantity,
            updated.drug_name,
            updated.clinic
        );
        Ok(updated)
    }
}
