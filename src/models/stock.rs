// src/models/stock.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// --- Medicine (one row per received batch) ---
// Quantity only ever changes through issue/receive; clinic and date_added are
// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: i64,
    pub clinic: String,
    pub drug_name: String,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub batch_no: String,
    pub expiry_date: NaiveDate,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub date_added: DateTime<Utc>,
}

// --- Ledger ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    In,
    Out,
}

/// One append-only ledger entry. Never updated or deleted; every quantity
/// change on a medicine writes exactly one of these in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub id: i64,
    pub clinic: String,
    pub drug_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i64,
    pub patient_name: Option<String>,
    pub remarks: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// --- Classification ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    LowStock,
    NearExpiry,
    Expired,
}

/// A medicine with its computed status attached as explicit fields, so the
/// classification travels with the record instead of living in presentation
/// code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedMedicine {
    #[serde(flatten)]
    pub medicine: Medicine,
    pub status: StockStatus,
    pub days_to_expiry: i64,
}

/// Counts shown on the stock overview: how many records are expired, within
/// the expiry window, or at/below their low-stock threshold.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub expired: usize,
    pub near_expiry: usize,
    pub low_stock: usize,
}

// --- Request payloads ---

fn default_low_stock_threshold() -> i64 {
    20
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveStockPayload {
    /// Target clinic. Optional for regular users (their own clinic is
    /// assumed); required for admins.
    pub clinic: Option<String>,

    #[validate(length(min = 1, message = "Drug name is required."))]
    pub drug_name: String,

    pub generic_name: Option<String>,
    pub strength: Option<String>,

    #[validate(length(min = 1, message = "Batch number is required."))]
    pub batch_no: String,

    /// YYYY-MM-DD. Must not be before today; checked in the service.
    pub expiry_date: NaiveDate,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i64,

    #[validate(range(min = 0, message = "Low-stock threshold cannot be negative."))]
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueStockPayload {
    pub medicine_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i64,

    pub patient_name: Option<String>,
    pub remarks: Option<String>,
}
