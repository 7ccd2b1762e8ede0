// src/services/classifier.rs

use chrono::NaiveDate;

use crate::models::stock::StockStatus;

/// "Near expiry" means within this many days of the expiry date, inclusive.
pub const NEAR_EXPIRY_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: StockStatus,
    pub days_to_expiry: i64,
}

/// Classifies one medicine record against a reference date.
///
/// The rules are applied in order and the last matching rule wins: an item
/// that is both low on stock and near expiry reports near_expiry, and an
/// expired item reports expired no matter what else holds.
pub fn classify(
    quantity: i64,
    low_stock_threshold: i64,
    expiry_date: NaiveDate,
    reference_date: NaiveDate,
) -> Classification {
    let days_to_expiry = expiry_date.signed_duration_since(reference_date).num_days();

    let mut status = StockStatus::Normal;
    if quantity <= low_stock_threshold {
        status = StockStatus::LowStock;
    }
    if days_to_expiry <= NEAR_EXPIRY_WINDOW_DAYS {
        status = StockStatus::NearExpiry;
    }
    if days_to_expiry <= 0 {
        status = StockStatus::Expired;
    }

    Classification {
        status,
        days_to_expiry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn plenty_of_stock_far_from_expiry_is_normal() {
        let c = classify(100, 20, today() + Duration::days(365), today());
        assert_eq!(c.status, StockStatus::Normal);
        assert_eq!(c.days_to_expiry, 365);
    }

    #[test]
    fn quantity_at_threshold_is_low_stock() {
        let c = classify(20, 20, today() + Duration::days(365), today());
        assert_eq!(c.status, StockStatus::LowStock);
    }

    #[test]
    fn expired_overrides_low_stock_and_near_expiry() {
        // Low quantity AND past expiry: expired dominates everything.
        let c = classify(5, 20, today() - Duration::days(3), today());
        assert_eq!(c.status, StockStatus::Expired);
        assert_eq!(c.days_to_expiry, -3);
    }

    #[test]
    fn near_expiry_overrides_low_stock() {
        let c = classify(5, 20, today() + Duration::days(30), today());
        assert_eq!(c.status, StockStatus::NearExpiry);
    }

    #[test]
    fn near_expiry_window_boundary() {
        let at_window = classify(100, 20, today() + Duration::days(90), today());
        assert_eq!(at_window.status, StockStatus::NearExpiry);

        let past_window = classify(100, 20, today() + Duration::days(91), today());
        assert_eq!(past_window.status, StockStatus::Normal);
    }

    #[test]
    fn expiry_boundary() {
        let expires_today = classify(100, 20, today(), today());
        assert_eq!(expires_today.status, StockStatus::Expired);
        assert_eq!(expires_today.days_to_expiry, 0);

        let expires_tomorrow = classify(100, 20, today() + Duration::days(1), today());
        assert_eq!(expires_tomorrow.status, StockStatus::NearExpiry);
        assert_eq!(expires_tomorrow.days_to_expiry, 1);
    }
}
