// src/services/export.rs

use crate::{common::error::AppError, models::stock::ClassifiedMedicine};

/// Fixed column order of the stock export. Deliberately stable: downstream
/// spreadsheets key on position.
const CSV_HEADER: [&str; 7] = [
    "drug_name",
    "generic_name",
    "strength",
    "batch_no",
    "expiry_date",
    "quantity",
    "low_stock_threshold",
];

/// Serializes the current (already filtered and classified) stock view to
/// CSV: header plus one row per record, ISO-8601 dates. No aggregation and
/// no ledger data.
pub fn stock_to_csv(records: &[ClassifiedMedicine]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| anyhow::anyhow!("CSV write failed: {}", e))?;

    for record in records {
        let medicine = &record.medicine;
        writer
            .write_record([
                medicine.drug_name.clone(),
                medicine.generic_name.clone().unwrap_or_default(),
                medicine.strength.clone().unwrap_or_default(),
                medicine.batch_no.clone(),
                medicine.expiry_date.format("%Y-%m-%d").to_string(),
                medicine.quantity.to_string(),
                medicine.low_stock_threshold.to_string(),
            ])
            .map_err(|e| anyhow::anyhow!("CSV write failed: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::{Medicine, StockStatus};
    use chrono::{NaiveDate, Utc};

    fn record(id: i64, drug: &str, generic: Option<&str>, quantity: i64) -> ClassifiedMedicine {
        ClassifiedMedicine {
            medicine: Medicine {
                id,
                clinic: "Clinic 1 - Nairobi".to_string(),
                drug_name: drug.to_string(),
                generic_name: generic.map(str::to_string),
                strength: Some("500mg".to_string()),
                batch_no: format!("B-{id}"),
                expiry_date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
                quantity,
                low_stock_threshold: 20,
                date_added: Utc::now(),
            },
            status: StockStatus::Normal,
            days_to_expiry: 200,
        }
    }

    #[test]
    fn export_has_header_and_one_row_per_record() {
        let records = vec![
            record(1, "Paracetamol", Some("Acetaminophen"), 100),
            record(2, "Amoxicillin", None, 40),
        ];
        let bytes = stock_to_csv(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(CSV_HEADER.to_vec())
        );
        let rows: Vec<csv::StringRecord> =
            reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn export_round_trips_field_values() {
        let records = vec![record(7, "Paracetamol", Some("Acetaminophen"), 100)];
        let bytes = stock_to_csv(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Paracetamol");
        assert_eq!(&row[1], "Acetaminophen");
        assert_eq!(&row[2], "500mg");
        assert_eq!(&row[3], "B-7");
        assert_eq!(&row[4], "2027-03-01");
        assert_eq!(&row[5], "100");
        assert_eq!(&row[6], "20");
    }

    #[test]
    fn missing_optional_fields_export_as_empty_strings() {
        let bytes = stock_to_csv(&[record(3, "Amoxicillin", None, 40)]).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "");
    }

    #[test]
    fn empty_stock_exports_header_only() {
        let bytes = stock_to_csv(&[]).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert!(reader.records().next().is_none());
    }
}
