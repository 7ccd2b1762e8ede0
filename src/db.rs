pub mod medicine_repo;
pub use medicine_repo::MedicineRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
