pub mod auth;
pub mod classifier;
pub mod export;
pub mod stock_service;
