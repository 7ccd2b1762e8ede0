pub mod auth;
pub mod stock;
