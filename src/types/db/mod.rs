// Database entities - SeaORM models
pub mod account;
