// Stores layer - Data access
pub mod account_store;

pub use account_store::{AccountStore, SeaOrmAccountStore, compare_usernames};
