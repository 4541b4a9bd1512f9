use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connecting to the account store failed: {source}")]
    Connect {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Running account store migrations failed: {source}")]
    Migration {
        #[source]
        source: sea_orm::DbErr,
    },
}
