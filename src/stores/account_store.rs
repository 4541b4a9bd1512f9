use std::cmp::Ordering;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::types::db::account;
use crate::types::internal::{Account, Role};

/// Client for one collection of account records
///
/// Every call is a single round-trip to the backing store; nothing is cached,
/// so a fresh `list_all` always reflects the latest writes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Collection path this client is bound to
    fn collection_path(&self) -> &str;

    /// Exact match on username and password; first match wins
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, InternalError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, InternalError>;

    /// All accounts, sorted ascending by username
    async fn list_all(&self) -> Result<Vec<Account>, InternalError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, InternalError>;

    /// Create a new record; fails with `AccountError::AlreadyExists` if the username is taken
    async fn create(&self, username: &str, password: &str, role: Role) -> Result<(), InternalError>;

    /// Full-record write; creates or replaces
    async fn overwrite(&self, account: &Account) -> Result<(), InternalError>;

    /// Fails with `AccountError::NotFound` if nothing was deleted
    async fn delete_by_username(&self, username: &str) -> Result<(), InternalError>;
}

/// Ordering used for listings: case-insensitive, ties broken by the raw string
pub fn compare_usernames(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// SeaORM-backed account store scoped to one collection namespace
pub struct SeaOrmAccountStore {
    db: DatabaseConnection,
    namespace: String,
}

impl SeaOrmAccountStore {
    pub fn new(db: DatabaseConnection, namespace: impl Into<String>) -> Self {
        Self {
            db,
            namespace: namespace.into(),
        }
    }

    fn scoped(&self) -> sea_orm::Select<account::Entity> {
        account::Entity::find().filter(account::Column::Namespace.eq(self.namespace.as_str()))
    }

    fn active_model(&self, username: &str, password: &str, role: Role) -> account::ActiveModel {
        account::ActiveModel {
            namespace: Set(self.namespace.clone()),
            username: Set(username.to_owned()),
            password: Set(password.to_owned()),
            role: Set(role.as_str().to_owned()),
        }
    }
}

#[async_trait]
impl AccountStore for SeaOrmAccountStore {
    fn collection_path(&self) -> &str {
        &self.namespace
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, InternalError> {
        let model = self
            .scoped()
            .filter(account::Column::Username.eq(username))
            .filter(account::Column::Password.eq(password))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_credentials", e))?;

        model.map(Account::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, InternalError> {
        let model = self
            .scoped()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_username", e))?;

        model.map(Account::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Account>, InternalError> {
        let models = self
            .scoped()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_accounts", e))?;

        let mut accounts = models
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        accounts.sort_by(|a, b| compare_usernames(&a.username, &b.username));

        Ok(accounts)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, InternalError> {
        let count = self
            .scoped()
            .filter(account::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("exists_by_username", e))?;

        Ok(count > 0)
    }

    async fn create(&self, username: &str, password: &str, role: Role) -> Result<(), InternalError> {
        if self.exists_by_username(username).await? {
            return Err(AccountError::already_exists(username));
        }

        // The primary key makes the write conditional, so a racing create of the
        // same username inserts nothing instead of overwriting
        let inserted = account::Entity::insert(self.active_model(username, password, role))
            .on_conflict(
                OnConflict::columns([account::Column::Namespace, account::Column::Username])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match inserted {
            Ok(0) | Err(DbErr::RecordNotInserted) => {
                tracing::warn!(
                    "Concurrent create detected for {} in {}",
                    username,
                    self.namespace
                );
                Err(AccountError::already_exists(username))
            }
            Ok(_) => {
                tracing::debug!("Created account {} ({}) in {}", username, role, self.namespace);
                Ok(())
            }
            Err(e) => Err(InternalError::database("create_account", e)),
        }
    }

    async fn overwrite(&self, account: &Account) -> Result<(), InternalError> {
        account::Entity::insert(self.active_model(&account.username, &account.password, account.role))
            .on_conflict(
                OnConflict::columns([account::Column::Namespace, account::Column::Username])
                    .update_columns([account::Column::Password, account::Column::Role])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| InternalError::database("overwrite_account", e))?;

        tracing::debug!("Wrote account {} in {}", account.username, self.namespace);

        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<(), InternalError> {
        let result = account::Entity::delete_many()
            .filter(account::Column::Namespace.eq(self.namespace.as_str()))
            .filter(account::Column::Username.eq(username))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_account", e))?;

        if result.rows_affected == 0 {
            return Err(AccountError::not_found(username));
        }

        tracing::debug!("Deleted account {} from {}", username, self.namespace);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_test_store, setup_test_store_in};

    #[test]
    fn test_compare_usernames_is_case_insensitive() {
        let mut names = vec!["bob", "Alice", "carol", "alice"];
        names.sort_by(|a, b| compare_usernames(a, b));
        assert_eq!(names, vec!["Alice", "alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_create_then_exists() {
        let store = setup_test_store().await;

        assert!(!store.exists_by_username("alice").await.unwrap());
        store.create("alice", "pw", Role::User).await.unwrap();
        assert!(store.exists_by_username("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_fails_already_exists() {
        let store = setup_test_store().await;
        store.create("alice", "pw", Role::User).await.unwrap();

        let err = store.create("alice", "other", Role::Reseller).await.unwrap_err();
        assert!(matches!(err, InternalError::Account(AccountError::AlreadyExists { ref username }) if username == "alice"));

        // The first record is untouched
        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.password, "pw");
        assert_eq!(stored.role, Role::User);
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_username() {
        let store = setup_test_store().await;
        store.create("bob", "pw", Role::User).await.unwrap();
        store.create("alice", "pw", Role::User).await.unwrap();
        store.create("carol", "pw", Role::Reseller).await.unwrap();

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_find_by_credentials_requires_both_fields() {
        let store = setup_test_store().await;
        store.create("alice", "pw", Role::Reseller).await.unwrap();

        let found = store.find_by_credentials("alice", "pw").await.unwrap();
        assert_eq!(found.map(|a| a.role), Some(Role::Reseller));

        assert!(store.find_by_credentials("alice", "PW").await.unwrap().is_none());
        assert!(store.find_by_credentials("bob", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_fails_not_found() {
        let store = setup_test_store().await;

        let err = store.delete_by_username("ghost").await.unwrap_err();
        assert!(matches!(err, InternalError::Account(AccountError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = setup_test_store().await;
        store.create("alice", "pw", Role::User).await.unwrap();

        store.delete_by_username("alice").await.unwrap();
        assert!(!store.exists_by_username("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_record() {
        let store = setup_test_store().await;
        store.create("alice", "pw", Role::User).await.unwrap();

        store
            .overwrite(&Account::new("alice", "new-pw", Role::Reseller))
            .await
            .unwrap();

        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.password, "new-pw");
        assert_eq!(stored.role, Role::Reseller);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let (db, shop_a) = setup_test_store_in("shop-a").await;
        let shop_b = SeaOrmAccountStore::new(db, "artifacts/shop-b/public/data/accounts");

        shop_a.create("alice", "pw", Role::User).await.unwrap();

        assert!(!shop_b.exists_by_username("alice").await.unwrap());
        assert!(shop_b.list_all().await.unwrap().is_empty());
        // Same username is free in the other collection
        shop_b.create("alice", "pw", Role::Reseller).await.unwrap();
    }
}
