use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One table holds every collection; the namespace column carries the collection path
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Namespace).string().not_null())
                    .col(ColumnDef::new(Accounts::Username).string().not_null())
                    .col(ColumnDef::new(Accounts::Password).string().not_null())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_accounts")
                            .col(Accounts::Namespace)
                            .col(Accounts::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // Credential lookups filter on username and password together
        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_credentials")
                    .table(Accounts::Table)
                    .col(Accounts::Namespace)
                    .col(Accounts::Username)
                    .col(Accounts::Password)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Namespace,
    Username,
    Password,
    Role,
}
