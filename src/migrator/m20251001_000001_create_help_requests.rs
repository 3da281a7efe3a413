use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HelpRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpRequests::Name).string().not_null())
                    .col(ColumnDef::new(HelpRequests::Phone).string().not_null())
                    .col(ColumnDef::new(HelpRequests::Location).string().not_null())
                    .col(ColumnDef::new(HelpRequests::Description).text())
                    .col(
                        ColumnDef::new(HelpRequests::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(HelpRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(HelpRequests::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(HelpRequests::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_help_requests_status")
                    .table(HelpRequests::Table)
                    .col(HelpRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HelpRequests {
    Table,
    Id,
    Name,
    Phone,
    Location,
    Description,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}
