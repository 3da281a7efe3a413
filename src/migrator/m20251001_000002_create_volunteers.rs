use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Volunteers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Volunteers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Volunteers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Volunteers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Volunteers::Phone).string().not_null())
                    .col(ColumnDef::new(Volunteers::Skills).text())
                    .col(ColumnDef::new(Volunteers::Availability).string())
                    .col(ColumnDef::new(Volunteers::Location).string())
                    .col(
                        ColumnDef::new(Volunteers::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Volunteers::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Volunteers::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Volunteers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Volunteers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Skills,
    Availability,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}
