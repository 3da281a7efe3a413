use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReliefSupplies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReliefSupplies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReliefSupplies::ItemName).string().not_null())
                    .col(
                        ColumnDef::new(ReliefSupplies::Category)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReliefSupplies::Quantity).integer().not_null())
                    .col(ColumnDef::new(ReliefSupplies::Unit).string().not_null())
                    .col(ColumnDef::new(ReliefSupplies::DonorName).string())
                    .col(ColumnDef::new(ReliefSupplies::DonorPhone).string())
                    .col(ColumnDef::new(ReliefSupplies::Location).string().not_null())
                    .col(
                        ColumnDef::new(ReliefSupplies::Status)
                            .string_len(20)
                            .not_null()
                            .default("Available"),
                    )
                    .col(ColumnDef::new(ReliefSupplies::ExpiryDate).date_time())
                    .col(ColumnDef::new(ReliefSupplies::Notes).text())
                    .col(ColumnDef::new(ReliefSupplies::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(ReliefSupplies::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relief_supplies_category")
                    .table(ReliefSupplies::Table)
                    .col(ReliefSupplies::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relief_supplies_status")
                    .table(ReliefSupplies::Table)
                    .col(ReliefSupplies::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReliefSupplies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ReliefSupplies {
    Table,
    Id,
    ItemName,
    Category,
    Quantity,
    Unit,
    DonorName,
    DonorPhone,
    Location,
    Status,
    ExpiryDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}
