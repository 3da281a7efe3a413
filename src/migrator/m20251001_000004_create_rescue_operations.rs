use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RescueOperations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RescueOperations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RescueOperations::OperationName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RescueOperations::HelpRequestId).integer())
                    .col(ColumnDef::new(RescueOperations::VolunteerId).integer())
                    .col(ColumnDef::new(RescueOperations::TeamSize).integer().not_null())
                    .col(ColumnDef::new(RescueOperations::VehicleType).string())
                    .col(ColumnDef::new(RescueOperations::Location).string().not_null())
                    .col(
                        ColumnDef::new(RescueOperations::StartTime)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RescueOperations::EndTime).date_time())
                    .col(
                        ColumnDef::new(RescueOperations::Status)
                            .string_len(20)
                            .not_null()
                            .default("initiated"),
                    )
                    .col(
                        ColumnDef::new(RescueOperations::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(RescueOperations::PeopleRescued)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RescueOperations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RescueOperations::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rescue_operations_help_request")
                            .from(RescueOperations::Table, RescueOperations::HelpRequestId)
                            .to(HelpRequests::Table, HelpRequests::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rescue_operations_volunteer")
                            .from(RescueOperations::Table, RescueOperations::VolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rescue_operations_status")
                    .table(RescueOperations::Table)
                    .col(RescueOperations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rescue_operations_priority")
                    .table(RescueOperations::Table)
                    .col(RescueOperations::Priority)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RescueOperations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RescueOperations {
    Table,
    Id,
    OperationName,
    HelpRequestId,
    VolunteerId,
    TeamSize,
    VehicleType,
    Location,
    StartTime,
    EndTime,
    Status,
    Priority,
    PeopleRescued,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HelpRequests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Volunteers {
    Table,
    Id,
}
