use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmergencyContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmergencyContacts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::OrganizationName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmergencyContacts::ContactPerson).string())
                    .col(
                        ColumnDef::new(EmergencyContacts::Phone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmergencyContacts::AlternatePhone).string())
                    .col(ColumnDef::new(EmergencyContacts::Email).string())
                    .col(ColumnDef::new(EmergencyContacts::Address).text())
                    .col(ColumnDef::new(EmergencyContacts::ServiceType).string_len(20))
                    .col(
                        ColumnDef::new(EmergencyContacts::IsActive)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_emergency_contacts_service_type")
                    .table(EmergencyContacts::Table)
                    .col(EmergencyContacts::ServiceType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_emergency_contacts_organization_name")
                    .table(EmergencyContacts::Table)
                    .col(EmergencyContacts::OrganizationName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmergencyContacts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmergencyContacts {
    Table,
    Id,
    OrganizationName,
    ContactPerson,
    Phone,
    AlternatePhone,
    Email,
    Address,
    ServiceType,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
