use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create teams table
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string(Teams::Name))
                    .col(string(Teams::Manager))
                    .col(string(Teams::Email))
                    .col(integer(Teams::MaxStudents))
                    .col(string(Teams::Contact))
                    .col(string(Teams::Priority))
                    .col(string(Teams::RecruitingFor))
                    .to_owned(),
            )
            .await?;

        // Create ws_trackers table
        manager
            .create_table(
                Table::create()
                    .table(WsTrackers::Table)
                    .if_not_exists()
                    .col(pk_auto(WsTrackers::Id))
                    .col(string(WsTrackers::StudentId))
                    .col(string(WsTrackers::MinervaEmail))
                    .col(string(WsTrackers::FullName))
                    .col(integer_null(WsTrackers::ExpectedGradYear))
                    .col(boolean(WsTrackers::WsEligible).default(false))
                    .col(string_null(WsTrackers::Role))
                    .col(string_null(WsTrackers::ManagerName))
                    .col(string_null(WsTrackers::PaycomManager))
                    .col(string_null(WsTrackers::ManagerEmail))
                    .col(string_null(WsTrackers::DepartmentName))
                    .col(string_null(WsTrackers::PaycomId))
                    .col(string_null(WsTrackers::ContractorStatus))
                    .col(text_null(WsTrackers::Notes))
                    .col(string_null(WsTrackers::MergeStatus))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WsTrackers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    Manager,
    Email,
    MaxStudents,
    Contact,
    Priority,
    RecruitingFor,
}

#[derive(DeriveIden)]
enum WsTrackers {
    Table,
    Id,
    StudentId,
    MinervaEmail,
    FullName,
    ExpectedGradYear,
    WsEligible,
    Role,
    ManagerName,
    PaycomManager,
    ManagerEmail,
    DepartmentName,
    PaycomId,
    ContractorStatus,
    Notes,
    MergeStatus,
}
