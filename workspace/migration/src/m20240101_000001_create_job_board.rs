use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Password))
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(string(Users::Email).unique_key())
                    .col(string_len(Users::Role, 50))
                    .col(string_null(Users::EducationLevel))
                    .col(text_null(Users::Resume))
                    .to_owned(),
            )
            .await?;

        // Create jobs table
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(pk_auto(Jobs::Id))
                    .col(integer(Jobs::EmployerId))
                    .col(string(Jobs::Title))
                    .col(string(Jobs::Department))
                    .col(string(Jobs::ManagerName))
                    .col(string(Jobs::ManagerEmail))
                    .col(string(Jobs::HiringSemesters))
                    .col(integer(Jobs::MinStudents))
                    .col(integer(Jobs::MaxStudents))
                    .col(string(Jobs::RoleLocation))
                    .col(string(Jobs::TypeOfWork))
                    .col(string(Jobs::Prerequisites).default(""))
                    .col(text(Jobs::BriefDescription))
                    .col(text(Jobs::MoreDetails))
                    .col(date(Jobs::ApplicationDeadline))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_employer")
                            .from(Jobs::Table, Jobs::EmployerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_employer_id")
                    .table(Jobs::Table)
                    .col(Jobs::EmployerId)
                    .to_owned(),
            )
            .await?;

        // Create applications table
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(pk_auto(Applications::Id))
                    .col(integer(Applications::StudentId))
                    .col(integer(Applications::JobId))
                    .col(string_len(Applications::Status, 20).default("pending"))
                    .col(string(Applications::EmailAddress))
                    .col(integer(Applications::YearOfGraduation))
                    .col(text(Applications::CandidateStatement))
                    .col(blob_null(Applications::Resume))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_student")
                            .from(Applications::Table, Applications::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_job")
                            .from(Applications::Table, Applications::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job_id")
                    .table(Applications::Table)
                    .col(Applications::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Password,
    FirstName,
    LastName,
    Email,
    Role,
    EducationLevel,
    Resume,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    EmployerId,
    Title,
    Department,
    ManagerName,
    ManagerEmail,
    HiringSemesters,
    MinStudents,
    MaxStudents,
    RoleLocation,
    TypeOfWork,
    Prerequisites,
    BriefDescription,
    MoreDetails,
    ApplicationDeadline,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    StudentId,
    JobId,
    Status,
    EmailAddress,
    YearOfGraduation,
    CandidateStatement,
    Resume,
}
