use sea_orm::entity::prelude::*;

use super::{job, user};

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parses a status label, ignoring case ("Accepted" and "accepted" are equal).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// A student's application to a job.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub job_id: i32,
    pub status: ApplicationStatus,
    pub email_address: String,
    pub year_of_graduation: i32,
    #[sea_orm(column_type = "Text")]
    pub candidate_statement: String,
    /// Raw bytes of the uploaded resume, if one was attached.
    #[sea_orm(column_type = "Blob", nullable)]
    pub resume: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::StudentId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "job::Entity",
        from = "Column::JobId",
        to = "job::Column::Id",
        on_delete = "Cascade"
    )]
    Job,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus;

    #[test]
    fn test_status_labels() {
        assert_eq!(ApplicationStatus::from_label("Accepted"), Some(ApplicationStatus::Accepted));
        assert_eq!(ApplicationStatus::from_label("pending"), Some(ApplicationStatus::Pending));
        assert_eq!(ApplicationStatus::from_label("REJECTED"), Some(ApplicationStatus::Rejected));
        assert_eq!(ApplicationStatus::from_label("hired"), None);
        assert_eq!(ApplicationStatus::Pending.as_str(), "pending");
    }
}
