use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{application, user};

/// A work-study position posted by an employer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The employer who posted the job.
    pub employer_id: i32,
    pub title: String,
    pub department: String,
    pub manager_name: String,
    pub manager_email: String,
    /// Semesters joined into one string, e.g. "Fall,Spring".
    pub hiring_semesters: String,
    pub min_students: i32,
    pub max_students: i32,
    pub role_location: String,
    pub type_of_work: String,
    pub prerequisites: String,
    #[sea_orm(column_type = "Text")]
    pub brief_description: String,
    #[sea_orm(column_type = "Text")]
    pub more_details: String,
    pub application_deadline: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::EmployerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Employer,
    #[sea_orm(has_many = "application::Entity")]
    Application,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employer.def()
    }
}

impl Related<application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
