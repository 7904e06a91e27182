use sea_orm::entity::prelude::*;

/// One row of the work-study position tracker.
///
/// This is an administrative ledger mirrored from a spreadsheet, so
/// `student_id` is the institution's student number as text and is not a
/// foreign key into `users`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ws_trackers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: String,
    pub minerva_email: String,
    pub full_name: String,
    pub expected_grad_year: Option<i32>,
    pub ws_eligible: bool,
    pub role: Option<String>,
    pub manager_name: Option<String>,
    pub paycom_manager: Option<String>,
    pub manager_email: Option<String>,
    pub department_name: Option<String>,
    pub paycom_id: Option<String>,
    pub contractor_status: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub merge_status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
