use sea_orm::entity::prelude::*;

/// A hiring team and its recruiting contact.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub manager: String,
    pub email: String,
    pub max_students: i32,
    pub contact: String,
    pub priority: String,
    pub recruiting_for: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
