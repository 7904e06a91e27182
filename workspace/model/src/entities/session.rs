use sea_orm::entity::prelude::*;

/// Server-side session record backing the login cookie.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Session id as issued in the cookie.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    /// JSON-serialized session record.
    pub data: Vec<u8>,
    /// Expiry as unix seconds; rows past this instant are never loaded.
    pub expiry_date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
