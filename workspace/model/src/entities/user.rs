use sea_orm::entity::prelude::*;

/// Role of a user. Stored as the exact strings the frontend sends, which is
/// why the admin value is lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum Role {
    #[sea_orm(string_value = "Student")]
    Student,
    #[sea_orm(string_value = "Employer")]
    Employer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Employer => "Employer",
            Role::Admin => "admin",
        }
    }

    /// Parses a role label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "employer" => Some(Role::Employer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A registered user: student, employer or administrator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2id PHC string, never the plaintext.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: Role,
    /// Only meaningful for students.
    pub education_level: Option<String>,
    /// Only meaningful for students.
    #[sea_orm(column_type = "Text", nullable)]
    pub resume: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Jobs posted by this user as employer.
    #[sea_orm(has_many = "super::job::Entity")]
    Job,
    /// Applications submitted by this user as student.
    #[sea_orm(has_many = "super::application::Entity")]
    Application,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
