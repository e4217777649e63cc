use crate::core::models::{User, UserStatus};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Username (unique)
    #[sea_orm(unique)]
    pub username: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Argon2 PHC string
    pub password_hash: String,

    /// One of active, inactive, banned, suspended
    pub status: String,

    pub is_verified: bool,

    pub last_login_at: Option<DateTimeWithTimeZone>,

    /// Ban audit
    pub banned_at: Option<DateTimeWithTimeZone>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Role bindings held by the user
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert SeaORM model to the domain user
    pub fn to_domain_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            password_hash: self.password_hash.clone(),
            // Unknown values come from manual edits; treat them as not active.
            status: self.status.parse().unwrap_or(UserStatus::Inactive),
            is_verified: self.is_verified,
            last_login_at: self.last_login_at.map(|dt| dt.naive_utc().and_utc()),
            banned_at: self.banned_at.map(|dt| dt.naive_utc().and_utc()),
            banned_reason: self.banned_reason.clone(),
            banned_by: self.banned_by,
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
        }
    }

    /// Convert the domain user to an active model with every column set
    pub fn from_domain_user(user: &User) -> ActiveModel {
        ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            status: Set(user.status.as_str().to_string()),
            is_verified: Set(user.is_verified),
            last_login_at: Set(user.last_login_at.map(Into::into)),
            banned_at: Set(user.banned_at.map(Into::into)),
            banned_reason: Set(user.banned_reason.clone()),
            banned_by: Set(user.banned_by),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
