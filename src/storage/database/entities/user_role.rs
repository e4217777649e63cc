use crate::core::models::{Role, UserRoleBinding};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Binding of a user to a role
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub role_id: Uuid,

    /// Soft toggle; inactive bindings grant nothing
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain_binding(&self, role: Option<Role>) -> UserRoleBinding {
        UserRoleBinding {
            id: self.id,
            user_id: self.user_id,
            role_id: self.role_id,
            is_active: self.is_active,
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
            role,
        }
    }

    pub fn from_domain_binding(binding: &UserRoleBinding) -> ActiveModel {
        ActiveModel {
            id: Set(binding.id),
            user_id: Set(binding.user_id),
            role_id: Set(binding.role_id),
            is_active: Set(binding.is_active),
            created_at: Set(binding.created_at.into()),
            updated_at: Set(binding.updated_at.into()),
        }
    }
}
