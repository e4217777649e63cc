use crate::core::models::Permission;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// `resource:action`, unique
    #[sea_orm(unique)]
    pub name: String,

    pub description: Option<String>,

    pub resource: String,

    pub action: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermissions,
}

impl Related<super::role_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain_permission(&self) -> Permission {
        Permission {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            resource: self.resource.clone(),
            action: self.action.clone(),
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
        }
    }

    pub fn from_domain_permission(permission: &Permission) -> ActiveModel {
        ActiveModel {
            id: Set(permission.id),
            name: Set(permission.name.clone()),
            description: Set(permission.description.clone()),
            resource: Set(permission.resource.clone()),
            action: Set(permission.action.clone()),
            created_at: Set(permission.created_at.into()),
            updated_at: Set(permission.updated_at.into()),
        }
    }
}
