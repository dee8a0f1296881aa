use super::sea_orm_active_enums::{Category, NetFlag};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An IP resource as submitted: a host, a CIDR network or a `start~end` range.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ty_ipaddr")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vlan_id: String,
    pub flag: NetFlag,
    pub category: Category,
    pub ipaddr: String,
    #[sea_orm(unique)]
    pub iphash: String,
    pub is_assigned: bool,
    pub assignment: String,
    pub idc_id: i32,
    pub idc_name: String,
    pub ip_owner: String,
    pub dns: String,
    pub netmask: i32,
    pub remarks: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ip_expand::Entity")]
    IpExpand,
}

impl Related<super::ip_expand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IpExpand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
