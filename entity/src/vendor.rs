use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ty_vendor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// md5 of the trimmed full name; the natural key of a vendor.
    #[sea_orm(unique)]
    pub comp_hash: String,
    pub comp_name: String,
    pub comp_fullname: String,
    pub contact: String,
    pub contact_phone: String,
    pub receiver: String,
    pub recv_address: String,
    pub recv_phone: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::idc::Entity")]
    Idc,
}

impl Related<super::idc::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Idc.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
