use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ty_vlanid")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// `1`..=`4096`, or one of the special tokens `L3` and `BGP`.
    #[sea_orm(unique)]
    pub vlan_id: String,
    pub name: String,
    pub network: String,
    pub country: String,
    pub city: String,
    pub remarks: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
