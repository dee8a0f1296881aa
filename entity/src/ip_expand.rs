use super::sea_orm_active_enums::NetFlag;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One host address materialized from a network or range resource.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ty_ipaddr_expand")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ipaddr_id: i32,
    pub ipaddr: String,
    pub flag: NetFlag,
    pub is_assigned: bool,
    pub assignment: String,
    pub relate_inf: String,
    pub idc_device: String,
    pub idc_dev_port: String,
    pub remarks: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ip_addr::Entity",
        from = "Column::IpaddrId",
        to = "super::ip_addr::Column::Id"
    )]
    IpAddr,
}

impl Related<super::ip_addr::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IpAddr.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
