use crate::error::ServiceResult;
use ::entity::prelude::*;
use ::entity::{ip_addr, ip_expand};
use sea_orm::*;
use serde::Serialize;

/// Tracked addresses of one scope: host resources plus expanded hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddressCount {
    pub total: u64,
    pub assigned: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub vendors: u64,
    pub idcs: u64,
    pub vlans: u64,
    pub public: AddressCount,
    pub inner: AddressCount,
}

async fn count_addresses<C: ConnectionTrait>(
    db: &C,
    flag: NetFlag,
    assigned_only: bool,
) -> Result<u64, DbErr> {
    let mut hosts = IpAddr::find()
        .filter(ip_addr::Column::Flag.eq(flag))
        .filter(ip_addr::Column::Category.eq(Category::Host));
    let mut expanded = IpExpand::find().filter(ip_expand::Column::Flag.eq(flag));
    if assigned_only {
        hosts = hosts.filter(ip_addr::Column::IsAssigned.eq(true));
        expanded = expanded.filter(ip_expand::Column::IsAssigned.eq(true));
    }
    Ok(hosts.count(db).await? + expanded.count(db).await?)
}

async fn address_count<C: ConnectionTrait>(db: &C, flag: NetFlag) -> Result<AddressCount, DbErr> {
    Ok(AddressCount {
        total: count_addresses(db, flag, false).await?,
        assigned: count_addresses(db, flag, true).await?,
    })
}

pub struct StatsService;

impl StatsService {
    pub async fn summary(db: &DbConn) -> ServiceResult<Summary> {
        Ok(Summary {
            vendors: Vendor::find().count(db).await?,
            idcs: Idc::find().count(db).await?,
            vlans: Vlan::find().count(db).await?,
            public: address_count(db, NetFlag::Public).await?,
            inner: address_count(db, NetFlag::Inner).await?,
        })
    }
}
