//! Address resources and their expanded host entries.
//!
//! A resource is stored once in `ty_ipaddr`. Networks and ranges are also
//! materialized host by host into `ty_ipaddr_expand`, and every write that
//! touches both tables runs in a single transaction.

use crate::addr::{self, Address};
use crate::error::{ServiceError, ServiceResult};
use crate::filter::{fetch, ExpandFilter, IpAddrFilter, Listing, Pagination};
use crate::fingerprint::fingerprint;
use crate::patch::{apply_text, reference, text, Audit, Keyed};
use crate::txn::transactional;
use crate::vlan::validate_vlan_token;
use ::entity::sea_orm_active_enums::NetFlag;
use ::entity::{idc, ip_addr, ip_addr::Entity as IpAddr, ip_expand, ip_expand::Entity as IpExpand};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DNS: &str = "8.8.8.8";
pub const DEFAULT_NETMASK: i32 = 24;
/// Rows per bulk insert of expanded hosts.
pub const EXPAND_CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewIpAddr {
    /// Host, CIDR network or `start~end` range.
    pub ipaddr: String,
    pub flag: NetFlag,
    pub vlan_id: String,
    pub is_assigned: bool,
    pub assignment: String,
    /// `0` when the resource is not tied to a facility.
    pub idc_id: i32,
    pub ip_owner: String,
    pub dns: String,
    pub netmask: i32,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpAddrPatch {
    pub vlan_id: Option<String>,
    pub is_assigned: Option<bool>,
    pub assignment: Option<String>,
    pub idc_id: Option<i32>,
    pub ip_owner: Option<String>,
    pub dns: Option<String>,
    pub netmask: Option<i32>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpExpandPatch {
    pub is_assigned: Option<bool>,
    pub assignment: Option<String>,
    pub relate_inf: Option<String>,
    pub idc_device: Option<String>,
    pub idc_dev_port: Option<String>,
    pub remarks: Option<String>,
}

fn validate_dns(dns: &str) -> ServiceResult<String> {
    match addr::parse(dns) {
        Ok(host @ Address::Host(_)) => Ok(host.to_string()),
        _ => Err(ServiceError::param(format!("dns {dns:?} is not an IPv4 address"))),
    }
}

fn validate_netmask(netmask: i32) -> ServiceResult<i32> {
    if (1..=32).contains(&netmask) {
        Ok(netmask)
    } else {
        Err(ServiceError::param(format!("netmask {netmask} is not within 1-32")))
    }
}

impl IpAddrPatch {
    /// Rejects malformed values before anything is written.
    fn check(&self) -> ServiceResult<()> {
        if let Some(vlan) = text(&self.vlan_id) {
            validate_vlan_token(&vlan)?;
        }
        if let Some(dns) = text(&self.dns) {
            validate_dns(&dns)?;
        }
        if let Some(netmask) = reference(self.netmask) {
            validate_netmask(netmask)?;
        }
        Ok(())
    }
}

async fn facility<C: ConnectionTrait>(db: &C, idc_id: i32) -> ServiceResult<idc::Model> {
    idc::Entity::find_by_id(idc_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::param(format!("idc {idc_id} does not exist")))
}

async fn hash_taken<C: ConnectionTrait>(db: &C, iphash: &str, except: Option<i32>) -> ServiceResult<bool> {
    let mut query = IpAddr::find().filter(ip_addr::Column::Iphash.eq(iphash));
    if let Some(id) = except {
        query = query.filter(ip_addr::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn insert_expanded<C: ConnectionTrait>(
    db: &C,
    audit: &Audit,
    parent: &ip_addr::Model,
    hosts: Vec<String>,
) -> ServiceResult<u64> {
    let mut inserted = 0;
    for chunk in hosts.chunks(EXPAND_CHUNK_SIZE) {
        let rows = chunk.iter().map(|host| ip_expand::ActiveModel {
            ipaddr_id: Set(parent.id),
            ipaddr: Set(host.clone()),
            flag: Set(parent.flag),
            is_assigned: Set(parent.is_assigned),
            assignment: Set(String::new()),
            relate_inf: Set(String::new()),
            idc_device: Set(String::new()),
            idc_dev_port: Set(String::new()),
            remarks: Set(String::new()),
            created_at: Set(audit.at),
            updated_at: Set(audit.at),
            created_by: Set(audit.by.clone()),
            updated_by: Set(audit.by.clone()),
            ..Default::default()
        });
        inserted += IpExpand::insert_many(rows).exec_without_returning(db).await?;
    }
    Ok(inserted)
}

/// Marks every unassigned host of `parent_id` as assigned.
async fn cascade_assigned<C: ConnectionTrait>(db: &C, audit: &Audit, parent_id: i32) -> ServiceResult<u64> {
    let res = IpExpand::update_many()
        .col_expr(ip_expand::Column::IsAssigned, Expr::value(true))
        .col_expr(ip_expand::Column::UpdatedAt, Expr::value(audit.at))
        .col_expr(ip_expand::Column::UpdatedBy, Expr::value(audit.by.as_str()))
        .filter(ip_expand::Column::IpaddrId.eq(parent_id))
        .filter(ip_expand::Column::IsAssigned.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

async fn patch_parent<C: ConnectionTrait>(
    db: &C,
    audit: &Audit,
    current: ip_addr::Model,
    patch: &IpAddrPatch,
) -> ServiceResult<ip_addr::Model> {
    let id = current.id;
    let vlan = text(&patch.vlan_id)
        .map(|t| validate_vlan_token(&t))
        .transpose()?
        .filter(|v| *v != current.vlan_id);
    let assignment = text(&patch.assignment).filter(|a| *a != current.assignment);

    let iphash = match current.flag {
        NetFlag::Inner if vlan.is_some() || assignment.is_some() => {
            let hash = fingerprint(
                &current.ipaddr,
                current.flag,
                Some(vlan.as_deref().unwrap_or(&current.vlan_id)),
                Some(assignment.as_deref().unwrap_or(&current.assignment)),
            );
            if hash_taken(db, &hash, Some(id)).await? {
                return Err(ServiceError::ObjectExists(format!("ip {}", current.ipaddr)));
            }
            Some(hash)
        }
        _ => None,
    };
    let idc = match reference(patch.idc_id) {
        Some(idc_id) => Some(facility(db, idc_id).await?),
        None => None,
    };

    if patch.is_assigned == Some(true) && !current.is_assigned {
        let hosts = cascade_assigned(db, audit, id).await?;
        tracing::debug!(id, hosts, "assignment cascaded");
    }

    let mut am: ip_addr::ActiveModel = current.into();
    if let Some(vlan) = vlan {
        am.vlan_id = Set(vlan);
    }
    if let Some(assignment) = assignment {
        am.assignment = Set(assignment);
    }
    if let Some(iphash) = iphash {
        am.iphash = Set(iphash);
    }
    if let Some(idc) = idc {
        am.idc_id = Set(idc.id);
        am.idc_name = Set(idc.name);
    }
    if let Some(is_assigned) = patch.is_assigned {
        am.is_assigned = Set(is_assigned);
    }
    if let Some(dns) = text(&patch.dns) {
        am.dns = Set(validate_dns(&dns)?);
    }
    if let Some(netmask) = reference(patch.netmask) {
        am.netmask = Set(netmask);
    }
    apply_text!(am, patch, ip_owner, remarks);
    am.updated_at = Set(audit.at);
    am.updated_by = Set(audit.by.clone());
    Ok(am.update(db).await?)
}

async fn patch_expand<C: ConnectionTrait>(
    db: &C,
    audit: &Audit,
    current: ip_expand::Model,
    patch: &IpExpandPatch,
) -> ServiceResult<ip_expand::Model> {
    let mut am: ip_expand::ActiveModel = current.into();
    if let Some(is_assigned) = patch.is_assigned {
        am.is_assigned = Set(is_assigned);
    }
    apply_text!(am, patch, assignment, relate_inf, idc_device, idc_dev_port, remarks);
    am.updated_at = Set(audit.at);
    am.updated_by = Set(audit.by.clone());
    Ok(am.update(db).await?)
}

pub struct IpAddrService;

impl IpAddrService {
    /// Registers an address resource and materializes its hosts.
    pub async fn add(db: &DbConn, audit: &Audit, form: NewIpAddr) -> ServiceResult<ip_addr::Model> {
        let address = addr::parse(&form.ipaddr)?;
        let vlan_id = match form.vlan_id.trim() {
            "" => String::new(),
            token => validate_vlan_token(token)?,
        };
        let dns = match form.dns.trim() {
            "" => DEFAULT_DNS.to_owned(),
            dns => validate_dns(dns)?,
        };
        let netmask = match form.netmask {
            0 => DEFAULT_NETMASK,
            n => validate_netmask(n)?,
        };
        let assignment = form.assignment.trim().to_owned();
        let normalized = address.to_string();
        let iphash = fingerprint(&normalized, form.flag, Some(vlan_id.as_str()), Some(assignment.as_str()));
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let idc = match form.idc_id {
                    id if id > 0 => Some(facility(txn, id).await?),
                    _ => None,
                };
                if hash_taken(txn, &iphash, None).await? {
                    return Err(ServiceError::ObjectExists(format!("ip {normalized}")));
                }

                let parent = ip_addr::ActiveModel {
                    vlan_id: Set(vlan_id),
                    flag: Set(form.flag),
                    category: Set(address.category()),
                    ipaddr: Set(normalized),
                    iphash: Set(iphash),
                    is_assigned: Set(form.is_assigned),
                    assignment: Set(assignment),
                    idc_id: Set(idc.as_ref().map_or(0, |i| i.id)),
                    idc_name: Set(idc.map(|i| i.name).unwrap_or_default()),
                    ip_owner: Set(form.ip_owner.trim().to_owned()),
                    dns: Set(dns),
                    netmask: Set(netmask),
                    remarks: Set(form.remarks.trim().to_owned()),
                    created_at: Set(audit.at),
                    updated_at: Set(audit.at),
                    created_by: Set(audit.by.clone()),
                    updated_by: Set(audit.by.clone()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let mut expanded = 0;
                if parent.category.expands() {
                    let hosts: Vec<String> =
                        address.hosts().iter().map(ToString::to_string).collect();
                    expanded = insert_expanded(txn, &audit, &parent, hosts).await?;
                }
                tracing::info!(
                    id = parent.id,
                    ipaddr = %parent.ipaddr,
                    expanded,
                    "ip resource added"
                );
                Ok(parent)
            })
        })
        .await
    }

    /// Applies a sparse patch to a resource.
    ///
    /// Turning `is_assigned` on first marks every unassigned host of the
    /// resource as assigned. Turning it off leaves the hosts alone.
    pub async fn update(
        db: &DbConn,
        audit: &Audit,
        id: i32,
        patch: IpAddrPatch,
    ) -> ServiceResult<ip_addr::Model> {
        patch.check()?;
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let current = IpAddr::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("ip", id))?;
                patch_parent(txn, &audit, current, &patch).await
            })
        })
        .await
    }

    /// Applies each patch in turn; ids that do not exist are skipped.
    /// Returns the number of resources updated.
    pub async fn update_batch(
        db: &DbConn,
        audit: &Audit,
        patches: Vec<Keyed<IpAddrPatch>>,
    ) -> ServiceResult<u64> {
        for keyed in &patches {
            keyed.patch.check()?;
        }
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let mut updated = 0;
                for Keyed { id, patch } in patches {
                    let Some(current) = IpAddr::find_by_id(id).one(txn).await? else {
                        tracing::debug!(id, "skipping missing ip resource");
                        continue;
                    };
                    patch_parent(txn, &audit, current, &patch).await?;
                    updated += 1;
                }
                Ok(updated)
            })
        })
        .await
    }

    /// Updates one host entry. The owning resource is never touched.
    pub async fn update_expand(
        db: &DbConn,
        audit: &Audit,
        id: i32,
        patch: IpExpandPatch,
    ) -> ServiceResult<ip_expand::Model> {
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let current = IpExpand::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("ip expand", id))?;
                patch_expand(txn, &audit, current, &patch).await
            })
        })
        .await
    }

    pub async fn update_expand_batch(
        db: &DbConn,
        audit: &Audit,
        patches: Vec<Keyed<IpExpandPatch>>,
    ) -> ServiceResult<u64> {
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let mut updated = 0;
                for Keyed { id, patch } in patches {
                    let Some(current) = IpExpand::find_by_id(id).one(txn).await? else {
                        tracing::debug!(id, "skipping missing ip expand entry");
                        continue;
                    };
                    patch_expand(txn, &audit, current, &patch).await?;
                    updated += 1;
                }
                Ok(updated)
            })
        })
        .await
    }

    /// Deletes a resource together with its hosts.
    pub async fn delete(db: &DbConn, id: i32) -> ServiceResult<u64> {
        transactional(db, |txn| {
            Box::pin(async move {
                if IpAddr::find_by_id(id).one(txn).await?.is_none() {
                    return Err(ServiceError::not_found("ip", id));
                }
                let hosts = IpExpand::delete_many()
                    .filter(ip_expand::Column::IpaddrId.eq(id))
                    .exec(txn)
                    .await?;
                let res = IpAddr::delete_by_id(id).exec(txn).await?;
                tracing::info!(id, hosts = hosts.rows_affected, "ip resource deleted");
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn delete_batch(db: &DbConn, ids: Vec<i32>) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        transactional(db, |txn| {
            Box::pin(async move {
                IpExpand::delete_many()
                    .filter(ip_expand::Column::IpaddrId.is_in(ids.clone()))
                    .exec(txn)
                    .await?;
                let res = IpAddr::delete_many()
                    .filter(ip_addr::Column::Id.is_in(ids))
                    .exec(txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn delete_expand(db: &DbConn, id: i32) -> ServiceResult<u64> {
        transactional(db, |txn| {
            Box::pin(async move {
                let res = IpExpand::delete_by_id(id).exec(txn).await?;
                if res.rows_affected == 0 {
                    return Err(ServiceError::not_found("ip expand", id));
                }
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn delete_expand_batch(db: &DbConn, ids: Vec<i32>) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        transactional(db, |txn| {
            Box::pin(async move {
                let res = IpExpand::delete_many()
                    .filter(ip_expand::Column::Id.is_in(ids))
                    .exec(txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn get(db: &DbConn, id: i32) -> ServiceResult<ip_addr::Model> {
        IpAddr::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ip", id))
    }

    pub async fn get_expand(db: &DbConn, id: i32) -> ServiceResult<ip_expand::Model> {
        IpExpand::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ip expand", id))
    }

    pub async fn list(
        db: &DbConn,
        filter: &IpAddrFilter,
        pagination: Pagination,
    ) -> ServiceResult<Listing<ip_addr::Model>> {
        fetch(db, filter.select(), pagination).await
    }

    pub async fn list_expand(
        db: &DbConn,
        filter: &ExpandFilter,
        pagination: Pagination,
    ) -> ServiceResult<Listing<ip_expand::Model>> {
        fetch(db, filter.select(), pagination).await
    }
}
