use crate::addr::{self, Address};
use crate::error::{ServiceError, ServiceResult};
use crate::filter::{fetch, Listing, Pagination, VlanFilter};
use crate::patch::{apply_text, text, Audit};
use crate::txn::transactional;
use ::entity::{vlan, vlan::Entity as Vlan};
use sea_orm::*;
use serde::{Deserialize, Serialize};

/// Non-numeric VLAN tokens.
pub const SPECIAL_VLANS: [&str; 2] = ["L3", "BGP"];

/// Validates a VLAN token and returns its canonical form.
///
/// Numeric ids must fall in `1..=4096`; `l3` and `bgp` are accepted in any
/// case and stored upper-cased.
pub fn validate_vlan_token(token: &str) -> ServiceResult<String> {
    let token = token.trim();
    if let Some(special) = SPECIAL_VLANS
        .iter()
        .find(|s| s.eq_ignore_ascii_case(token))
    {
        return Ok((*special).to_owned());
    }
    match token.parse::<u16>() {
        Ok(id @ 1..=4096) if token.bytes().all(|b| b.is_ascii_digit()) => Ok(id.to_string()),
        _ => Err(ServiceError::param(format!(
            "invalid vlan id {token:?}, expected 1-4096, L3 or BGP"
        ))),
    }
}

fn validate_network(network: &str) -> ServiceResult<String> {
    match addr::parse(network) {
        Ok(net @ Address::Network(_)) => Ok(net.to_string()),
        _ => Err(ServiceError::param(format!(
            "vlan network {network:?} is not a CIDR network"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVlan {
    pub vlan_id: String,
    pub name: String,
    pub network: String,
    pub country: String,
    pub city: String,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanPatch {
    pub vlan_id: Option<String>,
    pub name: Option<String>,
    pub network: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub remarks: Option<String>,
}

async fn token_taken<C: ConnectionTrait>(db: &C, token: &str, except: Option<i32>) -> ServiceResult<bool> {
    let mut query = Vlan::find().filter(vlan::Column::VlanId.eq(token));
    if let Some(id) = except {
        query = query.filter(vlan::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

pub struct VlanService;

impl VlanService {
    pub async fn add(db: &DbConn, audit: &Audit, form: NewVlan) -> ServiceResult<vlan::Model> {
        let token = validate_vlan_token(&form.vlan_id)?;
        let network = match form.network.trim() {
            "" => String::new(),
            network => validate_network(network)?,
        };
        let name = match form.name.trim() {
            "" => format!("Vlan-{token}"),
            name => name.to_owned(),
        };
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                if token_taken(txn, &token, None).await? {
                    return Err(ServiceError::ObjectExists(format!("vlan {token}")));
                }

                let model = vlan::ActiveModel {
                    vlan_id: Set(token),
                    name: Set(name),
                    network: Set(network),
                    country: Set(form.country.trim().to_owned()),
                    city: Set(form.city.trim().to_owned()),
                    remarks: Set(form.remarks.trim().to_owned()),
                    created_at: Set(audit.at),
                    updated_at: Set(audit.at),
                    created_by: Set(audit.by.clone()),
                    updated_by: Set(audit.by),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                tracing::info!(id = model.id, vlan = %model.vlan_id, "vlan added");
                Ok(model)
            })
        })
        .await
    }

    pub async fn update(
        db: &DbConn,
        audit: &Audit,
        id: i32,
        patch: VlanPatch,
    ) -> ServiceResult<vlan::Model> {
        let token = text(&patch.vlan_id)
            .map(|t| validate_vlan_token(&t))
            .transpose()?;
        let network = text(&patch.network)
            .map(|n| validate_network(&n))
            .transpose()?;
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let current = Vlan::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vlan", id))?;

                let token = token.filter(|t| *t != current.vlan_id);
                let mut am: vlan::ActiveModel = current.into();

                if let Some(token) = token {
                    if token_taken(txn, &token, Some(id)).await? {
                        return Err(ServiceError::ObjectExists(format!("vlan {token}")));
                    }
                    am.vlan_id = Set(token);
                }
                if let Some(network) = network {
                    am.network = Set(network);
                }
                apply_text!(am, patch, name, country, city, remarks);
                am.updated_at = Set(audit.at);
                am.updated_by = Set(audit.by);
                Ok(am.update(txn).await?)
            })
        })
        .await
    }

    pub async fn delete(db: &DbConn, id: i32) -> ServiceResult<u64> {
        transactional(db, |txn| {
            Box::pin(async move {
                let res = Vlan::delete_by_id(id).exec(txn).await?;
                if res.rows_affected == 0 {
                    return Err(ServiceError::not_found("vlan", id));
                }
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
                let res = Vlan::delete_many()
                    .filter(vlan::Column::Id.is_in(ids))
                    .exec(txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn get(db: &DbConn, id: i32) -> ServiceResult<vlan::Model> {
        Vlan::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("vlan", id))
    }

    pub async fn list(
        db: &DbConn,
        filter: &VlanFilter,
        pagination: Pagination,
    ) -> ServiceResult<Listing<vlan::Model>> {
        fetch(db, filter.select(), pagination).await
    }
}
