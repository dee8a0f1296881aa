use crate::error::{ServiceError, ServiceResult};
use crate::filter::{fetch, IdcFilter, Listing, Pagination};
use crate::patch::{apply_text, reference, text, Audit};
use crate::txn::transactional;
use ::entity::{idc, idc::Entity as Idc, ip_addr, vendor};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewIdc {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub contact_phone: String,
    pub country: String,
    pub city: String,
    /// `0` when the facility has no vendor.
    pub vendor_id: i32,
    pub receiver: String,
    pub recv_address: String,
    pub recv_phone: String,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdcPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub contact_phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub vendor_id: Option<i32>,
    pub receiver: Option<String>,
    pub recv_address: Option<String>,
    pub recv_phone: Option<String>,
    pub remarks: Option<String>,
}

async fn vendor_of<C: ConnectionTrait>(db: &C, vendor_id: i32) -> ServiceResult<vendor::Model> {
    vendor::Entity::find_by_id(vendor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("vendor", vendor_id))
}

async fn name_taken<C: ConnectionTrait>(db: &C, name: &str, except: Option<i32>) -> ServiceResult<bool> {
    let mut query = Idc::find().filter(idc::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(idc::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

pub struct IdcService;

impl IdcService {
    pub async fn add(db: &DbConn, audit: &Audit, form: NewIdc) -> ServiceResult<idc::Model> {
        let name = form.name.trim().to_owned();
        if name.is_empty() {
            return Err(ServiceError::param("idc name is required"));
        }
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                if name_taken(txn, &name, None).await? {
                    return Err(ServiceError::ObjectExists(format!("idc {name}")));
                }
                let (vendor_id, vendor_name) = match form.vendor_id {
                    id if id > 0 => {
                        let vendor = vendor_of(txn, id).await?;
                        (Some(vendor.id), vendor.comp_fullname)
                    }
                    _ => (None, String::new()),
                };

                let model = idc::ActiveModel {
                    name: Set(name),
                    address: Set(form.address.trim().to_owned()),
                    contact: Set(form.contact.trim().to_owned()),
                    contact_phone: Set(form.contact_phone.trim().to_owned()),
                    country: Set(form.country.trim().to_owned()),
                    city: Set(form.city.trim().to_owned()),
                    vendor_id: Set(vendor_id),
                    vendor_name: Set(vendor_name),
                    receiver: Set(form.receiver.trim().to_owned()),
                    recv_address: Set(form.recv_address.trim().to_owned()),
                    recv_phone: Set(form.recv_phone.trim().to_owned()),
                    remarks: Set(form.remarks.trim().to_owned()),
                    created_at: Set(audit.at),
                    updated_at: Set(audit.at),
                    created_by: Set(audit.by.clone()),
                    updated_by: Set(audit.by),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                tracing::info!(id = model.id, name = %model.name, "idc added");
                Ok(model)
            })
        })
        .await
    }

    /// Applies a sparse patch. A rename is copied onto the address
    /// resources that reference the facility.
    pub async fn update(
        db: &DbConn,
        audit: &Audit,
        id: i32,
        patch: IdcPatch,
    ) -> ServiceResult<idc::Model> {
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let current = Idc::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("idc", id))?;

                let renamed = text(&patch.name).filter(|n| *n != current.name);
                let mut am: idc::ActiveModel = current.into();

                if let Some(name) = &renamed {
                    if name_taken(txn, name, Some(id)).await? {
                        return Err(ServiceError::ObjectExists(format!("idc {name}")));
                    }
                    am.name = Set(name.clone());
                }
                if let Some(vendor_id) = reference(patch.vendor_id) {
                    let vendor = vendor_of(txn, vendor_id).await?;
                    am.vendor_id = Set(Some(vendor.id));
                    am.vendor_name = Set(vendor.comp_fullname);
                }
                apply_text!(
                    am,
                    patch,
                    address,
                    contact,
                    contact_phone,
                    country,
                    city,
                    receiver,
                    recv_address,
                    recv_phone,
                    remarks,
                );
                am.updated_at = Set(audit.at);
                am.updated_by = Set(audit.by.clone());
                let model = am.update(txn).await?;

                if let Some(name) = renamed {
                    ip_addr::Entity::update_many()
                        .col_expr(ip_addr::Column::IdcName, Expr::value(name))
                        .col_expr(ip_addr::Column::UpdatedAt, Expr::value(audit.at))
                        .col_expr(ip_addr::Column::UpdatedBy, Expr::value(audit.by))
                        .filter(ip_addr::Column::IdcId.eq(id))
                        .exec(txn)
                        .await?;
                }
                Ok(model)
            })
        })
        .await
    }

    /// Deletes a facility and detaches the address resources placed in it.
    pub async fn delete(db: &DbConn, audit: &Audit, id: i32) -> ServiceResult<u64> {
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                if Idc::find_by_id(id).one(txn).await?.is_none() {
                    return Err(ServiceError::not_found("idc", id));
                }
                detach_ip_resources(txn, &audit, vec![id]).await?;
                let res = Idc::delete_by_id(id).exec(txn).await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn delete_batch(db: &DbConn, audit: &Audit, ids: Vec<i32>) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                detach_ip_resources(txn, &audit, ids.clone()).await?;
                let res = Idc::delete_many()
                    .filter(idc::Column::Id.is_in(ids))
                    .exec(txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn get(db: &DbConn, id: i32) -> ServiceResult<idc::Model> {
        Idc::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("idc", id))
    }

    pub async fn list(
        db: &DbConn,
        filter: &IdcFilter,
        pagination: Pagination,
    ) -> ServiceResult<Listing<idc::Model>> {
        fetch(db, filter.select(), pagination).await
    }
}

async fn detach_ip_resources<C: ConnectionTrait>(
    db: &C,
    audit: &Audit,
    idc_ids: Vec<i32>,
) -> Result<UpdateResult, DbErr> {
    ip_addr::Entity::update_many()
        .col_expr(ip_addr::Column::IdcId, Expr::value(0))
        .col_expr(ip_addr::Column::IdcName, Expr::value(""))
        .col_expr(ip_addr::Column::UpdatedAt, Expr::value(audit.at))
        .col_expr(ip_addr::Column::UpdatedBy, Expr::value(audit.by.as_str()))
        .filter(ip_addr::Column::IdcId.is_in(idc_ids))
        .exec(db)
        .await
}
