use crate::error::{ServiceError, ServiceResult};
use crate::filter::{fetch, Listing, Pagination, VendorFilter};
use crate::fingerprint::vendor_fingerprint;
use crate::patch::{apply_text, text, Audit};
use crate::txn::transactional;
use ::entity::{idc, vendor, vendor::Entity as Vendor};
use deunicode::deunicode;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};

/// Upper bound on the short name, in characters.
pub const SHORT_NAME_LEN: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVendor {
    pub comp_fullname: String,
    pub comp_name: String,
    pub contact: String,
    pub contact_phone: String,
    pub receiver: String,
    pub recv_address: String,
    pub recv_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorPatch {
    pub comp_fullname: Option<String>,
    pub comp_name: Option<String>,
    pub contact: Option<String>,
    pub contact_phone: Option<String>,
    pub receiver: Option<String>,
    pub recv_address: Option<String>,
    pub recv_phone: Option<String>,
}

/// Short name derived from a full name: transliterated to ASCII, whitespace
/// collapsed, at most [`SHORT_NAME_LEN`] characters.
pub fn short_name(fullname: &str) -> String {
    let ascii = deunicode(fullname);
    let collapsed = ascii.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .take(SHORT_NAME_LEN)
        .collect::<String>()
        .trim_end()
        .to_owned()
}

fn checked_short_name(name: String) -> ServiceResult<String> {
    if name.chars().count() > SHORT_NAME_LEN {
        return Err(ServiceError::param(format!(
            "comp_name must be at most {SHORT_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

pub struct VendorService;

impl VendorService {
    pub async fn add(db: &DbConn, audit: &Audit, form: NewVendor) -> ServiceResult<vendor::Model> {
        let fullname = form.comp_fullname.trim().to_owned();
        if fullname.is_empty() {
            return Err(ServiceError::param("comp_fullname is required"));
        }
        let comp_name = match form.comp_name.trim() {
            "" => short_name(&fullname),
            name => checked_short_name(name.to_owned())?,
        };
        let comp_hash = vendor_fingerprint(&fullname);
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let exists = Vendor::find()
                    .filter(vendor::Column::CompHash.eq(comp_hash.as_str()))
                    .one(txn)
                    .await?;
                if exists.is_some() {
                    return Err(ServiceError::ObjectExists(format!("vendor {fullname}")));
                }

                let model = vendor::ActiveModel {
                    comp_hash: Set(comp_hash),
                    comp_name: Set(comp_name),
                    comp_fullname: Set(fullname),
                    contact: Set(form.contact.trim().to_owned()),
                    contact_phone: Set(form.contact_phone.trim().to_owned()),
                    receiver: Set(form.receiver.trim().to_owned()),
                    recv_address: Set(form.recv_address.trim().to_owned()),
                    recv_phone: Set(form.recv_phone.trim().to_owned()),
                    created_at: Set(audit.at),
                    updated_at: Set(audit.at),
                    created_by: Set(audit.by.clone()),
                    updated_by: Set(audit.by),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                tracing::info!(id = model.id, name = %model.comp_fullname, "vendor added");
                Ok(model)
            })
        })
        .await
    }

    /// Applies a sparse patch. A new full name is re-hashed and copied onto
    /// every facility of the vendor.
    pub async fn update(
        db: &DbConn,
        audit: &Audit,
        id: i32,
        patch: VendorPatch,
    ) -> ServiceResult<vendor::Model> {
        let comp_name = text(&patch.comp_name).map(checked_short_name).transpose()?;
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                let current = Vendor::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vendor", id))?;

                let renamed = text(&patch.comp_fullname).filter(|n| *n != current.comp_fullname);
                let mut am: vendor::ActiveModel = current.into();

                if let Some(fullname) = &renamed {
                    let comp_hash = vendor_fingerprint(fullname);
                    let taken = Vendor::find()
                        .filter(vendor::Column::CompHash.eq(comp_hash.as_str()))
                        .filter(vendor::Column::Id.ne(id))
                        .one(txn)
                        .await?;
                    if taken.is_some() {
                        return Err(ServiceError::ObjectExists(format!("vendor {fullname}")));
                    }
                    am.comp_fullname = Set(fullname.clone());
                    am.comp_hash = Set(comp_hash);
                }
                if let Some(name) = comp_name {
                    am.comp_name = Set(name);
                }
                apply_text!(am, patch, contact, contact_phone, receiver, recv_address, recv_phone);
                am.updated_at = Set(audit.at);
                am.updated_by = Set(audit.by.clone());
                let model = am.update(txn).await?;

                if let Some(fullname) = renamed {
                    let res = idc::Entity::update_many()
                        .col_expr(idc::Column::VendorName, Expr::value(fullname))
                        .col_expr(idc::Column::UpdatedAt, Expr::value(audit.at))
                        .col_expr(idc::Column::UpdatedBy, Expr::value(audit.by))
                        .filter(idc::Column::VendorId.eq(id))
                        .exec(txn)
                        .await?;
                    tracing::debug!(id, facilities = res.rows_affected, "vendor renamed");
                }
                Ok(model)
            })
        })
        .await
    }

    pub async fn delete(db: &DbConn, audit: &Audit, id: i32) -> ServiceResult<u64> {
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                if Vendor::find_by_id(id).one(txn).await?.is_none() {
                    return Err(ServiceError::not_found("vendor", id));
                }
                detach_facilities(txn, &audit, vec![id]).await?;
                let res = Vendor::delete_by_id(id).exec(txn).await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    /// Deletes every listed vendor that exists; unknown ids are ignored.
    pub async fn delete_batch(db: &DbConn, audit: &Audit, ids: Vec<i32>) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let audit = audit.clone();

        transactional(db, |txn| {
            Box::pin(async move {
                detach_facilities(txn, &audit, ids.clone()).await?;
                let res = Vendor::delete_many()
                    .filter(vendor::Column::Id.is_in(ids))
                    .exec(txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }

    pub async fn get(db: &DbConn, id: i32) -> ServiceResult<vendor::Model> {
        Vendor::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("vendor", id))
    }

    pub async fn list(
        db: &DbConn,
        filter: &VendorFilter,
        pagination: Pagination,
    ) -> ServiceResult<Listing<vendor::Model>> {
        fetch(db, filter.select(), pagination).await
    }
}

async fn detach_facilities<C: ConnectionTrait>(
    db: &C,
    audit: &Audit,
    vendor_ids: Vec<i32>,
) -> Result<UpdateResult, DbErr> {
    idc::Entity::update_many()
        .col_expr(idc::Column::VendorId, Expr::value(Option::<i32>::None))
        .col_expr(idc::Column::VendorName, Expr::value(""))
        .col_expr(idc::Column::UpdatedAt, Expr::value(audit.at))
        .col_expr(idc::Column::UpdatedBy, Expr::value(audit.by.as_str()))
        .filter(idc::Column::VendorId.is_in(vendor_ids))
        .exec(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_names_collapse_whitespace() {
        assert_eq!(short_name("  Acme   Networks,\tInc. "), "Acme Networks, Inc.");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn short_names_are_transliterated() {
        assert_eq!(short_name("Ångström Télécom"), "Angstrom Telecom");
        let name = short_name("北京电信");
        assert!(name.is_ascii());
        assert!(name.starts_with("Bei Jing"), "{name}");
    }

    #[test]
    fn short_names_are_bounded() {
        let name = short_name("International Business Machines Corporation");
        assert_eq!(name, "International Business Machines");
        assert!(name.chars().count() <= SHORT_NAME_LEN);
        let cjk = short_name(&"数".repeat(40));
        assert!(cjk.is_ascii());
        assert!(!cjk.is_empty() && cjk.chars().count() <= SHORT_NAME_LEN);
    }

    #[test]
    fn explicit_short_name_is_checked() {
        assert!(checked_short_name("a".repeat(32)).is_ok());
        assert!(matches!(
            checked_short_name("a".repeat(33)),
            Err(ServiceError::InvalidParam(_))
        ));
    }
}
