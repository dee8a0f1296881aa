use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post, put};
use axum::Router;
use netls_core::filter::Pagination;
use netls_core::patch::Audit;
use serde::Deserialize;
use std::convert::Infallible;

mod idc;
mod ipaddr;
mod stats;
mod vendor;
mod vlan;

/// Header naming the operator recorded in the audit columns.
pub const OPERATOR_HEADER: &str = "x-operator";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stats::summary))
        .route("/statistics", get(stats::summary))
        .route(
            "/vendor/",
            post(vendor::add)
                .put(vendor::update)
                .get(vendor::get)
                .delete(vendor::delete),
        )
        .route("/vendor/list", get(vendor::list).delete(vendor::delete_batch))
        .route(
            "/idc/",
            post(idc::add).put(idc::update).get(idc::get).delete(idc::delete),
        )
        .route("/idc/list", get(idc::list).delete(idc::delete_batch))
        .route(
            "/vlanid/",
            post(vlan::add).put(vlan::update).get(vlan::get).delete(vlan::delete),
        )
        .route("/vlanid/list", get(vlan::list).delete(vlan::delete_batch))
        .route(
            "/ipaddr/",
            post(ipaddr::add)
                .put(ipaddr::update)
                .get(ipaddr::get)
                .delete(ipaddr::delete),
        )
        .route("/ipaddr/list", get(ipaddr::list).delete(ipaddr::delete_batch))
        .route("/ipaddr/batch", put(ipaddr::update_batch))
        .route(
            "/ipaddr/expand/",
            put(ipaddr::update_expand)
                .get(ipaddr::get_expand)
                .delete(ipaddr::delete_expand),
        )
        .route(
            "/ipaddr/expand/list",
            get(ipaddr::list_expand).delete(ipaddr::delete_expand_batch),
        )
        .route("/ipaddr/expand/batch", put(ipaddr::update_expand_batch))
}

/// Operator taken from the [`OPERATOR_HEADER`], empty when absent.
#[derive(Debug, Clone, Default)]
pub struct Operator(pub String);

impl Operator {
    pub fn audit(&self) -> Audit {
        Audit::now(self.0.as_str())
    }
}

impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Ok(Operator(name.trim().to_owned()))
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct IdList {
    pub id_list: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    /// 1-indexed; `0` or absent returns every row.
    pub page: u64,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self, default_size: u64) -> Pagination {
        let size = self.page_size.filter(|s| *s > 0).unwrap_or(default_size);
        Pagination::new(self.page, size)
    }
}
