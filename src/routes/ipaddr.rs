use super::{IdList, IdQuery, Operator, PageQuery};
use crate::response::{ok, ApiResult};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use netls_core::entity::{ip_addr, ip_expand};
use netls_core::filter::{ExpandFilter, IpAddrFilter, Listing};
use netls_core::patch::Keyed;
use netls_core::{IpAddrPatch, IpAddrService, IpExpandPatch, NewIpAddr};

pub async fn add(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<NewIpAddr>, JsonRejection>,
) -> ApiResult<ip_addr::Model> {
    let Json(form) = body?;
    ok(IpAddrService::add(&state.conn, &operator.audit(), form).await?)
}

pub async fn update(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Keyed<IpAddrPatch>>, JsonRejection>,
) -> ApiResult<ip_addr::Model> {
    let Json(Keyed { id, patch }) = body?;
    ok(IpAddrService::update(&state.conn, &operator.audit(), id, patch).await?)
}

pub async fn update_batch(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Vec<Keyed<IpAddrPatch>>>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(patches) = body?;
    ok(IpAddrService::update_batch(&state.conn, &operator.audit(), patches).await?)
}

pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<ip_addr::Model> {
    let Query(IdQuery { id }) = query?;
    ok(IpAddrService::get(&state.conn, id).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<u64> {
    let Query(IdQuery { id }) = query?;
    ok(IpAddrService::delete(&state.conn, id).await?)
}

pub async fn delete_batch(
    State(state): State<AppState>,
    body: Result<Json<IdList>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(IdList { id_list }) = body?;
    ok(IpAddrService::delete_batch(&state.conn, id_list).await?)
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<IpAddrFilter>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<ip_addr::Model>> {
    let (Query(filter), Query(page)) = (filter?, page?);
    let pagination = page.pagination(state.page_size);
    ok(IpAddrService::list(&state.conn, &filter, pagination).await?)
}

pub async fn update_expand(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Keyed<IpExpandPatch>>, JsonRejection>,
) -> ApiResult<ip_expand::Model> {
    let Json(Keyed { id, patch }) = body?;
    ok(IpAddrService::update_expand(&state.conn, &operator.audit(), id, patch).await?)
}

pub async fn update_expand_batch(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Vec<Keyed<IpExpandPatch>>>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(patches) = body?;
    ok(IpAddrService::update_expand_batch(&state.conn, &operator.audit(), patches).await?)
}

pub async fn get_expand(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<ip_expand::Model> {
    let Query(IdQuery { id }) = query?;
    ok(IpAddrService::get_expand(&state.conn, id).await?)
}

pub async fn delete_expand(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<u64> {
    let Query(IdQuery { id }) = query?;
    ok(IpAddrService::delete_expand(&state.conn, id).await?)
}

pub async fn delete_expand_batch(
    State(state): State<AppState>,
    body: Result<Json<IdList>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(IdList { id_list }) = body?;
    ok(IpAddrService::delete_expand_batch(&state.conn, id_list).await?)
}

pub async fn list_expand(
    State(state): State<AppState>,
    filter: Result<Query<ExpandFilter>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<ip_expand::Model>> {
    let (Query(filter), Query(page)) = (filter?, page?);
    let pagination = page.pagination(state.page_size);
    ok(IpAddrService::list_expand(&state.conn, &filter, pagination).await?)
}
