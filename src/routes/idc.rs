use super::{IdList, IdQuery, Operator, PageQuery};
use crate::response::{ok, ApiResult};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use netls_core::entity::idc;
use netls_core::filter::{IdcFilter, Listing};
use netls_core::patch::Keyed;
use netls_core::{IdcPatch, IdcService, NewIdc};

pub async fn add(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<NewIdc>, JsonRejection>,
) -> ApiResult<idc::Model> {
    let Json(form) = body?;
    ok(IdcService::add(&state.conn, &operator.audit(), form).await?)
}

pub async fn update(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Keyed<IdcPatch>>, JsonRejection>,
) -> ApiResult<idc::Model> {
    let Json(Keyed { id, patch }) = body?;
    ok(IdcService::update(&state.conn, &operator.audit(), id, patch).await?)
}

pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<idc::Model> {
    let Query(IdQuery { id }) = query?;
    ok(IdcService::get(&state.conn, id).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    operator: Operator,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<u64> {
    let Query(IdQuery { id }) = query?;
    ok(IdcService::delete(&state.conn, &operator.audit(), id).await?)
}

pub async fn delete_batch(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<IdList>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(IdList { id_list }) = body?;
    ok(IdcService::delete_batch(&state.conn, &operator.audit(), id_list).await?)
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<IdcFilter>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<idc::Model>> {
    let (Query(filter), Query(page)) = (filter?, page?);
    let pagination = page.pagination(state.page_size);
    ok(IdcService::list(&state.conn, &filter, pagination).await?)
}
