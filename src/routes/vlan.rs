use super::{IdList, IdQuery, Operator, PageQuery};
use crate::response::{ok, ApiResult};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use netls_core::entity::vlan;
use netls_core::filter::{Listing, VlanFilter};
use netls_core::patch::Keyed;
use netls_core::{NewVlan, VlanPatch, VlanService};

pub async fn add(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<NewVlan>, JsonRejection>,
) -> ApiResult<vlan::Model> {
    let Json(form) = body?;
    ok(VlanService::add(&state.conn, &operator.audit(), form).await?)
}

pub async fn update(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Keyed<VlanPatch>>, JsonRejection>,
) -> ApiResult<vlan::Model> {
    let Json(Keyed { id, patch }) = body?;
    ok(VlanService::update(&state.conn, &operator.audit(), id, patch).await?)
}

pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<vlan::Model> {
    let Query(IdQuery { id }) = query?;
    ok(VlanService::get(&state.conn, id).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<u64> {
    let Query(IdQuery { id }) = query?;
    ok(VlanService::delete(&state.conn, id).await?)
}

pub async fn delete_batch(
    State(state): State<AppState>,
    body: Result<Json<IdList>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(IdList { id_list }) = body?;
    ok(VlanService::delete_batch(&state.conn, id_list).await?)
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<VlanFilter>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<vlan::Model>> {
    let (Query(filter), Query(page)) = (filter?, page?);
    let pagination = page.pagination(state.page_size);
    ok(VlanService::list(&state.conn, &filter, pagination).await?)
}
