use super::{IdList, IdQuery, Operator, PageQuery};
use crate::response::{ok, ApiResult};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use netls_core::entity::vendor;
use netls_core::filter::{Listing, VendorFilter};
use netls_core::patch::Keyed;
use netls_core::{NewVendor, VendorPatch, VendorService};

pub async fn add(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<NewVendor>, JsonRejection>,
) -> ApiResult<vendor::Model> {
    let Json(form) = body?;
    ok(VendorService::add(&state.conn, &operator.audit(), form).await?)
}

pub async fn update(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<Keyed<VendorPatch>>, JsonRejection>,
) -> ApiResult<vendor::Model> {
    let Json(Keyed { id, patch }) = body?;
    ok(VendorService::update(&state.conn, &operator.audit(), id, patch).await?)
}

pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<vendor::Model> {
    let Query(IdQuery { id }) = query?;
    ok(VendorService::get(&state.conn, id).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    operator: Operator,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<u64> {
    let Query(IdQuery { id }) = query?;
    ok(VendorService::delete(&state.conn, &operator.audit(), id).await?)
}

pub async fn delete_batch(
    State(state): State<AppState>,
    operator: Operator,
    body: Result<Json<IdList>, JsonRejection>,
) -> ApiResult<u64> {
    let Json(IdList { id_list }) = body?;
    ok(VendorService::delete_batch(&state.conn, &operator.audit(), id_list).await?)
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<VendorFilter>, QueryRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<vendor::Model>> {
    let (Query(filter), Query(page)) = (filter?, page?);
    let pagination = page.pagination(state.page_size);
    ok(VendorService::list(&state.conn, &filter, pagination).await?)
}
