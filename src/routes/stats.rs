use crate::response::{ok, ApiResult};
use crate::AppState;
use axum::extract::State;
use netls_core::{StatsService, Summary};

pub async fn summary(State(state): State<AppState>) -> ApiResult<Summary> {
    ok(StatsService::summary(&state.conn).await?)
}
