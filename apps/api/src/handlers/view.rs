use axum::Json;
use axum::extract::{Extension, State};
use logdesk_core::ClientId;

use super::view_response;
use crate::dto::{RefreshResponse, ShowProcessedRequest, ViewResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn set_show_processed_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
    Json(payload): Json<ShowProcessedRequest>,
) -> Json<ViewResponse> {
    let session = state.workspaces.session(&client).await;
    let mut session = session.lock().await;
    session.set_show_processed(payload.show_processed);

    Json(view_response(&session))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> ApiResult<Json<RefreshResponse>> {
    let session = state.workspaces.session(&client).await;
    let mut session = session.lock().await;
    session.refresh().await?;

    Ok(Json(RefreshResponse {
        log_states: session.log_states().len(),
        cabinet_sessions: session.cabinet_sessions().len(),
    }))
}
