use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use logdesk_core::ClientId;
use logdesk_domain::{LogState, LogStateKey, LogStats};

use super::view_response;
use crate::dto::{
    CabinetGroupResponse, GroupedLogsResponse, LogEntryResponse, LogListResponse,
    UpdateLogStateRequest, UploadResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn upload_logs_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
    body: String,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let session = state.workspaces.session(&client).await;
    let mut session = session.lock().await;
    let uploaded = session.upload_logs(body.as_str())?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            uploaded,
            stats: LogStats::from_entries(session.logs()),
        }),
    ))
}

pub async fn list_logs_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> Json<LogListResponse> {
    let session = state.workspaces.session(&client).await;
    let session = session.lock().await;

    Json(LogListResponse {
        view: view_response(&session),
        logs: session
            .filtered_logs()
            .into_iter()
            .map(LogEntryResponse::from)
            .collect(),
    })
}

pub async fn grouped_logs_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> Json<GroupedLogsResponse> {
    let session = state.workspaces.session(&client).await;
    let session = session.lock().await;

    let groups = session
        .grouped_logs()
        .iter()
        .map(|group| {
            CabinetGroupResponse::from_group(group, session.is_in_session(group.cabinet_name))
        })
        .collect();

    Json(GroupedLogsResponse {
        view: view_response(&session),
        groups,
    })
}

pub async fn log_stats_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> Json<LogStats> {
    let session = state.workspaces.session(&client).await;
    let stats = session.lock().await.stats();
    Json(stats)
}

pub async fn update_log_state_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
    Path((cabinet_name, log_id)): Path<(String, String)>,
    Json(payload): Json<UpdateLogStateRequest>,
) -> ApiResult<Json<LogState>> {
    let session = state.workspaces.session(&client).await;
    let persisted = session
        .lock()
        .await
        .update_log_state(LogStateKey::new(log_id, cabinet_name), payload.into())
        .await?;

    Ok(Json(persisted))
}
