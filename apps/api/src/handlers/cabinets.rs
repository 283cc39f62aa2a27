use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use logdesk_core::ClientId;
use logdesk_domain::CabinetWorkSession;

use crate::dto::{CabinetListResponse, EndWorkResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_cabinets_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> Json<CabinetListResponse> {
    let session = state.workspaces.session(&client).await;
    let session = session.lock().await;

    Json(CabinetListResponse {
        active_cabinet: session.active_cabinet().map(ToOwned::to_owned),
        cabinets: session.cabinet_overview(),
    })
}

pub async fn list_work_sessions_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
) -> Json<Vec<CabinetWorkSession>> {
    let session = state.workspaces.session(&client).await;
    let sessions = session.lock().await.cabinet_sessions().to_vec();
    Json(sessions)
}

pub async fn start_work_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
    Path(cabinet_name): Path<String>,
) -> ApiResult<(StatusCode, Json<CabinetWorkSession>)> {
    let session = state.workspaces.session(&client).await;
    let work_session = session
        .lock()
        .await
        .start_work(cabinet_name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(work_session)))
}

pub async fn end_work_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientId>,
    Path(cabinet_name): Path<String>,
) -> ApiResult<Json<EndWorkResponse>> {
    let session = state.workspaces.session(&client).await;
    let removed_sessions = session
        .lock()
        .await
        .end_work(cabinet_name.as_str())
        .await?;

    Ok(Json(EndWorkResponse {
        cabinet_name,
        removed_sessions,
    }))
}
