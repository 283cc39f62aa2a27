use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use logdesk_core::ClientId;

use crate::error::ApiResult;

/// Header naming the operator client that owns the view-model state.
pub const CLIENT_HEADER: &str = "x-logdesk-client";

pub async fn resolve_client(mut request: Request, next: Next) -> ApiResult<Response> {
    let client = match request
        .headers()
        .get(CLIENT_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => ClientId::new(value)?,
        None => ClientId::default(),
    };

    request.extensions_mut().insert(client);
    Ok(next.run(request).await)
}
