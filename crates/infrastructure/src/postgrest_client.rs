//! Thin PostgREST client used by the remote state store adapters.
//!
//! Covers the three calls the store needs: ordered select, upsert by key
//! columns, and delete by an equality filter. Failures are surfaced as
//! `AppError::RemoteStore` without retrying.

use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use logdesk_core::{AppError, AppResult};

const REST_PATH: &str = "rest/v1/";

/// HTTP client for a PostgREST-compatible REST endpoint.
#[derive(Clone)]
pub struct PostgrestClient {
    http_client: reqwest::Client,
    rest_url: Url,
    api_key: String,
}

impl PostgrestClient {
    /// Creates a client for the given project base URL.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> AppResult<Self> {
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base = Url::parse(normalized.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid remote store url '{base_url}': {error}"))
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "remote store url '{base_url}' must use http or https"
            )));
        }

        let rest_url = base.join(REST_PATH).map_err(|error| {
            AppError::Validation(format!("invalid remote store url '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            rest_url,
            api_key: api_key.into(),
        })
    }

    /// Selects every row of a table ordered descending by one column.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        order_desc_by: &str,
    ) -> AppResult<Vec<T>> {
        let url = self.select_url(table, order_desc_by)?;
        let response = self
            .send(self.http_client.get(url), table, "select")
            .await?;

        decode_rows(response, table, "select").await
    }

    /// Inserts or merges one row keyed by the conflict columns.
    pub async fn upsert<T: DeserializeOwned>(
        &self,
        table: &str,
        conflict_columns: &[&str],
        row: &impl Serialize,
    ) -> AppResult<T> {
        let url = self.upsert_url(table, conflict_columns)?;
        let request = self
            .http_client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(row);
        let response = self.send(request, table, "upsert").await?;

        decode_rows::<T>(response, table, "upsert")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RemoteStore(format!("{table} upsert returned no row")))
    }

    /// Deletes every row whose column equals the value; returns the count.
    pub async fn delete_eq(&self, table: &str, column: &str, value: &str) -> AppResult<u64> {
        let url = self.delete_url(table, column, value)?;
        let request = self
            .http_client
            .delete(url)
            .header("Prefer", "return=representation");
        let response = self.send(request, table, "delete").await?;

        let removed = decode_rows::<Value>(response, table, "delete").await?;
        Ok(u64::try_from(removed.len()).unwrap_or(u64::MAX))
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        self.rest_url.join(table).map_err(|error| {
            AppError::Internal(format!("invalid remote store table '{table}': {error}"))
        })
    }

    fn select_url(&self, table: &str, order_desc_by: &str) -> AppResult<Url> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", format!("{order_desc_by}.desc").as_str());
        Ok(url)
    }

    fn upsert_url(&self, table: &str, conflict_columns: &[&str]) -> AppResult<Url> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("on_conflict", conflict_columns.join(",").as_str());
        Ok(url)
    }

    fn delete_url(&self, table: &str, column: &str, value: &str) -> AppResult<Url> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair(column, format!("eq.{value}").as_str());
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        table: &str,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        let response = request
            .header("apikey", self.api_key.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|error| {
                AppError::RemoteStore(format!("{table} {operation} transport error: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::RemoteStore(format!(
                "{table} {operation} returned status {}: {body}",
                status.as_u16()
            )));
        }

        debug!(table, operation, status = status.as_u16(), "remote store call succeeded");
        Ok(response)
    }
}

async fn decode_rows<T: DeserializeOwned>(
    response: reqwest::Response,
    table: &str,
    operation: &str,
) -> AppResult<Vec<T>> {
    response.json::<Vec<T>>().await.map_err(|error| {
        AppError::RemoteStore(format!(
            "failed to decode {table} {operation} response body: {error}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use logdesk_core::AppError;
    use logdesk_domain::LogState;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::PostgrestClient;

    /// Answers exactly one HTTP request with a canned response and hands back
    /// the raw request text, lowercased.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("stub listener should bind");
        };
        let Ok(address) = listener.local_addr() else {
            panic!("stub listener should have an address");
        };

        let handle = tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return String::new();
            };
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            request.to_lowercase()
        });

        (format!("http://{address}"), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut buffer = [0_u8; 4096];

        loop {
            let read = match stream.read(&mut buffer).await {
                Ok(0) | Err(_) => break,
                Ok(read) => read,
            };
            received.extend_from_slice(&buffer[..read]);

            let text = String::from_utf8_lossy(&received);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&received).into_owned()
    }

    fn client(base_url: &str) -> PostgrestClient {
        match PostgrestClient::new(reqwest::Client::new(), base_url, "anon-key") {
            Ok(client) => client,
            Err(error) => panic!("client should build: {error}"),
        }
    }

    #[test]
    fn select_url_orders_descending() {
        let url = client("https://project.supabase.co").select_url("log_states", "updated_at");
        assert_eq!(
            url.map(|url| url.to_string()).ok().as_deref(),
            Some("https://project.supabase.co/rest/v1/log_states?select=*&order=updated_at.desc")
        );
    }

    #[test]
    fn base_path_is_kept_with_or_without_trailing_slash() {
        let with_slash = client("http://localhost:8000/store/").table_url("log_states");
        let without_slash = client("http://localhost:8000/store").table_url("log_states");

        let expected = "http://localhost:8000/store/rest/v1/log_states";
        assert_eq!(with_slash.map(|url| url.to_string()).ok().as_deref(), Some(expected));
        assert_eq!(without_slash.map(|url| url.to_string()).ok().as_deref(), Some(expected));
    }

    #[test]
    fn upsert_url_lists_conflict_columns() {
        let url = client("https://project.supabase.co")
            .upsert_url("log_states", &["log_id", "cabinet_name"]);
        assert_eq!(
            url.map(|url| url.to_string()).ok().as_deref(),
            Some("https://project.supabase.co/rest/v1/log_states?on_conflict=log_id%2Ccabinet_name")
        );
    }

    #[test]
    fn delete_filter_value_is_encoded() {
        let url = client("https://project.supabase.co").delete_url(
            "cabinet_work_sessions",
            "cabinet_name",
            "Room 1&2",
        );
        assert_eq!(
            url.map(|url| url.to_string()).ok().as_deref(),
            Some(
                "https://project.supabase.co/rest/v1/cabinet_work_sessions?cabinet_name=eq.Room+1%262"
            )
        );
    }

    #[test]
    fn non_http_urls_are_rejected() {
        let result = PostgrestClient::new(reqwest::Client::new(), "ftp://example.com", "key");
        assert!(matches!(result, Err(AppError::Validation(_))));
        let result = PostgrestClient::new(reqwest::Client::new(), "not a url", "key");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn unreachable_store_maps_to_remote_store_error() {
        let client = client("http://127.0.0.1:9");
        let result = client
            .select::<serde_json::Value>("log_states", "updated_at")
            .await;
        assert!(matches!(result, Err(AppError::RemoteStore(_))));
    }

    #[tokio::test]
    async fn error_status_maps_to_remote_store_error() {
        let (base_url, request) =
            serve_once("500 Internal Server Error", r#"{"message":"db down"}"#).await;

        let result = client(base_url.as_str())
            .select::<Value>("log_states", "updated_at")
            .await;

        let Err(AppError::RemoteStore(message)) = result else {
            panic!("expected remote store error");
        };
        assert!(message.contains("500"));
        assert!(message.contains("db down"));
        assert!(request.await.unwrap_or_default().starts_with("get "));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_remote_store_error() {
        let (base_url, _request) = serve_once("200 OK", "<html>gateway</html>").await;

        let result = client(base_url.as_str())
            .select::<Value>("cabinet_work_sessions", "updated_at")
            .await;

        let Err(AppError::RemoteStore(message)) = result else {
            panic!("expected remote store error");
        };
        assert!(message.contains("decode"));
    }

    #[tokio::test]
    async fn upsert_without_returned_row_fails() {
        let (base_url, request) = serve_once("201 Created", "[]").await;

        let result = client(base_url.as_str())
            .upsert::<Value>(
                "log_states",
                &["log_id", "cabinet_name"],
                &serde_json::json!({"log_id": "a-1", "cabinet_name": "Room1", "processed": true}),
            )
            .await;

        let Err(AppError::RemoteStore(message)) = result else {
            panic!("expected remote store error");
        };
        assert!(message.contains("returned no row"));

        let request = request.await.unwrap_or_default();
        assert!(request.starts_with("post /rest/v1/log_states?on_conflict=log_id%2ccabinet_name "));
        assert!(request.contains("prefer: resolution=merge-duplicates,return=representation"));
        assert!(request.contains("apikey: anon-key"));
        assert!(request.contains("authorization: bearer anon-key"));
        assert!(request.contains(r#""processed":true"#));
    }

    #[tokio::test]
    async fn select_decodes_log_state_rows() {
        let (base_url, request) = serve_once(
            "200 OK",
            r#"[{
                "id": "8f9c2a4e-5b1d-4c3e-9a7f-1d2e3f4a5b6c",
                "log_id": "a-1",
                "cabinet_name": "Room1",
                "processed": true,
                "comment": "fan replaced",
                "in_progress": false,
                "created_at": "2025-03-01T09:00:00Z",
                "updated_at": "2025-03-01T09:30:00Z"
            }]"#,
        )
        .await;

        let rows = client(base_url.as_str())
            .select::<LogState>("log_states", "updated_at")
            .await;

        let Ok(rows) = rows else {
            panic!("select should decode one row");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].log_id, "a-1");
        assert_eq!(rows[0].cabinet_name, "Room1");
        assert!(rows[0].processed);
        assert_eq!(rows[0].comment.as_deref(), Some("fan replaced"));
        assert!(
            request
                .await
                .unwrap_or_default()
                .starts_with("get /rest/v1/log_states?select=*&order=updated_at.desc ")
        );
    }

    #[tokio::test]
    async fn delete_counts_returned_rows() {
        let (base_url, request) = serve_once("200 OK", r#"[{"id": 1}, {"id": 2}]"#).await;

        let removed = client(base_url.as_str())
            .delete_eq("cabinet_work_sessions", "cabinet_name", "Room1")
            .await;

        assert_eq!(removed.ok(), Some(2));
        assert!(
            request
                .await
                .unwrap_or_default()
                .starts_with("delete /rest/v1/cabinet_work_sessions?cabinet_name=eq.room1 ")
        );
    }
}
