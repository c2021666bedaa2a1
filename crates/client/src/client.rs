//! reqwest-backed worklist fetcher.

use std::time::Duration;

use lab_types::NonEmptyText;
use worklist_core::constants::WORKLIST_PATH;
use worklist_core::{SessionConfig, WorklistPage, WorklistView};

use crate::{ClientError, ClientResult, WorklistQuery};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("lab-console/", env!("CARGO_PKG_VERSION"));

/// Page size used by [`WorklistClient::fetch_all`] when the query does not set one.
const DEFAULT_PAGE_SIZE: u32 = 100;
/// Upper bound on pages followed by [`WorklistClient::fetch_all`].
const MAX_PAGES: u32 = 50;
/// Longest error body kept in [`ClientError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Client for `GET /v1/me/worklist`.
///
/// Holds one pooled `reqwest::Client`; cloning is cheap.
#[derive(Clone, Debug)]
pub struct WorklistClient {
    http: reqwest::Client,
    url: reqwest::Url,
    token: Option<NonEmptyText>,
}

impl WorklistClient {
    /// Build a client for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the endpoint URL cannot be formed, or
    /// [`ClientError::Build`] if the HTTP client cannot be created.
    pub fn new(config: &SessionConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;
        Self::with_http_client(config, http)
    }

    /// Like [`WorklistClient::new`], with a caller-provided `reqwest::Client`.
    pub fn with_http_client(config: &SessionConfig, http: reqwest::Client) -> ClientResult<Self> {
        let raw = format!("{}{}", config.api_base_url(), WORKLIST_PATH);
        let url = reqwest::Url::parse(&raw)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{raw}: {e}")))?;

        Ok(Self {
            http,
            url,
            token: config.token().cloned(),
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Fetch one response from the worklist endpoint.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingToken`] when no token is configured (no request is sent)
    /// - [`ClientError::Transport`] on connection, TLS or timeout failures
    /// - [`ClientError::Status`] on any non-2xx response
    /// - [`ClientError::Decode`] when the body is not a worklist page
    pub async fn fetch(&self, query: &WorklistQuery) -> ClientResult<WorklistPage> {
        let token = self.token.as_ref().ok_or(ClientError::MissingToken)?;

        tracing::debug!("GET {} {:?}", self.url, query);
        let response = self
            .http
            .get(self.url.clone())
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("worklist request returned HTTP {}", status.as_u16());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(body.trim(), MAX_ERROR_BODY),
            });
        }

        let bytes = response.bytes().await.map_err(ClientError::Transport)?;
        let page: WorklistPage = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            "worklist page {} returned {} of {} items",
            page.page,
            page.items.len(),
            page.total
        );
        Ok(page)
    }

    /// Fetch every page, following `has_more`, and merge the items in order.
    ///
    /// Starts at the query's page (default 1). Stops after [`MAX_PAGES`] pages; the merged
    /// page then reports `has_more = true`.
    pub async fn fetch_all(&self, query: &WorklistQuery) -> ClientResult<WorklistPage> {
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let mut page_number = query.page.unwrap_or(1);
        let mut merged = WorklistPage {
            page: page_number,
            page_size,
            ..WorklistPage::default()
        };

        for _ in 0..MAX_PAGES {
            let page = self
                .fetch(&query.clone().with_page(page_number, page_size))
                .await?;
            let received = page.items.len();
            merged.total = page.total;
            merged.has_more = page.has_more;
            merged.items.extend(page.items);

            if !page.has_more || received == 0 {
                merged.has_more = false;
                break;
            }
            page_number += 1;
        }

        if merged.has_more {
            tracing::warn!(
                "stopped after {} worklist pages; {} of {} items loaded",
                MAX_PAGES,
                merged.items.len(),
                merged.total
            );
        }
        Ok(merged)
    }
}

/// Fetch into `view` under a fresh ticket.
///
/// Returns `false` if a newer fetch was started on the same view in the meantime and this
/// response was discarded.
pub async fn refresh(
    view: &mut WorklistView,
    client: &WorklistClient,
    query: &WorklistQuery,
) -> bool {
    let ticket = view.begin_fetch();
    let outcome = client.fetch(query).await;
    view.complete_fetch(ticket, outcome)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use worklist_core::{LoadState, Locale};

    const TOKEN: &str = "test-token";

    fn worklist_item(id: u32, status: &str) -> Value {
        json!({
            "id": id,
            "kind": "assignment",
            "item_type": "lab_order",
            "item_id": id,
            "display_id": format!("ORD-{id}"),
            "item_status": status,
            "assigned_at": "2026-10-19T10:00:00Z",
            "link": format!("/orders/{id}")
        })
    }

    async fn worklist_handler(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if auth != format!("Bearer {TOKEN}") {
            return Err(StatusCode::UNAUTHORIZED);
        }

        // Three items served two per page when paging is requested.
        let all = vec![
            worklist_item(1, "RECEIVED"),
            worklist_item(2, "RELEASED"),
            worklist_item(3, "PROCESSING"),
        ];
        let status_filter = params.get("status").cloned();
        let filtered: Vec<Value> = all
            .into_iter()
            .filter(|item| {
                status_filter
                    .as_deref()
                    .map_or(true, |s| item["item_status"] == s)
            })
            .collect();

        let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let page_size: usize = params
            .get("page_size")
            .and_then(|p| p.parse().ok())
            .unwrap_or(filtered.len().max(1));
        let start = (page - 1) * page_size;
        let items: Vec<Value> = filtered.iter().skip(start).take(page_size).cloned().collect();
        let has_more = start + items.len() < filtered.len();

        Ok(Json(json!({
            "items": items,
            "total": filtered.len(),
            "page": page,
            "page_size": page_size,
            "has_more": has_more
        })))
    }

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{addr}")
    }

    async fn spawn_worklist_backend() -> String {
        spawn_backend(Router::new().route(WORKLIST_PATH, get(worklist_handler))).await
    }

    fn client_for(base_url: &str, token: Option<&str>) -> WorklistClient {
        let token = token.map(|t| NonEmptyText::new(t).expect("token"));
        let cfg = SessionConfig::new(base_url, token, Locale::Es).expect("valid config");
        WorklistClient::new(&cfg).expect("client")
    }

    #[tokio::test]
    async fn fetches_full_worklist_with_bearer_token() {
        let base = spawn_worklist_backend().await;
        let client = client_for(&base, Some(TOKEN));

        let page = client
            .fetch(&WorklistQuery::default())
            .await
            .expect("fetch should succeed");
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
        let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn sends_only_set_query_parameters() {
        let base = spawn_worklist_backend().await;
        let client = client_for(&base, Some(TOKEN));

        let query = WorklistQuery {
            status: Some("RELEASED".into()),
            ..WorklistQuery::default()
        };
        let page = client.fetch(&query).await.expect("fetch should succeed");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].item_status, "RELEASED");
    }

    #[tokio::test]
    async fn fetch_all_follows_has_more() {
        let base = spawn_worklist_backend().await;
        let client = client_for(&base, Some(TOKEN));

        let query = WorklistQuery {
            page_size: Some(2),
            ..WorklistQuery::default()
        };
        let first = client
            .fetch(&query.clone().with_page(1, 2))
            .await
            .expect("first page");
        assert!(first.has_more);

        let merged = client.fetch_all(&query).await.expect("fetch_all");
        assert_eq!(merged.items.len(), 3);
        assert_eq!(merged.total, 3);
        assert!(!merged.has_more);
    }

    #[tokio::test]
    async fn wrong_token_surfaces_status_error() {
        let base = spawn_worklist_backend().await;
        let client = client_for(&base, Some("wrong"));

        let err = client
            .fetch(&WorklistQuery::default())
            .await
            .expect_err("should be rejected");
        match err {
            ClientError::Status { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_token_fails_before_sending() {
        let client = client_for("http://127.0.0.1:9", None);
        let err = client
            .fetch(&WorklistQuery::default())
            .await
            .expect_err("should fail");
        assert!(matches!(err, ClientError::MissingToken));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let router = Router::new().route(WORKLIST_PATH, get(|| async { "<html>oops</html>" }));
        let base = spawn_backend(router).await;
        let client = client_for(&base, Some(TOKEN));

        let err = client
            .fetch(&WorklistQuery::default())
            .await
            .expect_err("should fail to decode");
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn server_error_body_is_kept_in_message() {
        let router = Router::new().route(
            WORKLIST_PATH,
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn_backend(router).await;
        let client = client_for(&base, Some(TOKEN));

        let err = client
            .fetch(&WorklistQuery::default())
            .await
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "worklist request failed with HTTP 502: upstream down"
        );
    }

    #[tokio::test]
    async fn refresh_moves_view_to_failed_on_error() {
        let router = Router::new().route(
            WORKLIST_PATH,
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_backend(router).await;
        let client = client_for(&base, Some(TOKEN));

        let mut view = WorklistView::new(Locale::Es);
        assert!(refresh(&mut view, &client, &WorklistQuery::default()).await);
        assert!(matches!(view.state(), LoadState::Failed { .. }));
        assert!(view.items().is_empty());
    }

    #[tokio::test]
    async fn refresh_loads_items_into_view() {
        let base = spawn_worklist_backend().await;
        let client = client_for(&base, Some(TOKEN));

        let mut view = WorklistView::new(Locale::Es);
        assert!(refresh(&mut view, &client, &WorklistQuery::default()).await);
        assert_eq!(view.state(), &LoadState::Loaded);
        assert_eq!(view.items().len(), 3);
        // RELEASED is hidden by default.
        assert_eq!(view.visible_items().len(), 2);
    }

    #[test]
    fn endpoint_url_is_joined_to_base() {
        let client = client_for("https://lab.example.org/api/", Some(TOKEN));
        assert_eq!(
            client.url().as_str(),
            "https://lab.example.org/api/v1/me/worklist"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("áéíóú", 3), "áéí…");
        assert_eq!(truncate("short", 10), "short");
    }
}
