//! Route handlers for the HTTP API.
//!
//! Handlers work on a plain [`ApiRequest`] and return an [`EndpointResponse`]
//! instead of writing to the session, so routing is testable without a
//! listening socket. The pingora application in `super` only moves bytes.
//!
//! | Method | Path       | Response                                       |
//! |--------|------------|------------------------------------------------|
//! | GET    | `/`        | `{"application": "mockup"}`                    |
//! | GET    | `/version` | `{"version": "..."}`                           |
//! | GET    | `/health`  | `{"status": "healthy", "uptime_seconds", ...}` |
//! | POST   | `/outline` | `{"image": "<base64>"}`                        |
//! | POST   | `/paste`   | `{"image": "<base64>"}`                        |

use std::sync::Arc;
use std::time::Instant;

use http::Method;
use serde::Deserialize;

use crate::catalog::{CatalogStore, TenantCatalog};
use crate::constants::APPLICATION_NAME;
use crate::engine::{DesignInput, Engine};
use crate::error::ServiceError;

/// Response produced by a route handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// JSON error body `{"error": "...", "status": n}`.
    pub fn error(err: &ServiceError) -> Self {
        let status = err.status_code();
        let body = serde_json::json!({
            "error": err.to_string(),
            "status": status,
        })
        .to_string();
        Self::json(status, body)
    }
}

/// The parts of an HTTP request the routes look at.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub body: Vec<u8>,
}

/// Shared, read-only state behind every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub engine: Engine,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<CatalogStore>, engine: Engine) -> Self {
        Self {
            store,
            engine,
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutlineRequest {
    #[serde(default)]
    template: String,
    #[serde(default)]
    position: String,
}

#[derive(Debug, Deserialize)]
struct PasteRequest {
    #[serde(default)]
    template: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    design: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl PasteRequest {
    fn design_input(&self) -> Result<DesignInput, ServiceError> {
        let design = self.design.as_deref().filter(|d| !d.is_empty());
        let image = self.image.as_deref().filter(|i| !i.is_empty());

        match (design, image) {
            (Some(name), None) => Ok(DesignInput::Named(name.to_string())),
            (None, Some(data)) => Ok(DesignInput::Inline(data.to_string())),
            (Some(_), Some(_)) => Err(ServiceError::BadRequest(
                "provide either 'design' or 'image', not both".to_string(),
            )),
            (None, None) => Err(ServiceError::BadRequest(
                "missing parameter 'design' or 'image'".to_string(),
            )),
        }
    }
}

/// Dispatch a request to its handler.
pub async fn handle_request(state: &AppState, request: &ApiRequest) -> EndpointResponse {
    let path = normalize_path(&request.path);

    let result = match (path, request.method.as_str()) {
        ("/", "GET") => Ok(handle_root()),
        ("/version", "GET") => Ok(handle_version()),
        ("/health", "GET") => Ok(handle_health(state.start_time)),
        ("/outline", "POST") => handle_outline(state, request).await,
        ("/paste", "POST") => handle_paste(state, request).await,
        ("/" | "/version" | "/health" | "/outline" | "/paste", method) => {
            Err(ServiceError::MethodNotAllowed(method.to_string()))
        }
        (path, _) => Err(ServiceError::RouteNotFound(path.to_string())),
    };

    result.unwrap_or_else(|err| {
        if err.status_code() >= 500 {
            tracing::error!(error = %err, status = err.status_code(), "Request failed");
        } else {
            tracing::info!(error = %err, status = err.status_code(), "Request rejected");
        }
        EndpointResponse::error(&err)
    })
}

fn normalize_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

fn handle_root() -> EndpointResponse {
    let body = serde_json::json!({ "application": APPLICATION_NAME }).to_string();
    EndpointResponse::json(200, body)
}

fn handle_version() -> EndpointResponse {
    let body = serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }).to_string();
    EndpointResponse::json(200, body)
}

/// Health status with uptime and version information.
fn handle_health(start_time: Instant) -> EndpointResponse {
    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION")
    })
    .to_string();

    EndpointResponse::json(200, body)
}

async fn handle_outline(
    state: &AppState,
    request: &ApiRequest,
) -> Result<EndpointResponse, ServiceError> {
    let tenant = select_tenant(state, request)?;
    let body: OutlineRequest = parse_body(&request.body)?;
    require("template", &body.template)?;
    require("position", &body.position)?;

    tracing::info!(
        tenant = %tenant.tenant,
        template = %body.template,
        position = %body.position,
        "Outline requested"
    );

    let image = state
        .engine
        .outline(&tenant.catalog, &body.template, &body.position)
        .await?;

    Ok(image_response(image))
}

async fn handle_paste(
    state: &AppState,
    request: &ApiRequest,
) -> Result<EndpointResponse, ServiceError> {
    let tenant = select_tenant(state, request)?;
    let body: PasteRequest = parse_body(&request.body)?;
    require("template", &body.template)?;
    require("position", &body.position)?;
    let design = body.design_input()?;

    tracing::info!(
        tenant = %tenant.tenant,
        template = %body.template,
        position = %body.position,
        design = body.design.as_deref().unwrap_or("<inline>"),
        "Paste requested"
    );

    let image = state
        .engine
        .paste(&tenant.catalog, &body.template, &body.position, &design)
        .await?;

    Ok(image_response(image))
}

fn select_tenant(state: &AppState, request: &ApiRequest) -> Result<TenantCatalog, ServiceError> {
    Ok(state.store.catalog_for(request.api_key.as_deref())?)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    if body.is_empty() {
        return Err(ServiceError::BadRequest("request body is empty".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::BadRequest(format!("invalid JSON body: {}", e)))
}

fn require(name: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!(
            "missing parameter '{}'",
            name
        )));
    }
    Ok(())
}

fn image_response(image: String) -> EndpointResponse {
    EndpointResponse::json(200, serde_json::json!({ "image": image }).to_string())
}
