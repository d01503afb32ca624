// Server module - Pingora HTTP application and service setup

pub mod routes;

pub use routes::{handle_request, ApiRequest, AppState, EndpointResponse};

use async_trait::async_trait;
use http::{header, Response};
use pingora_core::apps::http_app::{HttpServer, ServeHttp};
use pingora_core::protocols::http::ServerSession;
use pingora_core::services::listening::Service;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::constants::API_KEY_HEADER;
use crate::error::ServiceError;

/// Header echoing the request id back to the client
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Pingora application serving the JSON API.
pub struct MockupApp {
    state: AppState,
    max_body_size: usize,
}

impl MockupApp {
    pub fn new(state: AppState, max_body_size: usize) -> Self {
        Self {
            state,
            max_body_size,
        }
    }

    /// Read the whole request body, refusing anything over `max_body_size`.
    async fn read_body(&self, session: &mut ServerSession) -> Result<Vec<u8>, ServiceError> {
        let declared = session
            .req_header()
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());

        if declared.is_some_and(|len| len > self.max_body_size) {
            return Err(ServiceError::PayloadTooLarge(self.max_body_size));
        }

        let mut body = Vec::with_capacity(declared.unwrap_or(0));
        loop {
            match session.read_request_body().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > self.max_body_size {
                        return Err(ServiceError::PayloadTooLarge(self.max_body_size));
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(ServiceError::BadRequest(format!(
                        "failed to read request body: {}",
                        e
                    )))
                }
            }
        }

        Ok(body)
    }

    async fn respond(&self, session: &mut ServerSession) -> EndpointResponse {
        let (method, path, api_key) = {
            let req = session.req_header();
            let api_key = req
                .headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            (req.method.clone(), req.uri.path().to_string(), api_key)
        };

        let body = match self.read_body(session).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "Request body rejected");
                return EndpointResponse::error(&err);
            }
        };

        let request = ApiRequest {
            method,
            path,
            api_key,
            body,
        };
        handle_request(&self.state, &request).await
    }
}

#[async_trait]
impl ServeHttp for MockupApp {
    async fn response(&self, session: &mut ServerSession) -> Response<Vec<u8>> {
        let request_id = Uuid::new_v4().to_string();
        let started = std::time::Instant::now();
        let span = {
            let req = session.req_header();
            tracing::info_span!(
                "request",
                request_id = %request_id,
                method = %req.method,
                path = %req.uri.path(),
            )
        };

        let endpoint = self.respond(session).instrument(span.clone()).await;

        span.in_scope(|| {
            tracing::info!(
                status = endpoint.status,
                duration_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            )
        });

        build_response(endpoint, &request_id)
    }
}

/// Turn a handler response into the HTTP response pingora writes.
pub fn build_response(endpoint: EndpointResponse, request_id: &str) -> Response<Vec<u8>> {
    let body = endpoint.body.into_bytes();
    let response = Response::builder()
        .status(endpoint.status)
        .header(header::CONTENT_TYPE, endpoint.content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .header(REQUEST_ID_HEADER, request_id)
        .body(body);

    response.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build response");
        let mut fallback = Response::new(Vec::new());
        *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Listening service for the API on the configured address.
pub fn build_service(config: &ServerConfig, state: AppState) -> Service<HttpServer<MockupApp>> {
    let app = MockupApp::new(state, config.max_body_size);
    let mut service = Service::new("mockup api".to_string(), HttpServer::new_app(app));
    service.add_tcp(&config.listen_addr());
    service.threads = Some(config.threads);
    service
}
