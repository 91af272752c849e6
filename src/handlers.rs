// HTTP surface: routes requests to the submission use case and maps results
// onto status codes and JSON bodies.

use crate::application::{
    ErrorResponse, SubmissionError, SubmissionRequest, SubmissionScope, SubmitUseCase,
};
use hyper::body::HttpBody;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

/// Shared per-server state handed to every request.
pub struct AppState {
    pub usecase: SubmitUseCase,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(usecase: SubmitUseCase, max_body_bytes: usize) -> Self {
        Self {
            usecase,
            max_body_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Health,
    Submissions(SubmissionScope),
}

fn route(path: &str) -> Option<Route> {
    let path = path.trim_end_matches('/');

    match path {
        "/health" => Some(Route::Health),
        "/submissions" | "/api/users" => Some(Route::Submissions(SubmissionScope::GENERAL)),
        "/submissions/face" | "/api/face" => Some(Route::Submissions(SubmissionScope::FACE)),
        "/submissions/digilocker" | "/api/digilocker" => {
            Some(Route::Submissions(SubmissionScope::DIGILOCKER))
        }
        _ => None,
    }
}

pub async fn handle_request(
    req: Request<Body>,
    state: Arc<AppState>,
) -> Result<Response<Body>, Infallible> {
    tracing::debug!(method = %req.method(), path = req.uri().path(), "request received");

    let response = match (route(req.uri().path()), req.method()) {
        (Some(Route::Health), &Method::GET) => {
            json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
        }
        (Some(Route::Submissions(scope)), &Method::POST) => create(req, state, scope).await,
        (Some(Route::Submissions(scope)), &Method::GET) => list(state, scope).await,
        (Some(_), _) => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        (None, _) => error_response(StatusCode::NOT_FOUND, "Not found"),
    };

    Ok(response)
}

async fn create(req: Request<Body>, state: Arc<AppState>, scope: SubmissionScope) -> Response<Body> {
    let body = match read_body(req, state.max_body_bytes).await {
        Ok(body) => body,
        Err(response) => return response,
    };

    let request: SubmissionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(scope = scope.label, error = %e, "rejected malformed JSON body");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let usecase = state.usecase.clone();
    let result = tokio::task::spawn_blocking(move || usecase.create(&scope, request))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(scope = scope.label, error = %e, "create task did not complete");
            Err(SubmissionError::Storage)
        });

    match result {
        Ok(record) => {
            tracing::info!(
                scope = scope.label,
                id = %record.id,
                document_type = %record.document_type,
                "submission stored"
            );
            json_response(StatusCode::CREATED, &record)
        }
        Err(e) if e.is_client_error() => {
            tracing::warn!(scope = scope.label, error = %e, "submission rejected");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to save {}", scope.label),
        ),
    }
}

async fn list(state: Arc<AppState>, scope: SubmissionScope) -> Response<Body> {
    let usecase = state.usecase.clone();
    let result = tokio::task::spawn_blocking(move || usecase.list(&scope))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(scope = scope.label, error = %e, "list task did not complete");
            Err(SubmissionError::Storage)
        });

    match result {
        Ok(records) => json_response(StatusCode::OK, &records),
        Err(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to fetch {}", scope.list_label),
        ),
    }
}

/// Collect the request body, refusing anything over `limit` bytes.
async fn read_body(req: Request<Body>, limit: usize) -> Result<Vec<u8>, Response<Body>> {
    let too_large = || error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");

    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.map_or(false, |len| len > limit) {
        return Err(too_large());
    }

    let mut body = req.into_body();
    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|e| {
            tracing::warn!(error = %e, "failed to read request body");
            error_response(StatusCode::BAD_REQUEST, "Invalid request body")
        })?;
        if buf.len() + chunk.len() > limit {
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            let mut response = Response::new(Body::from(r#"{"error":"Internal server error"}"#));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    json_response(status, &ErrorResponse::new(message))
}
