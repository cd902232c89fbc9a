use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::Json;
use serde::Serialize;

use improc::stock::EngineSummary;
use improc_core::{ArgValue, ParsedQuery, Registry};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// GET /parse?<query>
///
/// The whole raw query string is the operation query, e.g.
/// `GET /parse?resize=100,200&png&foo=bar`. Unclaimed fragments come back
/// in `leftover`.
pub async fn parse(
    State(registry): State<Arc<Registry>>,
    RawQuery(query): RawQuery,
) -> Json<ApiResponse<ParsedQuery>> {
    let Some(query) = query else {
        return Json(ApiResponse::err("missing query string"));
    };
    log::debug!("parsing query: {query}");
    Json(ApiResponse::ok(registry.parse(&query)))
}

#[derive(Debug, Serialize)]
pub struct ValidationResult {
    name: String,
    args: Vec<ArgValue>,
    valid: bool,
}

/// GET /validate?<name>[=args]
///
/// Checks a single operation fragment without building a pipeline.
pub async fn validate(
    State(registry): State<Arc<Registry>>,
    RawQuery(query): RawQuery,
) -> Json<ApiResponse<ValidationResult>> {
    let Some(query) = query else {
        return Json(ApiResponse::err("missing operation fragment"));
    };
    let parsed = registry.parse(&query);
    match parsed.operations.into_iter().next() {
        Some(op) => Json(ApiResponse::ok(ValidationResult {
            valid: true,
            name: op.name,
            args: op.args,
        })),
        None => Json(ApiResponse::ok(ValidationResult {
            name: query,
            args: Vec::new(),
            valid: false,
        })),
    }
}

/// GET /engines
pub async fn engines(
    State(registry): State<Arc<Registry>>,
) -> Json<ApiResponse<Vec<EngineSummary>>> {
    let mut engines: Vec<EngineSummary> = registry.engines().map(EngineSummary::from).collect();
    engines.sort_by(|a, b| a.name.cmp(&b.name));
    Json(ApiResponse::ok(engines))
}
