use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::resolver::state::{ResolutionOutcome, RotationState};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RotateParams {
    action: Option<String>,
}

#[derive(Serialize)]
struct DomainFound {
    success: bool,
    domain: Url,
}

#[derive(Serialize)]
struct DomainUnavailable {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ApiInfo {
    message: &'static str,
}

/// `GET /?action=get-working-domain` — run (or join) a resolution cycle
/// and answer with one working mirror.
pub async fn rotate(
    State(state): State<AppState>,
    Query(params): Query<RotateParams>,
) -> Response {
    if params.action.as_deref() != Some("get-working-domain") {
        return Json(ApiInfo {
            message: "Domain rotator API is running. Use ?action=get-working-domain to get a domain.",
        })
        .into_response();
    }

    match state.rotator.resolve_now().await {
        Ok(ResolutionOutcome::Resolved(candidate)) => Json(DomainFound {
            success: true,
            domain: candidate.url().clone(),
        })
        .into_response(),
        Ok(ResolutionOutcome::Exhausted) => unavailable(
            "No working domains found after checking all options.",
        ),
        Ok(ResolutionOutcome::ConfigError) => unavailable("Domain list is unavailable."),
        Err(error) => {
            tracing::error!(%error, "rotation trigger failed");
            unavailable("Rotation service is shutting down.")
        }
    }
}

/// `GET /status` — last committed rotation-state snapshot, for display.
pub async fn status(State(state): State<AppState>) -> Json<RotationState> {
    Json(state.rotator.state())
}

fn unavailable(message: &'static str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(DomainUnavailable {
            success: false,
            message,
        }),
    )
        .into_response()
}
