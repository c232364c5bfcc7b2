//! Route Guard middleware.
//! Redirects based on session state before any page or API handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::routing::guard::{GuardDecision, RouteClass, RouteGuard};
use crate::session::SessionResolver;

/// State required by the guard middleware.
#[derive(Clone)]
pub struct GuardState {
    pub guard: Arc<RouteGuard>,
    pub resolver: Arc<dyn SessionResolver>,
}

pub async fn route_guard_middleware(
    State(state): State<GuardState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Public paths never need the session.
    if state.guard.classify(&path) == RouteClass::Public {
        return next.run(req).await;
    }

    // A failing resolver counts as "no session": protected pages redirect to
    // login and auth pages stay reachable.
    let authenticated = match state.resolver.resolve(req.headers()).await {
        Ok(session) => session.is_some(),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Session resolution failed, treating as signed out");
            metrics::record_session_error("guard");
            false
        }
    };

    match state.guard.decide(&path, req.uri().query(), authenticated) {
        GuardDecision::Proceed => next.run(req).await,
        GuardDecision::Redirect { location, reason } => {
            tracing::debug!(path = %path, location = %location, reason = reason.as_str(), "Guard redirect");
            metrics::record_guard_redirect(reason.as_str());
            redirect(&location)
        }
    }
}

/// 307 to `location`, or to "/" if it cannot be carried in a header.
fn redirect(location: &str) -> Response {
    let value = HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response()
}
