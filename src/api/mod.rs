// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{ClientCategory, ClientTypeRegistry},
    models::{AuthResponse, LoginRequest, ProfileSummary, ProfileType},
    state::AppState,
};

pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.detector.registry());

    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Credentialed CORS restricted to the configured origins.
fn cors_layer(registry: &ClientTypeRegistry) -> CorsLayer {
    let origins: Vec<HeaderValue> = registry
        .rules()
        .iter()
        .filter_map(|rule| match HeaderValue::from_str(&rule.code) {
            // Credentialed CORS cannot use a wildcard origin.
            Ok(value) if value == "*" => {
                tracing::warn!(origin = %rule.code, "Wildcard origin rule skipped for CORS");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %rule.code, "Origin rule is not a valid header value, skipping for CORS");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(auth::REFRESH_TOKEN_HEADER),
        ])
        .allow_credentials(true)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::refresh,
        auth::logout,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            LoginRequest,
            AuthResponse,
            ProfileSummary,
            ProfileType,
            ClientCategory,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Login, credential refresh and logout"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
