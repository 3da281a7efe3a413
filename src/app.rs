use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath},
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post, put, MethodRouter},
    Extension, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::Span;

use crate::{
    api::{
        emergency_contacts, health, help_requests, middleware::auth_middleware, relief_supplies,
        rescue_operations, volunteers,
    },
    auth::TokenAuthority,
    config::Config,
    store::Store,
};

/// Builds the full HTTP application: `/api/v1` routes, request pipeline and
/// the optional static frontend.
///
/// The pipeline runs CORS first (answering preflights itself), then request
/// logging, then bearer auth on the mutating routes when it is required.
pub fn app(store: Store, config: &Config) -> Router {
    let reads = Router::new()
        .route("/help-requests", get(help_requests::list_help_requests))
        .route("/help-requests/:id", get(help_requests::get_help_request))
        .route("/volunteers", get(volunteers::list_volunteers))
        .route("/volunteers/:id", get(volunteers::get_volunteer))
        .route("/relief-supplies", get(relief_supplies::list_relief_supplies))
        .route("/relief-supplies/:id", get(relief_supplies::get_relief_supply))
        .route(
            "/relief-supplies/category/:category",
            get(relief_supplies::list_supplies_by_category),
        )
        .route(
            "/relief-supplies/available/:available",
            get(relief_supplies::list_supplies_by_availability),
        )
        .route(
            "/rescue-operations",
            get(rescue_operations::list_rescue_operations),
        )
        .route(
            "/rescue-operations/:id",
            get(rescue_operations::get_rescue_operation),
        )
        .route(
            "/rescue-operations/status/active",
            get(rescue_operations::list_active_operations),
        )
        .route(
            "/rescue-operations/priority/:priority",
            get(rescue_operations::list_operations_by_priority),
        )
        .route(
            "/emergency-contacts",
            get(emergency_contacts::list_emergency_contacts),
        )
        .route(
            "/emergency-contacts/:id",
            get(emergency_contacts::get_emergency_contact),
        )
        .route(
            "/emergency-contacts/status/active",
            get(emergency_contacts::list_active_contacts),
        )
        .route(
            "/emergency-contacts/service/:service_type",
            get(emergency_contacts::list_contacts_by_service),
        );

    // Auth wraps each write endpoint, not the router; unsupported methods get
    // a plain 405.
    let auth = config.require_auth.then(|| {
        let authority = config.jwt_secret.as_deref().map(TokenAuthority::new);
        if authority.is_none() {
            tracing::error!("Authentication required but no JWT secret configured");
        }
        authority
    });
    let guard = |route: MethodRouter| match &auth {
        Some(authority) => {
            route.route_layer(from_fn_with_state(authority.clone(), auth_middleware))
        }
        None => route,
    };

    let writes = Router::new()
        .route("/help-requests", guard(post(help_requests::create_help_request)))
        .route(
            "/help-requests/:id",
            guard(
                put(help_requests::update_help_request).delete(help_requests::delete_help_request),
            ),
        )
        .route("/volunteers", guard(post(volunteers::create_volunteer)))
        .route(
            "/volunteers/:id",
            guard(put(volunteers::update_volunteer).delete(volunteers::delete_volunteer)),
        )
        .route(
            "/relief-supplies",
            guard(post(relief_supplies::create_relief_supply)),
        )
        .route(
            "/relief-supplies/:id",
            guard(
                put(relief_supplies::update_relief_supply)
                    .delete(relief_supplies::delete_relief_supply),
            ),
        )
        .route(
            "/rescue-operations",
            guard(post(rescue_operations::create_rescue_operation)),
        )
        .route(
            "/rescue-operations/:id",
            guard(
                put(rescue_operations::update_rescue_operation)
                    .delete(rescue_operations::delete_rescue_operation),
            ),
        )
        .route(
            "/emergency-contacts",
            guard(post(emergency_contacts::create_emergency_contact)),
        )
        .route(
            "/emergency-contacts/:id",
            guard(
                put(emergency_contacts::update_emergency_contact)
                    .delete(emergency_contacts::delete_emergency_contact),
            ),
        );

    let api = Router::new()
        .route("/health", get(health::health_check))
        .merge(reads)
        .merge(writes);

    let mut router = Router::new().nest("/api/v1", api);

    if let Some(dir) = &config.frontend_dir {
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(Extension(store))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched| matched.as_str())
                        .unwrap_or_else(|| request.uri().path());

                    // Span name "METHOD /route", e.g. "PUT /api/v1/volunteers/7"
                    let span_name = format!("{} {}", request.method(), path);

                    let user_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .or_else(|| {
                            request
                                .headers()
                                .get("x-real-ip")
                                .and_then(|v| v.to_str().ok())
                        })
                        .map(str::to_string)
                        .or_else(|| {
                            request
                                .extensions()
                                .get::<ConnectInfo<SocketAddr>>()
                                .map(|ConnectInfo(addr)| addr.ip().to_string())
                        })
                        .unwrap_or_else(|| "unknown".to_string());

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        user_ip = user_ip,
                        method = %request.method(),
                        path = %request.uri().path(),
                        // filled in by handlers
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        record_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &Request<Body>, _span: &Span| {})
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    span.record("status", tracing::field::display(response.status()));
                    span.record("latency", tracing::field::debug(latency));

                    tracing::info!("request completed");
                }),
        )
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
