use crate::{
    BridgeState,
    bridge::{access, events, handlers, ui},
};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the bridge router. The route table is the complete set of
/// operations; anything else is a 404.
///
/// Every request passes the host and origin guard first, so `state` must
/// come from [`BridgeState::bound_to`] or nothing is answered.
pub fn router(state: BridgeState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(ui::index))
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::save_config),
        )
        .route("/api/recording", post(handlers::set_recording))
        .route("/api/clipboard", post(handlers::write_clipboard))
        .route("/api/health-check", post(handlers::health_check))
        .route("/api/events", get(events::events))
        .layer(middleware::from_fn_with_state(state.clone(), access::guard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
