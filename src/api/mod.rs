#[cfg(feature = "swagger")]
pub mod openapi;
pub mod calculate;
pub mod error;
pub mod health;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::ServerConfig, engine::ImpactCalculator};

#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<ImpactCalculator>,
}

impl AppState {
    pub fn new(calculator: ImpactCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }
}

pub fn router(state: AppState, cfg: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/calculate", post(calculate::calculate_impact))
        .route(
            "/api/v1/simulation/run",
            post(calculate::run_dashboard_simulation),
        )
        .with_state(state);

    if cfg.enable_cors {
        match cfg.cors_origin.parse::<HeaderValue>() {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([axum::http::header::CONTENT_TYPE]);
                router = router.layer(cors);
            }
            Err(e) => {
                tracing::warn!(origin = %cfg.cors_origin, error = %e, "invalid CORS origin, CORS disabled");
            }
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(cfg.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(feature = "swagger")]
pub fn with_swagger(app: Router) -> Router {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;
    app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
}
