use anyhow::Result;
use axum::Router;
use gridops_optimizer::{
    api, config::Config, engine::ImpactCalculator, telemetry, telemetry::init_tracing,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let calculator = ImpactCalculator::new(cfg.model.clone());
    let model = calculator.model();
    info!(
        base_load_kwh = model.facility.base_load_kwh,
        standard_rate = model.tariff.standard_rate,
        peak_rate = model.tariff.peak_rate,
        off_peak_rate = model.tariff.off_peak_rate,
        "impact model loaded"
    );
    let state = api::AppState::new(calculator);

    #[allow(unused_mut)]
    let mut app: Router = api::router(state, &cfg.server);

    #[cfg(feature = "swagger")]
    {
        app = api::with_swagger(app);
    }

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("Server binding to 0.0.0.0 - service will be accessible from network");
    }

    info!(%addr, "starting GridOps optimization engine");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
