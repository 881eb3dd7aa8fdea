use utoipa::OpenApi;

use crate::{
    api::health::HealthResponse,
    domain::{DashboardRunRequest, SimulationInput, SimulationOutput},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "GridOps Optimization Engine", version = "1.0.0"),
    paths(
        crate::api::calculate::calculate_impact,
        crate::api::calculate::run_dashboard_simulation,
        crate::api::health::health_check,
    ),
    components(schemas(SimulationInput, SimulationOutput, DashboardRunRequest, HealthResponse)),
    tags((name = "gridops", description = "HVAC load-shedding impact engine"))
)]
pub struct ApiDoc;
