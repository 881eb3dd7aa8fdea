use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::{
    api::{error::ApiError, AppState},
    domain::{DashboardRunRequest, SimulationInput, SimulationOutput},
};

/// POST /calculate - Run the impact engine on a facility/grid snapshot
#[cfg_attr(feature = "swagger", utoipa::path(
    post,
    path = "/calculate",
    request_body = SimulationInput,
    responses(
        (status = 200, description = "Impact estimate", body = SimulationOutput),
        (status = 400, description = "Malformed or out-of-range input"),
        (status = 500, description = "Engine computation error")
    ),
    tag = "gridops"
))]
pub async fn calculate_impact(
    State(state): State<AppState>,
    payload: Result<Json<SimulationInput>, JsonRejection>,
) -> Result<Json<SimulationOutput>, ApiError> {
    let Json(input) = payload?;
    input.validate()?;
    run(&state, &input).map(Json)
}

/// POST /api/v1/simulation/run - Dashboard form (percent shedding, camelCase)
#[cfg_attr(feature = "swagger", utoipa::path(
    post,
    path = "/api/v1/simulation/run",
    request_body = DashboardRunRequest,
    responses(
        (status = 200, description = "Impact estimate", body = SimulationOutput),
        (status = 400, description = "Malformed or out-of-range input")
    ),
    tag = "gridops"
))]
pub async fn run_dashboard_simulation(
    State(state): State<AppState>,
    payload: Result<Json<DashboardRunRequest>, JsonRejection>,
) -> Result<Json<SimulationOutput>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let input = SimulationInput::from(request);
    run(&state, &input).map(Json)
}

fn run(state: &AppState, input: &SimulationInput) -> Result<SimulationOutput, ApiError> {
    tracing::info!(
        setpoint = input.ac_setpoint,
        reduction = input.reduction_factor,
        incentives = input.enable_incentives,
        "Processing simulation"
    );
    let output = state.calculator.compute(input)?;
    tracing::debug!(
        projected_kwh = output.projected_kwh,
        cost = output.cost_estimate,
        comfort = output.comfort_index,
        stability = output.grid_stability_score,
        "Simulation complete"
    );
    Ok(output)
}
