//! Costing API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use super::dto::{
    ActualCostPatch, ActualCostRequest, CalculateCostRequest, CostCalculationResponse,
    TripCostResponse, WeekMilesQuery, WeekMilesResponse,
};
use crate::application::costing::{CalculateCost, CostingService};
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};

#[derive(Clone)]
pub struct CostingState {
    pub service: Arc<CostingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/costing/calculate",
    tag = "Costing",
    request_body = CalculateCostRequest,
    responses(
        (status = 200, description = "Cost calculated and recorded", body = CostCalculationResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Driver not found", body = ErrorBody),
        (status = 500, description = "Persistence failure, nothing recorded", body = ErrorBody)
    )
)]
pub async fn calculate_cost(
    State(state): State<CostingState>,
    ValidatedJson(body): ValidatedJson<CalculateCostRequest>,
) -> Result<Json<CostCalculationResponse>, ApiError> {
    let request = CalculateCost::try_from(body)?;
    let calculation = state.service.calculate_cost(request).await?;
    Ok(Json(calculation.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/costing/actual",
    tag = "Costing",
    request_body = ActualCostRequest,
    responses(
        (status = 200, description = "Actuals recorded on the latest calculation", body = TripCostResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Order was never costed", body = ErrorBody)
    )
)]
pub async fn record_actual(
    State(state): State<CostingState>,
    ValidatedJson(body): ValidatedJson<ActualCostRequest>,
) -> Result<Json<TripCostResponse>, ApiError> {
    let cost = state
        .service
        .record_actual_cost(&body.order_id, body.actual_miles, body.actual_cost)
        .await?;
    Ok(Json(cost.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/costing/actual/{order_id}",
    tag = "Costing",
    params(("order_id" = String, Path, description = "Order identifier")),
    request_body = ActualCostPatch,
    responses(
        (status = 200, description = "Actuals recorded on the latest calculation", body = TripCostResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Order was never costed", body = ErrorBody)
    )
)]
pub async fn patch_actual(
    State(state): State<CostingState>,
    Path(order_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ActualCostPatch>,
) -> Result<Json<TripCostResponse>, ApiError> {
    let cost = state
        .service
        .record_actual_cost(&order_id, body.actual_miles, body.actual_cost)
        .await?;
    Ok(Json(cost.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/costing/breakdown/{order_id}",
    tag = "Costing",
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Most recent calculation for the order", body = TripCostResponse),
        (status = 404, description = "Order was never costed", body = ErrorBody)
    )
)]
pub async fn get_breakdown(
    State(state): State<CostingState>,
    Path(order_id): Path<String>,
) -> Result<Json<TripCostResponse>, ApiError> {
    let cost = state.service.get_breakdown(&order_id).await?;
    Ok(Json(cost.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/costing/week-miles/{unit_number}",
    tag = "Costing",
    params(
        ("unit_number" = String, Path, description = "Unit number"),
        WeekMilesQuery
    ),
    responses(
        (status = 200, description = "Weekly mileage aggregate, zeros when empty", body = WeekMilesResponse)
    )
)]
pub async fn get_week_miles(
    State(state): State<CostingState>,
    Path(unit_number): Path<String>,
    Query(query): Query<WeekMilesQuery>,
) -> Result<Json<WeekMilesResponse>, ApiError> {
    let summary = state
        .service
        .week_miles(&unit_number, query.week_start)
        .await?;
    Ok(Json(summary.into()))
}
