//! Metadata API handlers: read-only views over rates and the event catalog

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use super::dto::{EventCatalogResponse, RateRuleDto, SummaryResponse};
use crate::application::metadata::MetadataService;
use crate::interfaces::http::common::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct MetadataState {
    pub service: Arc<MetadataService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/metadata/rules",
    tag = "Metadata",
    responses(
        (status = 200, description = "All rate rules ordered by key and type", body = Vec<RateRuleDto>),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    )
)]
pub async fn list_rules(
    State(state): State<MetadataState>,
) -> Result<Json<Vec<RateRuleDto>>, ApiError> {
    let now = Utc::now();
    let rules = state.service.rate_rules().await?;
    Ok(Json(
        rules
            .into_iter()
            .map(|r| RateRuleDto::from_rule(r, now))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/metadata/events",
    tag = "Metadata",
    responses(
        (status = 200, description = "Event types and detection rules", body = EventCatalogResponse),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    )
)]
pub async fn list_events(
    State(state): State<MetadataState>,
) -> Result<Json<EventCatalogResponse>, ApiError> {
    let (types, rules) = state.service.event_catalog().await?;
    Ok(Json(EventCatalogResponse {
        event_types: types.into_iter().map(Into::into).collect(),
        event_rules: rules.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/metadata/summary",
    tag = "Metadata",
    responses(
        (status = 200, description = "Configuration and activity counts", body = SummaryResponse),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    )
)]
pub async fn get_summary(
    State(state): State<MetadataState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    Ok(Json(state.service.summary().await?.into()))
}
