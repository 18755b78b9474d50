use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::super::advisory::TimeAdvisor;
use super::catalog::ResidentLookup;
use super::domain::{
    Coordinates, Facility, Recommendation, RequesterContext, ScoreRequest,
    DEFAULT_EXPECTED_ATTENDEES,
};
use super::gateway::MlGateway;
use super::service::{RecommendationError, RecommendationService};
use super::FacilityCatalog;

/// Shared state for the recommendation endpoints.
pub struct RecommendationState<C, G, L> {
    pub service: Arc<RecommendationService<C, G>>,
    pub advisor: Arc<TimeAdvisor>,
    pub residents: Arc<L>,
}

impl<C, G, L> Clone for RecommendationState<C, G, L> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            advisor: self.advisor.clone(),
            residents: self.residents.clone(),
        }
    }
}

/// Router builder exposing the recommendation and facility-listing
/// endpoints.
pub fn recommendation_router<C, G, L>(state: RecommendationState<C, G, L>) -> Router
where
    C: FacilityCatalog + 'static,
    G: MlGateway + 'static,
    L: ResidentLookup + 'static,
{
    Router::new()
        .route(
            "/api/v1/reservations/recommendations",
            post(recommend_handler::<C, G, L>),
        )
        .route("/api/v1/facilities", get(facilities_handler::<C, G, L>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    #[serde(default)]
    pub(crate) purpose: Option<String>,
    #[serde(default = "default_expected_attendees")]
    pub(crate) expected_attendees: u32,
    #[serde(default)]
    pub(crate) time_slot: Option<String>,
    #[serde(default)]
    pub(crate) reservation_date: Option<String>,
    #[serde(default)]
    pub(crate) is_commercial: bool,
    #[serde(default)]
    pub(crate) resident_id: Option<String>,
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
}

fn default_expected_attendees() -> u32 {
    DEFAULT_EXPECTED_ATTENDEES
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            purpose: None,
            expected_attendees: DEFAULT_EXPECTED_ATTENDEES,
            time_slot: None,
            reservation_date: None,
            is_commercial: false,
            resident_id: None,
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationResponse {
    pub(crate) recommendations: Vec<RecommendationView>,
    pub(crate) ml_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ml_time: Option<f64>,
    pub(crate) suggested_times: Vec<String>,
    pub(crate) best_times_label: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationView {
    pub(crate) facility_id: String,
    pub(crate) name: String,
    pub(crate) capacity: u32,
    pub(crate) amenities: String,
    pub(crate) score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) distance_km: Option<f64>,
    pub(crate) reasons: String,
}

impl RecommendationView {
    fn from_recommendation(recommendation: &Recommendation) -> Self {
        Self {
            facility_id: recommendation.facility_id.0.clone(),
            name: recommendation.name.clone(),
            capacity: recommendation.capacity,
            amenities: recommendation.amenities.clone(),
            score: round2(recommendation.score),
            distance: recommendation.distance_label.clone(),
            distance_km: recommendation.distance_km.map(round2),
            reasons: recommendation.reason_summary(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FacilityView {
    pub(crate) facility_id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) location: String,
    pub(crate) capacity: u32,
    pub(crate) amenities: String,
}

impl FacilityView {
    fn from_facility(facility: &Facility) -> Self {
        Self {
            facility_id: facility.id.0.clone(),
            name: facility.name.clone(),
            description: facility.description.clone(),
            location: facility.location.clone(),
            capacity: facility.capacity,
            amenities: facility.amenities.clone(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) async fn recommend_handler<C, G, L>(
    State(state): State<RecommendationState<C, G, L>>,
    axum::Json(payload): axum::Json<RecommendationRequest>,
) -> Response
where
    C: FacilityCatalog + 'static,
    G: MlGateway + 'static,
    L: ResidentLookup + 'static,
{
    let purpose = payload.purpose.unwrap_or_default();

    let coordinates = resolve_coordinates(
        payload.latitude,
        payload.longitude,
        payload.resident_id.as_deref(),
        state.residents.as_ref(),
    );

    let request = ScoreRequest {
        purpose,
        expected_attendees: payload.expected_attendees,
        reservation_date: payload.reservation_date,
        time_slot: payload.time_slot,
        commercial: payload.is_commercial,
        requester: RequesterContext {
            resident_id: payload.resident_id,
            coordinates,
        },
    };

    match state.service.recommend(&request).await {
        Ok(outcome) => {
            let advice = state.advisor.advise(&request.purpose);
            let body = RecommendationResponse {
                recommendations: outcome
                    .recommendations
                    .iter()
                    .map(RecommendationView::from_recommendation)
                    .collect(),
                ml_enabled: outcome.backend.ml_enabled(),
                ml_time: outcome.backend.ml_seconds().map(round2),
                suggested_times: advice.suggested_slots,
                best_times_label: advice.label,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(RecommendationError::PurposeTooShort { minimum }) => {
            let payload = json!({
                "error": format!("purpose must be at least {minimum} characters"),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(RecommendationError::Catalog(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn facilities_handler<C, G, L>(
    State(state): State<RecommendationState<C, G, L>>,
) -> Response
where
    C: FacilityCatalog + 'static,
    G: MlGateway + 'static,
    L: ResidentLookup + 'static,
{
    match state.service.available_facilities() {
        Ok(facilities) => {
            let views: Vec<FacilityView> =
                facilities.iter().map(FacilityView::from_facility).collect();
            (StatusCode::OK, axum::Json(json!({ "facilities": views }))).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// Explicit coordinates win; otherwise fall back to the resident registry.
fn resolve_coordinates<L: ResidentLookup>(
    latitude: Option<f64>,
    longitude: Option<f64>,
    resident_id: Option<&str>,
    residents: &L,
) -> Option<Coordinates> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => resident_id.and_then(|id| residents.locate(id)),
    }
}
