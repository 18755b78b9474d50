use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;
use tokio::time::sleep;

use crate::workflows::reservation::recommendation::catalog::{
    CatalogError, FacilityCatalog, FacilityDirectory,
};
use crate::workflows::reservation::recommendation::domain::{
    Coordinates, Facility, FacilityId, FacilityStatus, RequesterContext, ScoreRequest,
};
use crate::workflows::reservation::recommendation::gateway::{
    GatewayError, GatewayRanking, GatewayRequest, MlGateway,
};
use crate::workflows::reservation::recommendation::{
    HttpMlGateway, RecommendationService, ScoringConfig,
};

pub(super) const GATEWAY_BUDGET: Duration = Duration::from_secs(2);

pub(super) fn facility(
    id: &str,
    name: &str,
    amenities: &str,
    capacity: u32,
    coordinates: Option<Coordinates>,
) -> Facility {
    Facility {
        id: FacilityId(id.to_string()),
        name: name.to_string(),
        description: String::new(),
        amenities: amenities.to_string(),
        location: "Poblacion".to_string(),
        capacity,
        coordinates,
        status: FacilityStatus::Available,
    }
}

/// Requester position used across the scenarios: the equator origin, with
/// facilities offset east by fractions of a degree (0.009 degrees of
/// longitude is roughly one kilometer).
pub(super) fn requester_origin() -> Option<Coordinates> {
    Some(Coordinates::new(0.0, 0.0))
}

pub(super) fn near_origin(degrees_east: f64) -> Option<Coordinates> {
    Some(Coordinates::new(0.0, degrees_east))
}

pub(super) fn scenario_catalog() -> Arc<FacilityDirectory> {
    Arc::new(FacilityDirectory::new(vec![
        facility(
            "FAC-COURT",
            "Covered Court",
            "basketball court, volleyball net",
            150,
            near_origin(0.009),
        ),
        facility(
            "FAC-HALL",
            "Multi-Purpose Hall",
            "conference hall, stage",
            300,
            near_origin(0.02),
        ),
        facility(
            "FAC-EVENTS",
            "Events Hall",
            "event hall, catering kitchen",
            120,
            near_origin(0.05),
        ),
        facility("FAC-PAVILION", "Plaza Pavilion", "open pavilion", 80, None),
    ]))
}

pub(super) fn score_request(purpose: &str) -> ScoreRequest {
    ScoreRequest {
        purpose: purpose.to_string(),
        expected_attendees: 50,
        reservation_date: Some("2026-03-14".to_string()),
        time_slot: Some("16:00-19:00".to_string()),
        commercial: false,
        requester: RequesterContext {
            resident_id: None,
            coordinates: requester_origin(),
        },
    }
}

pub(super) fn heuristic_service(
    catalog: Arc<FacilityDirectory>,
) -> RecommendationService<FacilityDirectory, HttpMlGateway> {
    RecommendationService::heuristic_only(catalog, ScoringConfig::default())
}

pub(super) fn gateway_service<G: MlGateway + 'static>(
    catalog: Arc<FacilityDirectory>,
    gateway: G,
) -> RecommendationService<FacilityDirectory, G> {
    RecommendationService::with_gateway(
        catalog,
        Arc::new(gateway),
        GATEWAY_BUDGET,
        ScoringConfig::default(),
    )
}

pub(super) struct UnavailableCatalog;

impl FacilityCatalog for UnavailableCatalog {
    fn available(&self) -> Result<Vec<Facility>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

/// Gateway returning a fixed ranking immediately.
pub(super) struct ScriptedGateway {
    pub(super) rankings: Vec<GatewayRanking>,
}

impl MlGateway for ScriptedGateway {
    async fn rank(&self, _request: &GatewayRequest) -> Result<Vec<GatewayRanking>, GatewayError> {
        Ok(self.rankings.clone())
    }
}

/// Gateway that always errors.
pub(super) struct FailingGateway;

impl MlGateway for FailingGateway {
    async fn rank(&self, _request: &GatewayRequest) -> Result<Vec<GatewayRanking>, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }
}

/// Gateway answering with an empty ranking.
pub(super) struct EmptyGateway;

impl MlGateway for EmptyGateway {
    async fn rank(&self, _request: &GatewayRequest) -> Result<Vec<GatewayRanking>, GatewayError> {
        Ok(Vec::new())
    }
}

/// Gateway that answers correctly but only after `delay`.
pub(super) struct SlowGateway {
    pub(super) delay: Duration,
    pub(super) rankings: Vec<GatewayRanking>,
}

impl MlGateway for SlowGateway {
    async fn rank(&self, _request: &GatewayRequest) -> Result<Vec<GatewayRanking>, GatewayError> {
        sleep(self.delay).await;
        Ok(self.rankings.clone())
    }
}

pub(super) fn ranking(id: &str, score: f64, reason: &str) -> GatewayRanking {
    GatewayRanking {
        facility_id: FacilityId(id.to_string()),
        score,
        reason: reason.to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
