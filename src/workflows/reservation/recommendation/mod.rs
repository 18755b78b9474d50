//! Facility recommendation scoring.
//!
//! A weighted additive heuristic ranks available facilities by proximity,
//! purpose keywords, venue category, and capacity fit. When an external
//! ranking model is configured, its ordering is preferred under a hard time
//! budget, with the heuristic as the guaranteed backstop.

pub mod catalog;
pub mod domain;
pub mod gateway;
pub mod geo;
mod heuristic;
pub mod importer;
pub mod purpose;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, FacilityCatalog, FacilityDirectory, ResidentLookup, ResidentRegistry,
};
pub use domain::{
    rank_recommendations, Coordinates, Facility, FacilityId, FacilityStatus, Reason, ReasonCode,
    Recommendation, RequesterContext, ScoreRequest, DEFAULT_EXPECTED_ATTENDEES,
};
pub use gateway::{
    GatewayCandidate, GatewayError, GatewayRanking, GatewayRequest, HttpMlGateway, MlGateway,
};
pub use heuristic::{HeuristicEngine, ScoringConfig};
pub use importer::{FacilityCsvImporter, ImportError, DEFAULT_CAPACITY};
pub use router::{recommendation_router, RecommendationState};
pub use service::{
    RecommendationBackend, RecommendationError, RecommendationOutcome, RecommendationService,
    MIN_PURPOSE_LEN,
};
