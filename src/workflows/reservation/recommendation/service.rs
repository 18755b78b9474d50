use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::catalog::{CatalogError, FacilityCatalog};
use super::domain::{
    rank_recommendations, Facility, FacilityId, Reason, ReasonCode, Recommendation, ScoreRequest,
};
use super::gateway::{GatewayRanking, GatewayRequest, MlGateway};
use super::geo::format_distance;
use super::heuristic::{assess_proximity, HeuristicEngine, ScoringConfig};

/// Shortest purpose accepted for scoring, in characters after trimming.
pub const MIN_PURPOSE_LEN: usize = 3;

/// Which path produced a recommendation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationBackend {
    Heuristic,
    MachineLearned { elapsed: Duration },
}

impl RecommendationBackend {
    pub fn ml_enabled(&self) -> bool {
        matches!(self, RecommendationBackend::MachineLearned { .. })
    }

    pub fn ml_seconds(&self) -> Option<f64> {
        match self {
            RecommendationBackend::MachineLearned { elapsed } => Some(elapsed.as_secs_f64()),
            RecommendationBackend::Heuristic => None,
        }
    }
}

/// One scoring call's ranked output.
#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<Recommendation>,
    pub backend: RecommendationBackend,
}

/// Error raised by the recommendation service. Gateway failures are
/// deliberately absent: they degrade, they do not propagate.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("purpose must be at least {minimum} characters")]
    PurposeTooShort { minimum: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Service composing the catalog, the heuristic engine, and the optional
/// ML gateway behind a hard time budget. Stateless per call.
pub struct RecommendationService<C, G> {
    catalog: Arc<C>,
    gateway: Option<Arc<G>>,
    gateway_budget: Duration,
    engine: HeuristicEngine,
}

enum GatewayAttempt {
    Ranked {
        recommendations: Vec<Recommendation>,
        elapsed: Duration,
    },
    Degraded,
}

impl<C, G> RecommendationService<C, G>
where
    C: FacilityCatalog + 'static,
    G: MlGateway + 'static,
{
    pub fn heuristic_only(catalog: Arc<C>, scoring: ScoringConfig) -> Self {
        Self {
            catalog,
            gateway: None,
            gateway_budget: Duration::from_secs(2),
            engine: HeuristicEngine::new(scoring),
        }
    }

    pub fn with_gateway(
        catalog: Arc<C>,
        gateway: Arc<G>,
        gateway_budget: Duration,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            catalog,
            gateway: Some(gateway),
            gateway_budget,
            engine: HeuristicEngine::new(scoring),
        }
    }

    /// Available facilities for pickers and the facilities endpoint.
    pub fn available_facilities(&self) -> Result<Vec<Facility>, CatalogError> {
        self.catalog.available()
    }

    /// Rank facilities for the request: try the ML gateway when configured,
    /// fall back to the heuristic on timeout, error, or an empty ranking.
    pub async fn recommend(
        &self,
        request: &ScoreRequest,
    ) -> Result<RecommendationOutcome, RecommendationError> {
        if request.purpose.trim().chars().count() < MIN_PURPOSE_LEN {
            return Err(RecommendationError::PurposeTooShort {
                minimum: MIN_PURPOSE_LEN,
            });
        }

        let candidates = self.catalog.available()?;
        if candidates.is_empty() {
            debug!("no available facilities, returning empty recommendation set");
            return Ok(RecommendationOutcome {
                recommendations: Vec::new(),
                backend: RecommendationBackend::Heuristic,
            });
        }

        if let Some(gateway) = &self.gateway {
            if let GatewayAttempt::Ranked {
                recommendations,
                elapsed,
            } = self.attempt_gateway(gateway, request, &candidates).await
            {
                return Ok(RecommendationOutcome {
                    recommendations,
                    backend: RecommendationBackend::MachineLearned { elapsed },
                });
            }
        }

        Ok(RecommendationOutcome {
            recommendations: self.engine.rank(request, &candidates),
            backend: RecommendationBackend::Heuristic,
        })
    }

    async fn attempt_gateway(
        &self,
        gateway: &G,
        request: &ScoreRequest,
        candidates: &[Facility],
    ) -> GatewayAttempt {
        let wire = GatewayRequest::new(request, candidates);
        let started = Instant::now();

        let rankings =
            match tokio::time::timeout(self.gateway_budget, gateway.rank(&wire)).await {
                Err(_) => {
                    warn!(
                        budget_ms = self.gateway_budget.as_millis() as u64,
                        "ml gateway exceeded its time budget, using heuristic ranking"
                    );
                    return GatewayAttempt::Degraded;
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "ml gateway call failed, using heuristic ranking");
                    return GatewayAttempt::Degraded;
                }
                Ok(Ok(rankings)) => rankings,
            };

        if rankings.is_empty() {
            warn!("ml gateway returned no rankings, using heuristic ranking");
            return GatewayAttempt::Degraded;
        }

        let elapsed = started.elapsed();
        let recommendations = self.adopt_rankings(request, candidates, rankings);
        if recommendations.is_empty() {
            warn!("ml gateway rankings matched no known facility, using heuristic ranking");
            return GatewayAttempt::Degraded;
        }

        GatewayAttempt::Ranked {
            recommendations,
            elapsed,
        }
    }

    /// Turn gateway rankings into recommendations: rankings that name an
    /// unknown facility are dropped, the proximity computation is re-run to
    /// attach distance and a distance reason, and the ranking invariant is
    /// re-applied over the gateway scores.
    fn adopt_rankings(
        &self,
        request: &ScoreRequest,
        candidates: &[Facility],
        rankings: Vec<GatewayRanking>,
    ) -> Vec<Recommendation> {
        let by_id: HashMap<&FacilityId, &Facility> = candidates
            .iter()
            .map(|facility| (&facility.id, facility))
            .collect();

        let mut recommendations = Vec::new();
        for ranking in rankings {
            let Some(facility) = by_id.get(&ranking.facility_id).copied() else {
                debug!(facility = %ranking.facility_id.0, "gateway ranked unknown facility, skipping");
                continue;
            };

            let detail = if ranking.reason.trim().is_empty() {
                "ranked by scheduling model".to_string()
            } else {
                ranking.reason.clone()
            };
            let mut reasons = vec![Reason::new(ReasonCode::GatewayRanked, detail)];

            let mut distance_km = None;
            let mut distance_label = None;
            if let Some(assessment) = assess_proximity(
                request.requester.coordinates,
                facility,
                self.engine.config(),
            ) {
                distance_label = Some(format_distance(assessment.distance_km));
                distance_km = Some(assessment.distance_km);
                if let Some(reason) = assessment.reason {
                    reasons.push(reason);
                }
            }

            recommendations.push(Recommendation {
                facility_id: facility.id.clone(),
                name: facility.name.clone(),
                capacity: facility.capacity,
                amenities: facility.amenities.clone(),
                score: ranking.score,
                distance_km,
                distance_label,
                reasons,
            });
        }

        rank_recommendations(recommendations, self.engine.config().max_results)
    }
}
