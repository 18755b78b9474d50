mod config;
mod rules;

pub use config::ScoringConfig;
pub(crate) use rules::assess_proximity;

use super::domain::{rank_recommendations, Facility, Recommendation, ScoreRequest};
use super::purpose::PurposeMatcher;

/// Stateless engine applying the additive relevance rubric to a candidate
/// set. Always available; the guaranteed backstop when the ML gateway is
/// absent or degraded.
pub struct HeuristicEngine {
    config: ScoringConfig,
    matcher: PurposeMatcher,
}

impl HeuristicEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            matcher: PurposeMatcher,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one facility against the request.
    pub fn score(&self, request: &ScoreRequest, facility: &Facility) -> Recommendation {
        let purpose = request.purpose.trim().to_lowercase();
        rules::score_facility(
            &purpose,
            request.attendees_or_default(),
            request.requester.coordinates,
            facility,
            &self.config,
            &self.matcher,
        )
    }

    /// Score every candidate and return them ranked and truncated.
    pub fn rank(&self, request: &ScoreRequest, candidates: &[Facility]) -> Vec<Recommendation> {
        let purpose = request.purpose.trim().to_lowercase();
        let scored = candidates
            .iter()
            .map(|facility| {
                rules::score_facility(
                    &purpose,
                    request.attendees_or_default(),
                    request.requester.coordinates,
                    facility,
                    &self.config,
                    &self.matcher,
                )
            })
            .collect();
        rank_recommendations(scored, self.config.max_results)
    }
}
