use serde::{Deserialize, Serialize};

/// Weights and thresholds for the additive relevance score. Defaults match
/// the production rubric; every band and bonus is adjustable so the terms
/// can be recalibrated without touching rule code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Proximity bands in kilometers, checked in ascending order.
    pub very_close_km: f64,
    pub nearby_km: f64,
    pub district_km: f64,
    pub city_km: f64,
    /// Bonus applied for the matching proximity band.
    pub very_close_bonus: f64,
    pub nearby_bonus: f64,
    pub district_bonus: f64,
    pub city_bonus: f64,
    /// Bonus for a venue-category match (court, conference space, event hall).
    pub category_bonus: f64,
    /// Bonus when capacity sits inside the fit band around the headcount.
    pub capacity_bonus: f64,
    pub capacity_lower_ratio: f64,
    pub capacity_upper_ratio: f64,
    /// Divisor applied to the delegated purpose sub-score (reported out of 10).
    pub purpose_scale: f64,
    /// Result cap after ranking.
    pub max_results: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            very_close_km: 1.0,
            nearby_km: 3.0,
            district_km: 5.0,
            city_km: 10.0,
            very_close_bonus: 2.0,
            nearby_bonus: 1.5,
            district_bonus: 1.0,
            city_bonus: 0.5,
            category_bonus: 2.0,
            capacity_bonus: 1.0,
            capacity_lower_ratio: 0.8,
            capacity_upper_ratio: 1.5,
            purpose_scale: 10.0,
            max_results: 5,
        }
    }
}
