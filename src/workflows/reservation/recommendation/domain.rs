use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Default attendee count when a request leaves the field blank or zero.
pub const DEFAULT_EXPECTED_ATTENDEES: u32 = 50;

/// Identifier wrapper for bookable facilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub String);

/// Decimal-degree coordinate pair. Facilities and requesters may lack one,
/// in which case every distance-dependent scoring term is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Operating status tracked by the facility-management module. Only
/// `Available` facilities are recommendation candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Available,
    Maintenance,
    Closed,
}

impl FacilityStatus {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" | "open" => Self::Available,
            "maintenance" | "under maintenance" | "repair" => Self::Maintenance,
            _ => Self::Closed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FacilityStatus::Available => "available",
            FacilityStatus::Maintenance => "maintenance",
            FacilityStatus::Closed => "closed",
        }
    }
}

/// A bookable municipal venue. Immutable for the duration of a scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub description: String,
    pub amenities: String,
    pub location: String,
    pub capacity: u32,
    pub coordinates: Option<Coordinates>,
    pub status: FacilityStatus,
}

impl Facility {
    pub fn is_available(&self) -> bool {
        self.status == FacilityStatus::Available
    }

    /// Text searched by the delegated purpose matcher.
    pub(crate) fn keyword_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.amenities).to_lowercase()
    }

    /// Text searched by the venue-category rules (name and amenities only).
    pub(crate) fn venue_text(&self) -> String {
        format!("{} {}", self.name, self.amenities).to_lowercase()
    }
}

/// Who is asking, passed explicitly so the scorer never reads ambient
/// request state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequesterContext {
    pub resident_id: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// One scoring call's inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub purpose: String,
    pub expected_attendees: u32,
    pub reservation_date: Option<String>,
    pub time_slot: Option<String>,
    pub commercial: bool,
    pub requester: RequesterContext,
}

impl ScoreRequest {
    pub fn new(purpose: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
            expected_attendees: DEFAULT_EXPECTED_ATTENDEES,
            reservation_date: None,
            time_slot: None,
            commercial: false,
            requester: RequesterContext::default(),
        }
    }

    /// Attendee count with the zero-means-unspecified coercion applied.
    pub fn attendees_or_default(&self) -> u32 {
        if self.expected_attendees == 0 {
            DEFAULT_EXPECTED_ATTENDEES
        } else {
            self.expected_attendees
        }
    }
}

/// Discrete contribution to a recommendation, kept structured so tests can
/// assert on codes rather than substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Proximity,
    PurposeMatch,
    SportsVenue,
    MeetingVenue,
    EventVenue,
    CapacityFit,
    GeneralPurpose,
    GatewayRanked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    pub detail: String,
}

impl Reason {
    pub fn new(code: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// A ranked facility with its accumulated relevance score. The score is an
/// unbounded additive heuristic value, not a normalized metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub facility_id: FacilityId,
    pub name: String,
    pub capacity: u32,
    pub amenities: String,
    pub score: f64,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
    pub reasons: Vec<Reason>,
}

impl Recommendation {
    /// Display string for the serialization boundary.
    pub fn reason_summary(&self) -> String {
        self.reasons
            .iter()
            .map(|reason| reason.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Ranking order: score descending, then distance ascending with missing
    /// distances last.
    pub fn ranking_order(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (a.distance_km, b.distance_km) {
                (Some(left), Some(right)) => {
                    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Sort per the ranking invariant and truncate to the caller's result cap.
pub fn rank_recommendations(
    mut recommendations: Vec<Recommendation>,
    limit: usize,
) -> Vec<Recommendation> {
    recommendations.sort_by(Recommendation::ranking_order);
    recommendations.truncate(limit);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(id: &str, score: f64, distance_km: Option<f64>) -> Recommendation {
        Recommendation {
            facility_id: FacilityId(id.to_string()),
            name: id.to_string(),
            capacity: 100,
            amenities: String::new(),
            score,
            distance_km,
            distance_label: None,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn ranking_prefers_higher_scores() {
        let ranked = rank_recommendations(
            vec![
                recommendation("low", 1.0, None),
                recommendation("high", 3.5, None),
            ],
            5,
        );
        assert_eq!(ranked[0].facility_id.0, "high");
    }

    #[test]
    fn ranking_breaks_ties_by_distance_with_missing_last() {
        let ranked = rank_recommendations(
            vec![
                recommendation("unknown", 2.0, None),
                recommendation("far", 2.0, Some(8.2)),
                recommendation("near", 2.0, Some(0.4)),
            ],
            5,
        );
        let order: Vec<&str> = ranked
            .iter()
            .map(|entry| entry.facility_id.0.as_str())
            .collect();
        assert_eq!(order, vec!["near", "far", "unknown"]);
    }

    #[test]
    fn ranking_truncates_to_limit() {
        let ranked = rank_recommendations(
            (0..8)
                .map(|index| recommendation(&format!("f{index}"), index as f64, None))
                .collect(),
            5,
        );
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].facility_id.0, "f7");
    }

    #[test]
    fn reason_summary_joins_details() {
        let mut entry = recommendation("hall", 2.0, None);
        entry.reasons = vec![
            Reason::new(ReasonCode::Proximity, "very close (400 m away)"),
            Reason::new(ReasonCode::CapacityFit, "capacity 100 fits 80 attendees"),
        ];
        assert_eq!(
            entry.reason_summary(),
            "very close (400 m away); capacity 100 fits 80 attendees"
        );
    }

    #[test]
    fn zero_attendees_coerces_to_default() {
        let mut request = ScoreRequest::new("community meeting");
        request.expected_attendees = 0;
        assert_eq!(request.attendees_or_default(), DEFAULT_EXPECTED_ATTENDEES);
    }

    #[test]
    fn status_labels_round_trip_known_values() {
        assert_eq!(FacilityStatus::from_label("Available"), FacilityStatus::Available);
        assert_eq!(
            FacilityStatus::from_label("under maintenance"),
            FacilityStatus::Maintenance
        );
        assert_eq!(FacilityStatus::from_label("retired"), FacilityStatus::Closed);
    }
}
