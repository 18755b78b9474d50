use super::super::domain::{Coordinates, Facility, Reason, ReasonCode, Recommendation};
use super::super::geo::{format_distance, haversine_km};
use super::super::purpose::PurposeMatcher;
use super::config::ScoringConfig;

const SPORT_KEYWORDS: &[&str] = &["sport", "basketball", "volleyball", "zumba", "fitness"];
const MEETING_KEYWORDS: &[&str] = &["meeting", "assembly", "conference", "seminar", "orientation"];
const CELEBRATION_KEYWORDS: &[&str] = &["celebration", "party", "wedding", "birthday", "reception"];

pub(crate) struct ProximityAssessment {
    pub(crate) distance_km: f64,
    pub(crate) bonus: f64,
    pub(crate) reason: Option<Reason>,
}

/// Distance between requester and facility with the band bonus, when both
/// coordinate pairs exist. Bands are checked in ascending order; the first
/// match wins, and anything past the outermost band earns no bonus and no
/// reason.
pub(crate) fn assess_proximity(
    requester: Option<Coordinates>,
    facility: &Facility,
    config: &ScoringConfig,
) -> Option<ProximityAssessment> {
    let from = requester?;
    let to = facility.coordinates?;
    let distance_km = haversine_km(from, to);
    let label = format_distance(distance_km);

    // Band comparisons use the 2-decimal value residents see, so a venue
    // displayed as "1.0 km" lands in the 1 km band.
    let banded = (distance_km * 100.0).round() / 100.0;

    let (bonus, reason) = if banded <= config.very_close_km {
        (
            config.very_close_bonus,
            Some(format!("very close ({label} away)")),
        )
    } else if banded <= config.nearby_km {
        (config.nearby_bonus, Some(format!("nearby ({label} away)")))
    } else if banded <= config.district_km {
        (
            config.district_bonus,
            Some(format!("within the district ({label} away)")),
        )
    } else if banded <= config.city_km {
        (
            config.city_bonus,
            Some(format!("across town ({label} away)")),
        )
    } else {
        (0.0, None)
    };

    Some(ProximityAssessment {
        distance_km,
        bonus,
        reason: reason.map(|detail| Reason::new(ReasonCode::Proximity, detail)),
    })
}

/// Accumulate the additive relevance score for one facility. `purpose` must
/// be pre-normalized (trimmed, lowercased).
pub(super) fn score_facility(
    purpose: &str,
    expected_attendees: u32,
    requester: Option<Coordinates>,
    facility: &Facility,
    config: &ScoringConfig,
    matcher: &PurposeMatcher,
) -> Recommendation {
    let mut reasons = Vec::new();
    let mut score = 0.0;
    let mut distance_km = None;
    let mut distance_label = None;

    if let Some(assessment) = assess_proximity(requester, facility, config) {
        distance_label = Some(format_distance(assessment.distance_km));
        distance_km = Some(assessment.distance_km);
        if assessment.bonus > 0.0 {
            score += assessment.bonus;
        }
        if let Some(reason) = assessment.reason {
            reasons.push(reason);
        }
    }

    let purpose_match = matcher.match_purpose(purpose, &facility.keyword_text());
    if purpose_match.score > 0 {
        score += f64::from(purpose_match.score) / config.purpose_scale;
        reasons.push(Reason::new(ReasonCode::PurposeMatch, purpose_match.summary()));
    }

    let venue = facility.venue_text();
    if mentions_any(purpose, SPORT_KEYWORDS) && venue.contains("court") {
        score += config.category_bonus;
        reasons.push(Reason::new(
            ReasonCode::SportsVenue,
            "court space suits sports and fitness activities",
        ));
    }
    if mentions_any(purpose, MEETING_KEYWORDS)
        && (venue.contains("conference") || venue.contains("hall"))
    {
        score += config.category_bonus;
        reasons.push(Reason::new(
            ReasonCode::MeetingVenue,
            "conference space fits meetings and assemblies",
        ));
    }
    if mentions_any(purpose, CELEBRATION_KEYWORDS)
        && (venue.contains("hall") || venue.contains("event"))
    {
        score += config.category_bonus;
        reasons.push(Reason::new(
            ReasonCode::EventVenue,
            "hall suited to celebrations and events",
        ));
    }

    let capacity = f64::from(facility.capacity);
    let attendees = f64::from(expected_attendees);
    if capacity >= attendees * config.capacity_lower_ratio
        && capacity <= attendees * config.capacity_upper_ratio
    {
        score += config.capacity_bonus;
        reasons.push(Reason::new(
            ReasonCode::CapacityFit,
            format!(
                "capacity {} fits {} attendees",
                facility.capacity, expected_attendees
            ),
        ));
    }

    // Never hard-filter: unmatched facilities stay rankable.
    if reasons.is_empty() {
        reasons.push(Reason::new(ReasonCode::GeneralPurpose, "general purpose facility"));
    }

    Recommendation {
        facility_id: facility.id.clone(),
        name: facility.name.clone(),
        capacity: facility.capacity,
        amenities: facility.amenities.clone(),
        score,
        distance_km,
        distance_label,
        reasons,
    }
}

fn mentions_any(purpose: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| purpose.contains(keyword))
}
