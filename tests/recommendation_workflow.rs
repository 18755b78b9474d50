use std::io::Cursor;
use std::sync::Arc;

use facility_ai::workflows::reservation::advisory::TimeAdvisor;
use facility_ai::workflows::reservation::recommendation::{
    Coordinates, FacilityCatalog, FacilityCsvImporter, FacilityDirectory, HttpMlGateway,
    ReasonCode, RecommendationService, RequesterContext, ScoreRequest, ScoringConfig,
    DEFAULT_CAPACITY,
};

fn sample_service() -> RecommendationService<FacilityDirectory, HttpMlGateway> {
    RecommendationService::heuristic_only(
        Arc::new(FacilityDirectory::sample()),
        ScoringConfig::default(),
    )
}

fn request(purpose: &str, attendees: u32) -> ScoreRequest {
    ScoreRequest {
        purpose: purpose.to_string(),
        expected_attendees: attendees,
        reservation_date: Some("2026-03-14".to_string()),
        time_slot: Some("16:00-19:00".to_string()),
        commercial: false,
        requester: RequesterContext {
            resident_id: Some("RES-01".to_string()),
            // Near the sample catalog's covered court.
            coordinates: Some(Coordinates::new(14.675, 121.043)),
        },
    }
}

#[tokio::test]
async fn basketball_request_ranks_the_covered_court_first() {
    let service = sample_service();

    let outcome = service
        .recommend(&request("basketball tournament", 150))
        .await
        .expect("heuristic ranking succeeds");

    assert!(!outcome.backend.ml_enabled());
    assert!(outcome.recommendations.len() <= 5);

    let top = &outcome.recommendations[0];
    assert_eq!(top.facility_id.0, "FAC-001");
    assert!(top
        .reasons
        .iter()
        .any(|reason| reason.code == ReasonCode::SportsVenue));
    assert!(top
        .reasons
        .iter()
        .any(|reason| reason.code == ReasonCode::CapacityFit));
    assert!(top.distance_label.is_some());

    // The venue under maintenance never appears.
    assert!(outcome
        .recommendations
        .iter()
        .all(|entry| entry.facility_id.0 != "FAC-005"));
}

#[tokio::test]
async fn wedding_request_prefers_the_events_hall() {
    let service = sample_service();

    let outcome = service
        .recommend(&request("wedding reception", 110))
        .await
        .expect("heuristic ranking succeeds");

    let top = &outcome.recommendations[0];
    assert_eq!(top.facility_id.0, "FAC-003");
    assert!(top
        .reasons
        .iter()
        .any(|reason| reason.code == ReasonCode::EventVenue));
}

#[tokio::test]
async fn imported_roster_feeds_the_scorer() {
    let csv = "id,name,description,amenities,location,capacity,latitude,longitude,status\n\
FAC-101,Riverside Court,Open court by the river,basketball court,Riverside,120,14.675,121.044,available\n\
FAC-102,Storage Depot,Roster noise,shelving,Warehouse Row,not-a-number,,,available\n\
FAC-103,Closed Annex,Former clinic,meeting room,Poblacion,40,14.675,121.045,retired\n";

    let facilities =
        FacilityCsvImporter::from_reader(Cursor::new(csv.as_bytes().to_vec())).expect("csv imports");
    let directory = FacilityDirectory::new(facilities);
    let available = directory.available().expect("directory reads");
    // The retired annex is excluded; the malformed capacity is coerced.
    assert_eq!(available.len(), 2);
    assert!(available
        .iter()
        .any(|facility| facility.capacity == DEFAULT_CAPACITY));

    let service = RecommendationService::<_, HttpMlGateway>::heuristic_only(
        Arc::new(directory),
        ScoringConfig::default(),
    );
    let outcome = service
        .recommend(&request("basketball practice", 100))
        .await
        .expect("heuristic ranking succeeds");

    assert_eq!(outcome.recommendations[0].facility_id.0, "FAC-101");
}

#[tokio::test]
async fn advisory_labels_accompany_the_ranking() {
    let service = sample_service();
    let score_request = request("zumba for senior citizens", 40);

    let outcome = service
        .recommend(&score_request)
        .await
        .expect("heuristic ranking succeeds");
    let advice = TimeAdvisor.advise(&score_request.purpose);

    assert!(!outcome.recommendations.is_empty());
    assert_eq!(advice.suggested_slots, vec!["06:00-09:00", "16:00-19:00"]);
}
