use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::domain::{Facility, FacilityId, ScoreRequest};

/// External ranking model, treated as an optional enhancement. Callers must
/// bound the call and degrade to the heuristic on any failure.
pub trait MlGateway: Send + Sync {
    fn rank(
        &self,
        request: &GatewayRequest,
    ) -> impl Future<Output = Result<Vec<GatewayRanking>, GatewayError>> + Send;
}

/// Candidate reduced to the fields the model consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayCandidate {
    pub facility_id: FacilityId,
    pub name: String,
    pub capacity: u32,
    pub amenities: String,
}

/// Wire request sent to the ranking model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub purpose: String,
    pub expected_attendees: u32,
    pub reservation_date: Option<String>,
    pub time_slot: Option<String>,
    pub commercial: bool,
    pub candidates: Vec<GatewayCandidate>,
}

impl GatewayRequest {
    pub fn new(request: &ScoreRequest, candidates: &[Facility]) -> Self {
        Self {
            purpose: request.purpose.trim().to_string(),
            expected_attendees: request.attendees_or_default(),
            reservation_date: request.reservation_date.clone(),
            time_slot: request.time_slot.clone(),
            commercial: request.commercial,
            candidates: candidates
                .iter()
                .map(|facility| GatewayCandidate {
                    facility_id: facility.id.clone(),
                    name: facility.name.clone(),
                    capacity: facility.capacity,
                    amenities: facility.amenities.clone(),
                })
                .collect(),
        }
    }
}

/// One ranked facility as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayRanking {
    pub facility_id: FacilityId,
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// Error enumeration for gateway calls. Never surfaced to API callers; the
/// orchestration logs and falls back.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway transport failed: {0}")]
    Transport(String),
    #[error("gateway returned status {0}")]
    Status(u16),
    #[error("gateway payload could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    #[serde(default)]
    recommendations: Vec<GatewayRanking>,
}

/// HTTP client for the external ranking service. The client-level timeout
/// is a second line of defense under the orchestrator's own budget.
pub struct HttpMlGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMlGateway {
    pub fn new(endpoint: impl Into<String>, budget: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(budget)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl MlGateway for HttpMlGateway {
    async fn rank(&self, request: &GatewayRequest) -> Result<Vec<GatewayRanking>, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let envelope: GatewayEnvelope = response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;

        Ok(envelope.recommendations)
    }
}
