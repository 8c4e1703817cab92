//! Recognition service HTTP client
//!
//! Two calls per file:
//! 1. `POST {recognize_url}/discovery/v5/{lang}/{country}/{device}/-/tag/{uuid}/{uuid}`
//!    with the audio signature. Returns the match list plus an embedded track.
//! 2. `GET {details_url}/discovery/v5/{lang}/{country}/web/-/track/{id}` for the
//!    first match. Carries the release date, which the tag response usually lacks.
//!
//! Only the first call decides match/no-match. A failed details lookup is
//! logged and the embedded track is used on its own.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{adapter, dto};
use crate::config::{NetworkConfig, ServiceConfig};
use crate::net::{self, HttpError};
use crate::recognition::domain::{RecognitionError, RecognizedTrack, Signature};
use crate::recognition::signature::SignatureGenerator;

/// Recognition service client
pub struct ShazamClient {
    http_client: reqwest::Client,
    service: ServiceConfig,
    network: NetworkConfig,
    signatures: SignatureGenerator,
}

impl ShazamClient {
    /// Create a new client
    pub fn new(
        service: ServiceConfig,
        network: NetworkConfig,
        signatures: SignatureGenerator,
    ) -> Result<Self, RecognitionError> {
        let http_client =
            net::build_client(&network).map_err(|e| RecognitionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            service,
            network,
            signatures,
        })
    }

    /// Recognize the audio in `path`; `Ok(None)` means no match.
    pub async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        let signature = self.signatures.generate(path)?;
        let response = self.send_recognize_request(&signature).await?;

        let Some(match_id) = adapter::best_match_id(&response).map(str::to_string) else {
            tracing::debug!("No match for {:?}", path);
            return Ok(None);
        };

        let details = match self.fetch_details(&match_id).await {
            Ok(track) => Some(track),
            Err(e) => {
                tracing::warn!("Details lookup for match {} failed: {}", match_id, e);
                None
            }
        };

        adapter::to_recognized(response, details)
    }

    fn recognize_url(&self) -> String {
        let tag_id = uuid::Uuid::new_v4().to_string().to_uppercase();
        let installation_id = uuid::Uuid::new_v4().to_string().to_uppercase();
        format!(
            "{}/discovery/v5/{}/{}/{}/-/tag/{}/{}",
            self.service.recognize_url.trim_end_matches('/'),
            self.service.language,
            self.service.country,
            self.service.device,
            tag_id,
            installation_id
        )
    }

    fn details_url(&self, track_id: &str) -> String {
        format!(
            "{}/discovery/v5/{}/{}/web/-/track/{}",
            self.service.details_url.trim_end_matches('/'),
            self.service.language,
            self.service.country,
            track_id
        )
    }

    fn build_request_body(&self, signature: &Signature) -> dto::RecognizeRequest {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        dto::RecognizeRequest {
            geolocation: dto::Geolocation {
                altitude: 300.0,
                latitude: 45.0,
                longitude: 2.0,
            },
            signature: dto::SignaturePayload {
                uri: signature.uri.clone(),
                samplems: signature.sample_ms,
                timestamp: now_ms,
            },
            timestamp: now_ms,
            timezone: self.service.timezone.clone(),
        }
    }

    async fn send_recognize_request(
        &self,
        signature: &Signature,
    ) -> Result<dto::RecognizeResponse, RecognitionError> {
        let url = self.recognize_url();
        let body = self.build_request_body(signature);

        let response = net::send_with_retry(&self.network, || {
            self.http_client
                .post(&url)
                .query(&[
                    ("sync", "true"),
                    ("webv3", "true"),
                    ("sampling", "true"),
                    ("connected", ""),
                    ("shazamapiversion", "v3"),
                    ("sharehub", "true"),
                    ("video", "v3"),
                ])
                .header("X-Shazam-Platform", "IPHONE")
                .header("Accept", "*/*")
                .header("Accept-Language", self.service.language.as_str())
                .json(&body)
        })
        .await
        .map_err(to_recognition_error)?;

        response
            .json::<dto::RecognizeResponse>()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))
    }

    async fn fetch_details(&self, track_id: &str) -> Result<dto::Track, RecognitionError> {
        let url = self.details_url(track_id);

        let response = net::send_with_retry(&self.network, || {
            self.http_client
                .get(&url)
                .query(&[("shazamapiversion", "v3"), ("video", "v3")])
                .header("Accept", "application/json")
        })
        .await
        .map_err(to_recognition_error)?;

        response
            .json::<dto::Track>()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))
    }
}

fn to_recognition_error(error: HttpError) -> RecognitionError {
    match error {
        HttpError::Transport(e) => RecognitionError::Network(e.to_string()),
        HttpError::Status { status, body } => RecognitionError::Api {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            },
        },
    }
}
