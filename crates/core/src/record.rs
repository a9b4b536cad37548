use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::quote::{Quote, QuoteRequest};
use crate::errors::PricingError;
use crate::pricing::settings::EngineSettings;
use crate::pricing::QuoteComposer;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRecordId(pub String);

/// Storable quote: the inputs that produced it travel with the numbers so the
/// quote can be recomputed and audited later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteRecordId,
    pub created_at: DateTime<Utc>,
    pub request: QuoteRequest,
    pub quote: Quote,
    pub input_checksum: String,
    /// Checksum of the engine settings the quote was priced under.
    pub settings_checksum: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordVerification {
    pub record_id: QuoteRecordId,
    pub valid: bool,
    pub checksum_matches: bool,
    pub quote_matches: bool,
    pub settings_match: bool,
    pub failure_reason: Option<String>,
}

impl QuoteRecord {
    pub fn create(
        request: QuoteRequest,
        composer: &dyn QuoteComposer,
    ) -> Result<Self, PricingError> {
        let quote = composer.compose(&request)?;
        Ok(Self {
            id: QuoteRecordId(Uuid::new_v4().to_string()),
            created_at: Utc::now(),
            input_checksum: request_checksum(&request),
            settings_checksum: settings_checksum(composer.settings()),
            request,
            quote,
        })
    }

    /// Recomputes the quote from the stored request and compares it with the
    /// stored numbers.
    pub fn verify(&self, composer: &dyn QuoteComposer) -> RecordVerification {
        let checksum_matches = request_checksum(&self.request) == self.input_checksum;
        let recomputed = composer.compose(&self.request);
        let quote_matches = matches!(&recomputed, Ok(quote) if *quote == self.quote);
        let settings_match = settings_checksum(composer.settings()) == self.settings_checksum;

        let failure_reason = if !checksum_matches {
            Some("stored inputs do not match their checksum".to_string())
        } else {
            match recomputed {
                Err(error) => Some(format!("stored inputs no longer price: {error}")),
                Ok(_) if !quote_matches && !settings_match => {
                    Some("recomputed quote differs under changed engine settings".to_string())
                }
                Ok(_) if !quote_matches => {
                    Some("recomputed quote differs from stored quote".to_string())
                }
                Ok(_) => None,
            }
        };

        RecordVerification {
            record_id: self.id.clone(),
            valid: failure_reason.is_none(),
            checksum_matches,
            quote_matches,
            settings_match,
            failure_reason,
        }
    }
}

pub fn request_checksum(request: &QuoteRequest) -> String {
    content_checksum(request)
}

pub fn settings_checksum(settings: &EngineSettings) -> String {
    content_checksum(settings)
}

fn content_checksum<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    let canonical_payload = match serde_json::to_vec(value) {
        Ok(payload) => payload,
        Err(_) => format!("{value:?}").into_bytes(),
    };
    let mut hasher = Sha256::new();
    hasher.update(&canonical_payload);
    format!("sha256:{:x}", hasher.finalize())
}
