use chrono::{DateTime, Utc};
use serde::Serialize;

/// Hash-bound proof that a clock-out signature belongs to specific shift facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub form_data_hash: String,
    pub signature_hash: String,
    pub binding_hash: String,
    pub worker_id: i64,
    pub entry_id: Option<i64>,
    pub signed_at: DateTime<Utc>,
}
