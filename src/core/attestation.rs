//! Tamper-evident attestation of a signed clock-out.
//!
//! Three SHA-256 digests are stored: one over the clock-out facts, one
//! binding the signature to its timestamp, worker and origin, and one
//! binding those two together. Changing any fact or the signature changes
//! the binding hash.

use crate::models::attestation::Attestation;
use crate::utils::time::to_db_instant;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// The structured facts of a clock-out, hashed in this field order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutFacts<'a> {
    pub worker_id: i64,
    pub code: &'a str,
    pub action: &'a str,
    pub timestamp: String,
    pub division: &'a str,
    pub event_id: Option<i64>,
}

fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

pub fn form_data_hash(facts: &ClockOutFacts<'_>) -> String {
    // serializing a plain struct of strings and integers cannot fail
    let canonical = serde_json::to_vec(facts).unwrap_or_default();
    sha256_hex(&canonical)
}

pub fn signature_hash(signature: &str, at: &DateTime<Utc>, worker_id: i64, origin: &str) -> String {
    let material = format!("{}|{}|{}|{}", signature, to_db_instant(at), worker_id, origin);
    sha256_hex(material.as_bytes())
}

pub fn binding_hash(form_hash: &str, sig_hash: &str) -> String {
    sha256_hex(format!("{form_hash}:{sig_hash}").as_bytes())
}

/// Build the attestation for a signed clock-out.
pub fn attest(
    facts: &ClockOutFacts<'_>,
    signature: &str,
    at: &DateTime<Utc>,
    origin: &str,
    entry_id: Option<i64>,
) -> Attestation {
    let form = form_data_hash(facts);
    let sig = signature_hash(signature, at, facts.worker_id, origin);
    Attestation {
        binding_hash: binding_hash(&form, &sig),
        form_data_hash: form,
        signature_hash: sig,
        worker_id: facts.worker_id,
        entry_id,
        signed_at: *at,
    }
}

/// Check a stored attestation against the facts and signature presented now.
pub fn verify(
    stored: &Attestation,
    facts: &ClockOutFacts<'_>,
    signature: &str,
    origin: &str,
) -> bool {
    let fresh = attest(facts, signature, &stored.signed_at, origin, stored.entry_id);
    fresh.form_data_hash == stored.form_data_hash
        && fresh.signature_hash == stored.signature_hash
        && fresh.binding_hash == stored.binding_hash
}
