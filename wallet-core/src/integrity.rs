//! Transaction integrity fingerprints
//!
//! A fingerprint binds a transaction's rider, amount, kind, and timestamp
//! into a short derived checksum. Recomputing from the same four fields
//! always reproduces the same value; a mismatch signals corruption or
//! out-of-band edits.
//!
//! The digest is unkeyed, so it is tamper evidence rather than an
//! authentication boundary.

use crate::types::{RiderId, TransactionKind};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Delimiter between fingerprinted fields
const FIELD_DELIMITER: char = '|';

/// Stored fingerprint length in hex characters
pub const FINGERPRINT_LEN: usize = 16;

/// Canonical 2-decimal rendering of an amount
///
/// `100`, `100.0`, and `100.00` must fingerprint identically.
fn canonical_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Compute the fingerprint over (rider, amount, kind, timestamp)
///
/// SHA-256 over the delimiter-joined canonical fields, hex-encoded and
/// truncated to [`FINGERPRINT_LEN`] characters for storage economy.
pub fn fingerprint(
    rider_id: &RiderId,
    amount: Decimal,
    kind: TransactionKind,
    timestamp_millis: i64,
) -> String {
    let payload = format!(
        "{}{delim}{}{delim}{}{delim}{}",
        rider_id.as_str(),
        canonical_amount(amount),
        kind.as_str(),
        timestamp_millis,
        delim = FIELD_DELIMITER,
    );

    let digest = Sha256::digest(payload.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}

/// Recompute the fingerprint and compare with the claimed hash
pub fn verify(
    rider_id: &RiderId,
    amount: Decimal,
    kind: TransactionKind,
    timestamp_millis: i64,
    claimed: &str,
) -> bool {
    fingerprint(rider_id, amount, kind, timestamp_millis) == claimed
}
