//! Keyed SHA-256 signatures used by the gateway.
//!
//! Easy-pay requests carry a `hash_data` field computed over a fixed
//! concatenation of request fields and the account's payment API key.
//! Payment callbacks carry a `payhash` computed the same way over the
//! result fields, which lets the merchant reject forged callbacks.
//!
//! Integers are concatenated in base-10 with no padding or separators.

use sha2::{Digest, Sha256};

fn sha256(input: &str) -> impl AsRef<[u8]> {
    Sha256::digest(input.as_bytes())
}

/// Signature for user-scoped easy-pay requests.
///
/// Lowercase hex of `sha256(client_id ‖ user_id ‖ req_date ‖ api_key)`. Used by
/// method registration, method lookup and easy-pay payment requests.
#[must_use]
pub fn user_hash(client_id: &str, user_id: u64, req_date: &str, api_key: &str) -> String {
    hex::encode(sha256(&format!("{client_id}{user_id}{req_date}{api_key}")))
}

/// Signature for easy-pay cancel requests.
///
/// Lowercase hex of `sha256(client_id ‖ tid ‖ amount ‖ req_date ‖ api_key)`.
#[must_use]
pub fn cancel_hash(
    client_id: &str,
    tid: &str,
    amount: u64,
    req_date: &str,
    api_key: &str,
) -> String {
    hex::encode(sha256(&format!("{client_id}{tid}{amount}{req_date}{api_key}")))
}

/// Expected `payhash` of a payment callback.
///
/// Uppercase hex of `sha256(user_id ‖ amount ‖ tid ‖ api_key)`.
#[must_use]
pub fn pay_hash(user_id: &str, amount: u64, tid: &str, api_key: &str) -> String {
    hex::encode_upper(sha256(&format!("{user_id}{amount}{tid}{api_key}")))
}

/// Checks a received `payhash` against the recomputed one, ignoring ASCII case.
#[must_use]
pub fn verify_pay_hash(
    received: &str,
    user_id: &str,
    amount: u64,
    tid: &str,
    api_key: &str,
) -> bool {
    received.eq_ignore_ascii_case(&pay_hash(user_id, amount, tid, api_key))
}
