//! Transaction cancellation.
//!
//! A full cancel voids the whole transaction; a partial cancel refunds part
//! of the approved amount and may be repeated until nothing is left.

use serde::{Deserialize, Serialize};

use crate::codes::PgCode;

/// Full cancel of an approved transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    /// Payment method of the original transaction.
    pub pgcode: PgCode,
    /// Merchant client id. Filled in by the client from its credentials.
    #[serde(default)]
    pub client_id: String,
    /// Merchant-side user id of the original transaction.
    pub user_id: u64,
    /// Gateway transaction id to cancel.
    pub tid: String,
    /// Merchant server IP address. Filled in by the client from its credentials.
    #[serde(default)]
    pub ip_addr: String,
}

/// Partial cancel of an approved transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCancelRequest {
    /// Payment method of the original transaction.
    pub pgcode: PgCode,
    /// Merchant client id. Filled in by the client from its credentials.
    #[serde(default)]
    pub client_id: String,
    /// Merchant-side user id of the original transaction.
    pub user_id: u64,
    /// Gateway transaction id to cancel.
    pub tid: String,
    /// Amount to refund, in KRW.
    pub amount: u64,
    /// Taxable portion of the refund.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<u64>,
    /// Tax-free portion of the refund.
    #[serde(
        default,
        rename = "taxfree_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_free_amount: Option<u64>,
    /// Merchant server IP address. Filled in by the client from its credentials.
    #[serde(default)]
    pub ip_addr: String,
}

/// Result of a full or partial cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Gateway transaction id.
    pub tid: String,
    /// Cancel approval id.
    #[serde(default)]
    pub cid: String,
    /// Canceled amount in KRW.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub amount: u64,
    /// Cancel timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_date: Option<String>,
}
