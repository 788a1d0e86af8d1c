//! Wire format types for the Payletter PG API.
//!
//! This crate defines the serialization-level data structures exchanged with
//! the Payletter payment gateway, the static code tables used to render
//! card issuers and banks, and the keyed SHA-256 signatures the gateway
//! requires on easy-pay requests and uses to authenticate payment callbacks.
//! It performs no I/O and is shared by the `payletter` client and CLI.
//!
//! # Modules
//!
//! - [`codes`] — PG codes and the card/bank display-name tables
//! - [`hash`] — Request and callback signatures
//! - [`req_date`] — The `yyyyMMddHHmmss` request timestamp
//! - [`autopay`] — Billing-key registration and auto-pay charges
//! - [`payment`] — Normal payments, the shared request body and callbacks
//! - [`cancel`] — Full and partial transaction cancellation
//! - [`easypay`] — Easy-pay wallet registration, lookup, payment and cancel
//! - [`history`] — Transaction history listing
//! - [`envelope`] — Gateway error envelope detection

pub mod autopay;
pub mod cancel;
pub mod codes;
pub mod easypay;
pub mod envelope;
pub mod hash;
pub mod history;
mod lenient;
pub mod payment;
pub mod req_date;

pub use autopay::{
    AutoPayRequest, AutoPayResponse, RegisterAutoPayRequest, RegisterAutoPayResponse,
};
pub use cancel::{CancelRequest, CancelResponse, PartialCancelRequest};
pub use codes::PgCode;
pub use easypay::{
    EasyPayCancelBody, EasyPayCancelRequest, EasyPayCancelResponse, EasyPayMethod,
    EasyPayMethodCount, EasyPayPaymentRequest, EasyPayUiResponse, MethodsQuery,
    RegisterMethodBody, RegisterMethodRequest, RegisteredMethods,
};
pub use envelope::GatewayErrorBody;
pub use history::{DateType, TransactionList, TransactionListQuery, TransactionRecord};
pub use payment::{
    CashReceipt, NaverPayCredentials, NormalPaymentRequest, NormalPaymentResponse,
    PaymentCallback, PaymentDetails, PaymentRequestBody,
};
pub use req_date::ReqDate;

/// Value the gateway expects for an enabled flag (`autopay_flag`, `email_flag`, ...).
pub const FLAG_YES: &str = "Y";

/// Value the gateway expects for a disabled flag.
pub const FLAG_NO: &str = "N";

/// Errors that can occur when handling Payletter protocol messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The `payhash` of a payment callback does not match the recomputed hash.
    #[error("payhash verification failed for tid {tid}")]
    HashMismatch {
        /// Transaction id carried by the callback.
        tid: String,
    },

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
