//! Auto-pay (billing key) registration and charges.
//!
//! Registration opens a payment window with `autopay_flag = "Y"`. When the
//! customer completes it, the callback carries a `billkey` that later
//! [`AutoPayRequest`]s charge without further customer interaction.

use serde::{Deserialize, Serialize};

use crate::codes::PgCode;
use crate::payment::PaymentRequestBody;
use crate::{FLAG_NO, FLAG_YES};

/// Request to open a billing-key registration window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAutoPayRequest {
    /// Payment method to register.
    pub pgcode: PgCode,
    /// Service name shown in the payment window.
    pub service_name: String,
    /// Merchant-side user id.
    pub user_id: u64,
    /// User display name.
    pub user_name: String,
    /// Merchant order number.
    pub order_no: String,
    /// Amount approved during registration, in KRW.
    pub amount: u64,
    /// Product name shown in the payment window.
    pub product_name: String,
    /// Opaque value echoed back in the callback.
    #[serde(default)]
    pub custom_parameter: String,
    /// Browser redirect on success; receives a [`PaymentCallback`](crate::PaymentCallback) (POST).
    pub return_url: String,
    /// Server-to-server result notification URL (POST).
    pub callback_url: String,
    /// Browser redirect when the customer aborts (GET).
    pub cancel_url: String,
}

impl RegisterAutoPayRequest {
    /// Builds the wire body with auto-pay enabled and receipts disabled.
    #[must_use]
    pub fn into_body(self, client_id: impl Into<String>) -> PaymentRequestBody {
        PaymentRequestBody {
            pgcode: self.pgcode,
            client_id: client_id.into(),
            service_name: self.service_name,
            user_id: self.user_id,
            user_name: self.user_name,
            order_no: self.order_no,
            amount: self.amount,
            product_name: self.product_name,
            email_flag: FLAG_NO.to_owned(),
            email_addr: String::new(),
            autopay_flag: FLAG_YES.to_owned(),
            receipt_flag: Some(FLAG_NO.to_owned()),
            custom_parameter: self.custom_parameter,
            return_url: self.return_url,
            callback_url: self.callback_url,
            cancel_url: self.cancel_url,
            req_date: None,
            hash_data: None,
            billkey: None,
            receipt_type: None,
            receipt_info: None,
            install_month: None,
        }
    }
}

/// Payment window URLs for a billing-key registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAutoPayResponse {
    /// Window URL for desktop browsers.
    pub online_url: String,
    /// Window URL for mobile browsers.
    pub mobile_url: String,
    /// Payment authentication token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<i64>,
}

/// Charge against a previously registered billing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPayRequest {
    /// Payment method the billing key belongs to.
    pub pgcode: PgCode,
    /// Merchant client id. Filled in by the client from its credentials.
    #[serde(default)]
    pub client_id: String,
    /// Service name.
    pub service_name: String,
    /// Merchant-side user id.
    pub user_id: u64,
    /// User display name.
    pub user_name: String,
    /// Merchant order number.
    pub order_no: String,
    /// Amount to charge, in KRW.
    pub amount: u64,
    /// Product name.
    pub product_name: String,
    /// Billing key issued at registration.
    pub billkey: String,
}

/// Result of an auto-pay charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPayResponse {
    /// Gateway transaction id.
    pub tid: String,
    /// Approval id.
    pub cid: String,
    /// Charged amount in KRW.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub amount: u64,
    /// Billing key to use for the next charge.
    pub billkey: String,
    /// Approval timestamp.
    pub transaction_date: String,
}
