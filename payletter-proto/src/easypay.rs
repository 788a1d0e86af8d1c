//! Easy-pay wallet: method registration, lookup, payment and cancel.
//!
//! Easy pay lets a user register cards and bank accounts once and pay with
//! them later by billing key. Every easy-pay request is signed with a
//! `hash_data` field (see [`crate::hash`]) and stamped with a [`ReqDate`].
//!
//! The caller-facing request types here omit the merchant fields
//! (`client_id`, `ip_addr`, `hash_data`); the `sign`/`into_body` methods add
//! them from the merchant credentials.

use serde::{Deserialize, Serialize};

use crate::codes::{self, PgCode};
use crate::hash;
use crate::payment::{PaymentDetails, PaymentRequestBody};
use crate::req_date::ReqDate;

/// Request to open the easy-pay method registration window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMethodRequest {
    /// Merchant-side user id.
    pub user_id: u64,
    /// Service name shown in the registration window.
    pub service_name: String,
    /// Kind of method to register (`creditcard`, `easybank`).
    pub payment_method: PgCode,
    /// Browser redirect on success.
    pub return_url: String,
    /// Browser redirect on abort.
    pub cancel_url: String,
    /// Request timestamp used in the signature.
    pub req_date: ReqDate,
}

/// Signed wire body of the method registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMethodBody {
    /// Merchant client id.
    pub client_id: String,
    /// Merchant-side user id.
    pub user_id: u64,
    /// Service name.
    pub service_name: String,
    /// Kind of method to register.
    pub payment_method: PgCode,
    /// Browser redirect on success.
    pub return_url: String,
    /// Browser redirect on abort.
    pub cancel_url: String,
    /// Request timestamp.
    pub req_date: ReqDate,
    /// [`hash::user_hash`] signature.
    pub hash_data: String,
}

impl RegisterMethodRequest {
    /// Adds the merchant client id and the request signature.
    #[must_use]
    pub fn sign(self, client_id: &str, api_key: &str) -> RegisterMethodBody {
        let hash_data = hash::user_hash(client_id, self.user_id, self.req_date.as_str(), api_key);
        RegisterMethodBody {
            client_id: client_id.to_owned(),
            user_id: self.user_id,
            service_name: self.service_name,
            payment_method: self.payment_method,
            return_url: self.return_url,
            cancel_url: self.cancel_url,
            req_date: self.req_date,
            hash_data,
        }
    }
}

/// Easy-pay window handle returned by registration and payment requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayUiResponse {
    /// Window authentication token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// URL to send the customer's browser to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Merchant order number, present on payment requests only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,
}

/// Lookup of a user's registered easy-pay methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodsQuery {
    /// Merchant-side user id.
    pub user_id: u64,
    /// Request timestamp used in the signature.
    pub req_date: ReqDate,
}

impl MethodsQuery {
    /// Builds the signed query string parameters.
    #[must_use]
    pub fn to_query(&self, client_id: &str, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", client_id.to_owned()),
            ("user_id", self.user_id.to_string()),
            ("req_date", self.req_date.to_string()),
            (
                "hash_data",
                hash::user_hash(client_id, self.user_id, self.req_date.as_str(), api_key),
            ),
        ]
    }
}

/// Number of registered methods per payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayMethodCount {
    /// Payment method.
    #[serde(rename = "paymentMethod")]
    pub payment_method: PgCode,
    /// Registered method count.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub count: u64,
}

/// A registered easy-pay method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayMethod {
    /// Payment method.
    pub payment_method: PgCode,
    /// Billing key to charge this method with.
    pub billkey: String,
    /// User-chosen alias.
    #[serde(default)]
    pub alias_name: String,
    /// `Y` when this is the user's favorite method.
    #[serde(default)]
    pub favorite_flag: String,
    /// Registration timestamp.
    #[serde(default)]
    pub method_reg_date: String,
    /// Masked card or account number.
    #[serde(default)]
    pub method_info: String,
    /// Card issuer or bank code.
    #[serde(default)]
    pub method_code: String,
    /// Issuer logo URL.
    #[serde(default)]
    pub method_img_url: String,
    /// Card type (credit/check).
    #[serde(default)]
    pub card_type_code: String,
    /// `Y` when installments are allowed.
    #[serde(default)]
    pub installment_use_flag: String,
    /// Minimum amount for installments.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub min_installment_amount: u64,
    /// Allowed installment months.
    #[serde(default)]
    pub installment_months: String,
    /// Interest-free installment months.
    #[serde(default)]
    pub free_installment_months: String,
    /// Card product code.
    #[serde(default)]
    pub product_code: String,
    /// Card product name.
    #[serde(default)]
    pub product_name: String,
    /// Last transaction timestamp.
    #[serde(default)]
    pub last_tran_date: String,
    /// Display name of `method_code`, resolved locally.
    #[serde(default)]
    pub method_name: String,
}

/// A user's registered easy-pay methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredMethods {
    /// Total number of registered methods.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub total_count: u64,
    /// Easy-pay membership date.
    #[serde(default)]
    pub join_date: String,
    /// Per-method counts. Never `null`.
    #[serde(default, deserialize_with = "crate::lenient::vec_or_null")]
    pub method_count: Vec<EasyPayMethodCount>,
    /// Registered methods. Never `null`.
    #[serde(default, deserialize_with = "crate::lenient::vec_or_null")]
    pub method_list: Vec<EasyPayMethod>,
    /// `Y` when the user skips the payment password.
    #[serde(default)]
    pub password_skip_flag: String,
}

impl RegisteredMethods {
    /// Fills every card and bank method's `method_name` from the code tables.
    ///
    /// An unknown code clears the name. Methods of other payment types keep
    /// whatever name they already carry.
    pub fn resolve_method_names(&mut self) {
        for method in &mut self.method_list {
            if matches!(method.payment_method, PgCode::CreditCard | PgCode::EasyBank) {
                codes::method_name(&method.payment_method, &method.method_code)
                    .unwrap_or_default()
                    .clone_into(&mut method.method_name);
            }
        }
    }
}

/// Cancel of an easy-pay transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayCancelRequest {
    /// Merchant-side user id.
    pub user_id: u64,
    /// Gateway transaction id to cancel.
    pub tid: String,
    /// Amount to cancel, in KRW.
    pub amount: u64,
    /// Request timestamp used in the signature.
    pub req_date: ReqDate,
}

/// Signed wire body of the easy-pay cancel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayCancelBody {
    /// Merchant client id.
    pub client_id: String,
    /// Merchant-side user id.
    pub user_id: u64,
    /// Gateway transaction id.
    pub tid: String,
    /// Amount to cancel.
    pub amount: u64,
    /// Request timestamp.
    pub req_date: ReqDate,
    /// [`hash::cancel_hash`] signature.
    pub hash_data: String,
    /// Merchant server IP address.
    pub ip_addr: String,
}

impl EasyPayCancelRequest {
    /// Adds the merchant fields and the request signature.
    #[must_use]
    pub fn sign(self, client_id: &str, ip_addr: &str, api_key: &str) -> EasyPayCancelBody {
        let hash_data = hash::cancel_hash(
            client_id,
            &self.tid,
            self.amount,
            self.req_date.as_str(),
            api_key,
        );
        EasyPayCancelBody {
            client_id: client_id.to_owned(),
            user_id: self.user_id,
            tid: self.tid,
            amount: self.amount,
            req_date: self.req_date,
            hash_data,
            ip_addr: ip_addr.to_owned(),
        }
    }
}

/// Result of an easy-pay cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayCancelResponse {
    /// Gateway transaction id.
    pub tid: String,
    /// Cancel approval id.
    #[serde(default)]
    pub cid: String,
    /// Canceled amount.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub amount: u64,
    /// Cancel timestamp.
    #[serde(default)]
    pub cancel_date: String,
}

/// Payment with a registered easy-pay method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyPayPaymentRequest {
    /// Transaction data.
    #[serde(flatten)]
    pub details: PaymentDetails,
    /// Request timestamp used in the signature.
    pub req_date: ReqDate,
    /// Billing key of the registered method to charge.
    pub billkey: String,
    /// `Y` to issue a cash receipt.
    #[serde(default)]
    pub receipt_flag: String,
    /// Cash receipt type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_type: Option<String>,
    /// Cash receipt identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_info: Option<String>,
    /// Card installment months, `0` for lump sum.
    #[serde(default)]
    pub install_month: u8,
}

impl EasyPayPaymentRequest {
    /// Builds the signed wire body.
    #[must_use]
    pub fn into_body(self, client_id: &str, api_key: &str) -> PaymentRequestBody {
        let hash_data = hash::user_hash(
            client_id,
            self.details.user_id,
            self.req_date.as_str(),
            api_key,
        );
        let mut body = PaymentRequestBody::from_details(self.details, client_id);
        body.receipt_flag = Some(self.receipt_flag);
        body.req_date = Some(self.req_date.to_string());
        body.hash_data = Some(hash_data);
        body.billkey = Some(self.billkey);
        body.receipt_type = self.receipt_type;
        body.receipt_info = self.receipt_info;
        body.install_month = Some(format!("{:02}", self.install_month));
        body
    }
}
