//! Payment request bodies and payment-result callbacks.
//!
//! Every payment window the gateway opens (billing-key registration, normal
//! payment, easy-pay payment) is requested through the same
//! `POST /v1.0/payments/request` body, [`PaymentRequestBody`]. The flows differ
//! only in which flags and optional signature fields they set.
//!
//! When the customer finishes the payment window, the gateway POSTs a
//! [`PaymentCallback`] to the merchant's `return_url` / `callback_url`.

use serde::{Deserialize, Serialize};

use crate::codes::{self, PgCode};
use crate::hash;
use crate::{FLAG_NO, FLAG_YES, ProtocolError};

/// Transaction data shared by normal and easy-pay payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Payment method.
    pub pgcode: PgCode,

    /// Merchant-side user id.
    pub user_id: u64,

    /// User display name.
    pub user_name: String,

    /// Service name shown in the payment window.
    pub service_name: String,

    /// Merchant order number.
    pub order_no: String,

    /// Amount in KRW.
    pub amount: u64,

    /// Product name shown in the payment window.
    pub product_name: String,

    /// `Y` to e-mail a receipt to `email_addr`, `N` not to. Left empty, the
    /// flag follows whether an address is set.
    #[serde(default)]
    pub email_flag: String,

    /// Receipt e-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_addr: Option<String>,

    /// Opaque value echoed back in the callback.
    #[serde(default)]
    pub custom_parameter: String,

    /// URL the customer's browser is sent to on success (POST).
    pub return_url: String,

    /// Server-to-server result notification URL (POST).
    pub callback_url: String,

    /// URL the customer's browser is sent to when they abort (GET).
    pub cancel_url: String,
}

/// Wire body of `POST /v1.0/payments/request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequestBody {
    /// Payment method.
    pub pgcode: PgCode,
    /// Merchant client id the payment is booked under.
    pub client_id: String,
    /// Service name shown in the payment window.
    pub service_name: String,
    /// Merchant-side user id.
    pub user_id: u64,
    /// User display name.
    pub user_name: String,
    /// Merchant order number.
    pub order_no: String,
    /// Amount in KRW.
    pub amount: u64,
    /// Product name shown in the payment window.
    pub product_name: String,
    /// `Y` to e-mail a receipt to `email_addr`.
    pub email_flag: String,
    /// Receipt e-mail address.
    #[serde(default)]
    pub email_addr: String,
    /// `Y` to issue a billing key for later auto-pay charges.
    pub autopay_flag: String,
    /// `Y` to issue a cash receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_flag: Option<String>,
    /// Opaque value echoed back in the callback.
    pub custom_parameter: String,
    /// Browser redirect on success.
    pub return_url: String,
    /// Server-to-server result notification URL.
    pub callback_url: String,
    /// Browser redirect on abort.
    pub cancel_url: String,
    /// Request timestamp, set on signed (easy-pay) requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_date: Option<String>,
    /// Request signature, set on signed (easy-pay) requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_data: Option<String>,
    /// Registered easy-pay method to charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billkey: Option<String>,
    /// Cash receipt type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_type: Option<String>,
    /// Cash receipt identity (phone or business number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_info: Option<String>,
    /// Card installment months, two digits (`"00"` for lump sum).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_month: Option<String>,
}

impl PaymentRequestBody {
    /// Builds a one-off (non auto-pay) body from the shared transaction data.
    #[must_use]
    pub fn from_details(details: PaymentDetails, client_id: impl Into<String>) -> Self {
        let email_flag = match (details.email_flag.is_empty(), &details.email_addr) {
            (false, _) => details.email_flag,
            (true, Some(_)) => FLAG_YES.to_owned(),
            (true, None) => FLAG_NO.to_owned(),
        };
        Self {
            pgcode: details.pgcode,
            client_id: client_id.into(),
            service_name: details.service_name,
            user_id: details.user_id,
            user_name: details.user_name,
            order_no: details.order_no,
            amount: details.amount,
            product_name: details.product_name,
            email_flag,
            email_addr: details.email_addr.unwrap_or_default(),
            autopay_flag: FLAG_NO.to_owned(),
            receipt_flag: Some(String::new()),
            custom_parameter: details.custom_parameter,
            return_url: details.return_url,
            callback_url: details.callback_url,
            cancel_url: details.cancel_url,
            req_date: None,
            hash_data: None,
            billkey: None,
            receipt_type: None,
            receipt_info: None,
            install_month: None,
        }
    }
}

/// Alternate merchant credentials used for Naver Pay payments.
///
/// Naver Pay is contracted under a separate Payletter client id, so its
/// payment window must be requested with that id and its own API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaverPayCredentials {
    /// Naver Pay client id.
    pub client_id: String,
    /// Naver Pay payment API key.
    pub api_key: String,
}

impl std::fmt::Debug for NaverPayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverPayCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Request for a normal (one-off) payment window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalPaymentRequest {
    /// Transaction data.
    #[serde(flatten)]
    pub details: PaymentDetails,

    /// Naver Pay credentials, consulted only when `pgcode` is `naverpay`.
    #[serde(default, skip)]
    pub naver_pay: Option<NaverPayCredentials>,
}

impl NormalPaymentRequest {
    /// Returns the Naver Pay credentials that apply to this request, if any.
    #[must_use]
    pub fn naver_pay_override(&self) -> Option<&NaverPayCredentials> {
        if self.details.pgcode == PgCode::NaverPay {
            self.naver_pay.as_ref()
        } else {
            None
        }
    }

    /// Builds the wire body, applying the Naver Pay client id override.
    #[must_use]
    pub fn into_body(self, client_id: &str) -> PaymentRequestBody {
        let client_id = self
            .naver_pay_override()
            .map_or(client_id, |naver| naver.client_id.as_str())
            .to_owned();
        PaymentRequestBody::from_details(self.details, client_id)
    }
}

/// Response to a normal payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalPaymentResponse {
    /// Payment window URL for desktop browsers.
    pub online_url: String,

    /// Payment window URL for mobile browsers.
    pub mobile_url: String,

    /// Merchant order number echoed by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,

    /// Payment authentication token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<i64>,
}

/// Cash receipt section of a payment callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashReceipt {
    /// Issuance result code.
    pub code: String,
    /// Issuance result message.
    pub message: String,
    /// Cash receipt approval id.
    pub cid: String,
    /// Deal number.
    pub deal_no: String,
    /// Issuance type.
    pub issue_type: String,
    /// Identity the receipt was issued to.
    pub payer_sid: String,
    /// Receipt kind (income deduction or expense proof).
    #[serde(rename = "type")]
    pub kind: String,
}

/// Payment result the gateway posts to `return_url` and `callback_url`.
///
/// Fields the gateway omits deserialize to their defaults. Call
/// [`PaymentCallback::verify`] before trusting any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentCallback {
    /// Result code.
    #[serde(deserialize_with = "crate::lenient::string_from_any")]
    pub code: String,
    /// Result message.
    pub message: String,
    /// Merchant-side user id, as a string.
    #[serde(deserialize_with = "crate::lenient::string_from_any")]
    pub user_id: String,
    /// User display name.
    pub user_name: String,
    /// Approved amount in KRW.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub amount: u64,
    /// Taxable portion of the amount.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub tax_amount: u64,
    /// Tax-free portion of the amount.
    #[serde(rename = "taxfree_amount", deserialize_with = "crate::lenient::u64_from_any")]
    pub tax_free_amount: u64,
    /// Gateway transaction id.
    pub tid: String,
    /// Approval id.
    pub cid: String,
    /// Merchant order number.
    pub order_no: String,
    /// Service name.
    pub service_name: String,
    /// Product name.
    pub product_name: String,
    /// Value passed as `custom_parameter` in the request.
    pub custom_parameter: String,
    /// Approval timestamp.
    pub transaction_date: String,
    /// Payment instrument description.
    pub pay_info: String,
    /// Payment method.
    pub pgcode: Option<PgCode>,
    /// `Y` for domestic cards.
    pub domestic_flag: String,
    /// Billing key, present for auto-pay registrations.
    pub billkey: String,
    /// Installment months.
    pub install_month: String,
    /// Card issuer or bank code.
    pub card_code: String,
    /// Masked card number.
    pub card_info: String,
    /// Uppercase hex signature, see [`hash::pay_hash`].
    pub payhash: String,
    /// Disposable cup deposit included in the amount.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub disposable_cup_deposit: u64,
    /// Cash receipt issuance result.
    pub cash_receipt: Option<CashReceipt>,
}

impl PaymentCallback {
    /// Parses a callback from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Json`] if the document is not valid JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Checks that `payhash` was produced with the merchant's payment API key.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::HashMismatch`] when the hash does not match.
    pub fn verify(&self, payment_api_key: &str) -> Result<(), ProtocolError> {
        if hash::verify_pay_hash(
            &self.payhash,
            &self.user_id,
            self.amount,
            &self.tid,
            payment_api_key,
        ) {
            Ok(())
        } else {
            Err(ProtocolError::HashMismatch {
                tid: self.tid.clone(),
            })
        }
    }

    /// Replaces `pay_info` with the display name of `card_code`.
    ///
    /// Easy-pay bank payments resolve through the bank table, everything else
    /// through the card table. Unknown codes leave `pay_info` empty.
    pub fn resolve_pay_info(&mut self) {
        let name = if self.pgcode == Some(PgCode::EasyBank) {
            codes::bank_name(&self.card_code)
        } else {
            codes::card_name(&self.card_code)
        };
        self.pay_info = name.unwrap_or_default().to_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details() -> PaymentDetails {
        PaymentDetails {
            pgcode: PgCode::NaverPay,
            user_id: 42,
            user_name: "홍길동".into(),
            service_name: "shop".into(),
            order_no: "ORD-1".into(),
            amount: 15_000,
            product_name: "coffee".into(),
            email_flag: String::new(),
            email_addr: None,
            custom_parameter: "7".into(),
            return_url: "https://shop.example/return".into(),
            callback_url: "https://shop.example/callback".into(),
            cancel_url: "https://shop.example/cancel".into(),
        }
    }

    #[test]
    fn test_from_details_sets_flags() {
        let body = PaymentRequestBody::from_details(details(), "pay_test");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["client_id"], "pay_test");
        assert_eq!(value["autopay_flag"], "N");
        assert_eq!(value["email_flag"], "N");
        assert_eq!(value["email_addr"], "");
        assert!(value.get("hash_data").is_none());
        assert_eq!(value["receipt_flag"], "");
    }

    #[test]
    fn test_email_flag_follows_address() {
        let mut d = details();
        d.email_addr = Some("buyer@example.com".into());
        let body = PaymentRequestBody::from_details(d, "pay_test");
        assert_eq!(body.email_flag, "Y");
        assert_eq!(body.email_addr, "buyer@example.com");
    }

    #[test]
    fn test_explicit_email_flag_is_kept() {
        let mut d = details();
        d.email_flag = "N".into();
        d.email_addr = Some("buyer@example.com".into());
        let body = PaymentRequestBody::from_details(d, "pay_test");
        assert_eq!(body.email_flag, "N");
        assert_eq!(body.email_addr, "buyer@example.com");

        let mut d = details();
        d.email_flag = "Y".into();
        let request = NormalPaymentRequest {
            details: d,
            naver_pay: None,
        };
        let value = serde_json::to_value(request.into_body("pay_test")).unwrap();
        assert_eq!(value["email_flag"], "Y");
    }

    #[test]
    fn test_naver_pay_override_replaces_client_id() {
        let request = NormalPaymentRequest {
            details: details(),
            naver_pay: Some(NaverPayCredentials {
                client_id: "naver_client".into(),
                api_key: "naver_key".into(),
            }),
        };
        assert_eq!(request.into_body("pay_test").client_id, "naver_client");
    }

    #[test]
    fn test_naver_pay_override_ignored_for_other_methods() {
        let mut d = details();
        d.pgcode = PgCode::CreditCard;
        let request = NormalPaymentRequest {
            details: d,
            naver_pay: Some(NaverPayCredentials {
                client_id: "naver_client".into(),
                api_key: "naver_key".into(),
            }),
        };
        assert!(request.naver_pay_override().is_none());
        assert_eq!(request.into_body("pay_test").client_id, "pay_test");
    }

    #[test]
    fn test_naver_pay_credentials_debug_hides_key() {
        let creds = NaverPayCredentials {
            client_id: "naver_client".into(),
            api_key: "naver_key".into(),
        };
        assert!(!format!("{creds:?}").contains("naver_key"));
    }

    fn signed_callback() -> PaymentCallback {
        serde_json::from_value(json!({
            "code": "0",
            "user_id": "12345",
            "amount": 1000,
            "tid": "TX0001",
            "pgcode": "creditcard",
            "card_code": "P004",
            "taxfree_amount": 0,
            "payhash": hash::pay_hash("12345", 1000, "TX0001", "SECRET"),
            "cash_receipt": { "code": "", "type": "" }
        }))
        .unwrap()
    }

    #[test]
    fn test_callback_verify_accepts_valid_hash() {
        assert!(signed_callback().verify("SECRET").is_ok());
    }

    #[test]
    fn test_callback_verify_rejects_wrong_key() {
        let err = signed_callback().verify("WRONG").unwrap_err();
        assert!(matches!(err, ProtocolError::HashMismatch { tid } if tid == "TX0001"));
    }

    #[test]
    fn test_callback_verify_rejects_tampered_amount() {
        let mut callback = signed_callback();
        callback.amount = 10;
        assert!(callback.verify("SECRET").is_err());
    }

    #[test]
    fn test_resolve_pay_info_card() {
        let mut callback = signed_callback();
        callback.resolve_pay_info();
        assert_eq!(callback.pay_info, "삼성카드");
    }

    #[test]
    fn test_resolve_pay_info_easy_bank() {
        let mut callback = signed_callback();
        callback.pgcode = Some(PgCode::EasyBank);
        callback.card_code = "081".into();
        callback.resolve_pay_info();
        assert_eq!(callback.pay_info, "하나은행");
    }

    #[test]
    fn test_resolve_pay_info_unknown_code_is_empty() {
        let mut callback = signed_callback();
        callback.card_code = "X999".into();
        callback.pay_info = "stale".into();
        callback.resolve_pay_info();
        assert_eq!(callback.pay_info, "");
    }

    #[test]
    fn test_callback_accepts_numeric_code_and_user_id() {
        let callback = PaymentCallback::from_json(
            br#"{"code":0,"user_id":12345,"amount":"1000","tid":"TX0001",
                "payhash":"9D2399E45D39D9FFB58C65A72EEDA888C3C9F09FF0FDDA3194CA9D45FCC30252"}"#,
        )
        .unwrap();
        assert_eq!(callback.code, "0");
        assert_eq!(callback.user_id, "12345");
        assert!(callback.verify("SECRET").is_ok());
    }

    #[test]
    fn test_callback_from_json_tolerates_missing_fields() {
        let callback = PaymentCallback::from_json(br#"{"tid":"T1"}"#).unwrap();
        assert_eq!(callback.tid, "T1");
        assert_eq!(callback.amount, 0);
        assert!(callback.pgcode.is_none());
    }
}
