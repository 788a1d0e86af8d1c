//! Offline [`PaymentGateway`] for tests and local development.
//!
//! [`MockGateway`] never touches the network. A succeeding mock echoes the
//! request back in gateway-shaped responses; a failing one rejects every call
//! with [`PayletterError::Mock`].

use chrono::Utc;
use payletter_proto::{
    AutoPayRequest, AutoPayResponse, CancelRequest, CancelResponse, EasyPayCancelRequest,
    EasyPayCancelResponse, EasyPayPaymentRequest, EasyPayUiResponse, MethodsQuery,
    NormalPaymentRequest, NormalPaymentResponse, PartialCancelRequest, RegisterAutoPayRequest,
    RegisterAutoPayResponse, RegisterMethodRequest, RegisteredMethods, TransactionList,
    TransactionListQuery,
};

use crate::error::PayletterError;
use crate::gateway::PaymentGateway;

const MOCK_TID: &str = "tid";
const MOCK_CID: &str = "cid";
const MOCK_TOKEN: &str = "token";
const MOCK_URL: &str = "https://mock.payletter.invalid/";

/// A gateway that always succeeds or always fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockGateway {
    succeed: bool,
}

impl MockGateway {
    /// A gateway on which every payment and cancel succeeds.
    #[must_use]
    pub const fn succeeding() -> Self {
        Self { succeed: true }
    }

    /// A gateway on which every call fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self { succeed: false }
    }

    /// Returns `true` for a [`MockGateway::succeeding`] gateway.
    #[must_use]
    pub const fn is_succeeding(&self) -> bool {
        self.succeed
    }

    fn respond<R>(&self, response: impl FnOnce() -> R) -> Result<R, PayletterError> {
        if self.succeed {
            Ok(response())
        } else {
            Err(PayletterError::Mock)
        }
    }
}

fn window_url(kind: &str, order_no: &str) -> String {
    format!("{MOCK_URL}{kind}?order_no={order_no}")
}

fn now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    async fn register_auto_pay(
        &self,
        request: RegisterAutoPayRequest,
    ) -> Result<RegisterAutoPayResponse, PayletterError> {
        self.respond(|| RegisterAutoPayResponse {
            online_url: window_url("online", &request.order_no),
            mobile_url: window_url("mobile", &request.order_no),
            token: None,
        })
    }

    async fn charge_auto_pay(
        &self,
        request: AutoPayRequest,
    ) -> Result<AutoPayResponse, PayletterError> {
        self.respond(|| AutoPayResponse {
            tid: MOCK_TID.to_owned(),
            cid: MOCK_CID.to_owned(),
            amount: request.amount,
            billkey: request.billkey,
            transaction_date: now(),
        })
    }

    async fn cancel_transaction(
        &self,
        request: CancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        self.respond(|| CancelResponse {
            tid: request.tid,
            cid: MOCK_CID.to_owned(),
            amount: 0,
            cancel_date: Some(now()),
        })
    }

    async fn partial_cancel_transaction(
        &self,
        request: PartialCancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        self.respond(|| CancelResponse {
            tid: request.tid,
            cid: MOCK_CID.to_owned(),
            amount: request.amount,
            cancel_date: Some(now()),
        })
    }

    async fn request_normal_payment(
        &self,
        request: NormalPaymentRequest,
    ) -> Result<NormalPaymentResponse, PayletterError> {
        let order_no = request.details.order_no;
        self.respond(|| NormalPaymentResponse {
            online_url: window_url("online", &order_no),
            mobile_url: window_url("mobile", &order_no),
            order_no: Some(order_no),
            token: None,
        })
    }

    async fn list_transactions(
        &self,
        _query: &TransactionListQuery,
    ) -> Result<TransactionList, PayletterError> {
        self.respond(TransactionList::default)
    }

    async fn register_easy_pay_method(
        &self,
        request: RegisterMethodRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        self.respond(|| EasyPayUiResponse {
            token: Some(MOCK_TOKEN.to_owned()),
            redirect_url: Some(format!(
                "{MOCK_URL}register-method?user_id={}",
                request.user_id
            )),
            order_no: None,
        })
    }

    async fn registered_easy_pay_methods(
        &self,
        _query: &MethodsQuery,
    ) -> Result<RegisteredMethods, PayletterError> {
        self.respond(RegisteredMethods::default)
    }

    async fn cancel_easy_pay(
        &self,
        request: EasyPayCancelRequest,
    ) -> Result<EasyPayCancelResponse, PayletterError> {
        self.respond(|| EasyPayCancelResponse {
            tid: request.tid,
            cid: MOCK_CID.to_owned(),
            amount: request.amount,
            cancel_date: now(),
        })
    }

    async fn request_easy_pay_payment(
        &self,
        request: EasyPayPaymentRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        let order_no = request.details.order_no;
        self.respond(|| EasyPayUiResponse {
            token: Some(MOCK_TOKEN.to_owned()),
            redirect_url: Some(window_url("pay", &order_no)),
            order_no: Some(order_no),
        })
    }
}
