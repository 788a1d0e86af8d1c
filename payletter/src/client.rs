//! HTTP client for the Payletter PG and easy-pay APIs.
//!
//! [`PayletterClient`] sends JSON requests authorized with
//! `Authorization: PLKEY <api key>` and maps gateway failures onto
//! [`PayletterError`].
//!
//! ## Response handling
//!
//! The body is always read as text first. A body carrying the gateway error
//! envelope becomes [`PayletterError::Gateway`] regardless of the HTTP status,
//! any other non-2xx response becomes [`PayletterError::HttpStatus`], and only
//! then is the body deserialized into the typed response.

use std::fmt::Display;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use payletter_proto::{
    AutoPayRequest, AutoPayResponse, CancelRequest, CancelResponse, EasyPayCancelRequest,
    EasyPayCancelResponse, EasyPayPaymentRequest, EasyPayUiResponse, GatewayErrorBody,
    MethodsQuery, NormalPaymentRequest, NormalPaymentResponse, PartialCancelRequest,
    PaymentCallback, RegisterAutoPayRequest, RegisterAutoPayResponse, RegisterMethodRequest,
    RegisteredMethods, TransactionList, TransactionListQuery,
};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::config::{Credentials, Endpoints};
use crate::constants::{
    AUTH_SCHEME, AUTOPAY_PATH, CANCEL_PATH, EASY_PAY_CANCEL_PATH, EASY_PAY_METHODS_PATH,
    EASY_PAY_REGISTER_METHOD_PATH, PARTIAL_CANCEL_PATH, PAYMENTS_REQUEST_PATH,
    TRANSACTION_LIST_PATH,
};
use crate::error::PayletterError;

/// A client for one Payletter merchant account.
#[derive(Clone, Debug)]
pub struct PayletterClient {
    /// Shared Reqwest HTTP client
    client: Client,
    /// Merchant account
    credentials: Credentials,
    /// PG API and easy-pay API base URLs
    endpoints: Endpoints,
    /// Optional request timeout
    timeout: Option<Duration>,
}

impl PayletterClient {
    /// Constructs a client for the given account and gateway deployment.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::InvalidHeader`] if an API key cannot be sent
    /// in an `Authorization` header.
    pub fn try_new(credentials: Credentials, endpoints: Endpoints) -> Result<Self, PayletterError> {
        auth_headers(&credentials.payment_api_key)?;
        auth_headers(&credentials.search_api_key)?;
        Ok(Self {
            client: Client::new(),
            credentials,
            endpoints,
            timeout: None,
        })
    }

    /// Sets a timeout for all future requests.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the underlying HTTP client, e.g. to share a connection pool.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the merchant account this client acts for.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the configured base URLs.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Opens a billing-key registration window.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.register_auto_pay",
            skip_all,
            fields(
                order_no = %request.order_no,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn register_auto_pay(
        &self,
        request: RegisterAutoPayRequest,
    ) -> Result<RegisterAutoPayResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(PAYMENTS_REQUEST_PATH)?;
        let body = request.into_body(self.credentials.client_id.as_str());
        self.post_json(
            &url,
            "POST /v1.0/payments/request",
            &self.credentials.payment_api_key,
            &body,
        )
        .await
    }

    /// Charges a registered billing key.
    ///
    /// The request's `client_id` is replaced with the account's.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.charge_auto_pay",
            skip_all,
            fields(
                order_no = %request.order_no,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn charge_auto_pay(
        &self,
        mut request: AutoPayRequest,
    ) -> Result<AutoPayResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(AUTOPAY_PATH)?;
        request.client_id.clone_from(&self.credentials.client_id);
        self.post_json(
            &url,
            "POST /v1.0/payments/autopay",
            &self.credentials.payment_api_key,
            &request,
        )
        .await
    }

    /// Cancels a whole transaction.
    ///
    /// The request's `client_id` and `ip_addr` are replaced with the account's.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.cancel_transaction",
            skip_all,
            fields(
                tid = %request.tid,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn cancel_transaction(
        &self,
        mut request: CancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(CANCEL_PATH)?;
        request.client_id.clone_from(&self.credentials.client_id);
        request.ip_addr.clone_from(&self.credentials.ip_addr);
        self.post_json(
            &url,
            "POST /v1.0/payments/cancel",
            &self.credentials.payment_api_key,
            &request,
        )
        .await
    }

    /// Refunds part of a transaction.
    ///
    /// The request's `client_id` and `ip_addr` are replaced with the account's.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.partial_cancel_transaction",
            skip_all,
            fields(
                tid = %request.tid,
                amount = request.amount,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn partial_cancel_transaction(
        &self,
        mut request: PartialCancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(PARTIAL_CANCEL_PATH)?;
        request.client_id.clone_from(&self.credentials.client_id);
        request.ip_addr.clone_from(&self.credentials.ip_addr);
        self.post_json(
            &url,
            "POST /v1.0/payments/cancel/partial",
            &self.credentials.payment_api_key,
            &request,
        )
        .await
    }

    /// Opens a one-off payment window.
    ///
    /// Naver Pay requests carrying [`NaverPayCredentials`](payletter_proto::NaverPayCredentials)
    /// are sent under that client id and API key instead of the account's.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.request_normal_payment",
            skip_all,
            fields(
                order_no = %request.details.order_no,
                pgcode = %request.details.pgcode,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn request_normal_payment(
        &self,
        request: NormalPaymentRequest,
    ) -> Result<NormalPaymentResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(PAYMENTS_REQUEST_PATH)?;
        let api_key = request
            .naver_pay_override()
            .map_or(self.credentials.payment_api_key.as_str(), |naver| {
                naver.api_key.as_str()
            })
            .to_owned();
        let body = request.into_body(&self.credentials.client_id);
        self.post_json(&url, "POST /v1.0/payments/request", &api_key, &body)
            .await
    }

    /// Lists one page of a day's transactions.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.list_transactions",
            skip_all,
            fields(
                date = %query.date,
                page_no = query.page_no,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, PayletterError> {
        let url = self.endpoints.pg_api_url(TRANSACTION_LIST_PATH)?;
        self.get_json(
            &url,
            "GET /v1.0/payments/transaction/list",
            &self.credentials.search_api_key,
            &query.to_query(&self.credentials.client_id),
        )
        .await
    }

    /// Opens the easy-pay method registration window.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.register_easy_pay_method",
            skip_all,
            fields(
                user_id = request.user_id,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn register_easy_pay_method(
        &self,
        request: RegisterMethodRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        let url = self.endpoints.easy_pay_url(EASY_PAY_REGISTER_METHOD_PATH)?;
        let body = request.sign(
            &self.credentials.client_id,
            &self.credentials.payment_api_key,
        );
        self.post_json(
            &url,
            "POST /api/url/request/register-method",
            &self.credentials.payment_api_key,
            &body,
        )
        .await
    }

    /// Lists a user's registered easy-pay methods, with display names resolved.
    ///
    /// The lookup is authorized with the search key but signed with the
    /// payment key.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.registered_easy_pay_methods",
            skip_all,
            fields(
                user_id = query.user_id,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn registered_easy_pay_methods(
        &self,
        query: &MethodsQuery,
    ) -> Result<RegisteredMethods, PayletterError> {
        let url = self.endpoints.easy_pay_url(EASY_PAY_METHODS_PATH)?;
        let params = query.to_query(
            &self.credentials.client_id,
            &self.credentials.payment_api_key,
        );
        let mut methods: RegisteredMethods = self
            .get_json(
                &url,
                "GET /api/user/methods",
                &self.credentials.search_api_key,
                &params,
            )
            .await?;
        methods.resolve_method_names();
        Ok(methods)
    }

    /// Cancels an easy-pay transaction.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.cancel_easy_pay",
            skip_all,
            fields(
                tid = %request.tid,
                amount = request.amount,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn cancel_easy_pay(
        &self,
        request: EasyPayCancelRequest,
    ) -> Result<EasyPayCancelResponse, PayletterError> {
        let url = self.endpoints.easy_pay_url(EASY_PAY_CANCEL_PATH)?;
        let body = request.sign(
            &self.credentials.client_id,
            &self.credentials.ip_addr,
            &self.credentials.payment_api_key,
        );
        self.post_json(
            &url,
            "POST /api/payments/cancel",
            &self.credentials.payment_api_key,
            &body,
        )
        .await
    }

    /// Pays with a registered easy-pay method.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the request fails or the gateway rejects it.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payletter.request_easy_pay_payment",
            skip_all,
            fields(
                order_no = %request.details.order_no,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn request_easy_pay_payment(
        &self,
        request: EasyPayPaymentRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        let url = self.endpoints.pg_api_url(PAYMENTS_REQUEST_PATH)?;
        let body = request.into_body(
            &self.credentials.client_id,
            &self.credentials.payment_api_key,
        );
        self.post_json(
            &url,
            "POST /v1.0/payments/request",
            &self.credentials.payment_api_key,
            &body,
        )
        .await
    }

    /// Parses and authenticates a payment-result callback.
    ///
    /// On success `pay_info` holds the card or bank display name.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::Protocol`] if the document is malformed or
    /// its `payhash` was not produced with this account's payment key.
    pub fn verify_callback(&self, body: &[u8]) -> Result<PaymentCallback, PayletterError> {
        let mut callback = PaymentCallback::from_json(body)?;
        callback.verify(&self.credentials.payment_api_key)?;
        callback.resolve_pay_info();
        Ok(callback)
    }

    /// Generic POST helper that handles JSON serialization, error mapping,
    /// timeout application, and telemetry integration.
    ///
    /// `context` is a human-readable identifier used in tracing and error messages
    /// (e.g. `"POST /v1.0/payments/autopay"`).
    async fn post_json<T, R>(
        &self,
        url: &Url,
        context: &'static str,
        api_key: &str,
        payload: &T,
    ) -> Result<R, PayletterError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let mut req = self
            .client
            .post(url.clone())
            .headers(auth_headers(api_key)?)
            .json(payload);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let result = Self::send(req, context).await;
        record_result_on_span(&result);
        result
    }

    /// Generic GET helper, the query-string counterpart of [`Self::post_json`].
    async fn get_json<R>(
        &self,
        url: &Url,
        context: &'static str,
        api_key: &str,
        query: &[(&'static str, String)],
    ) -> Result<R, PayletterError>
    where
        R: DeserializeOwned,
    {
        let mut req = self
            .client
            .get(url.clone())
            .headers(auth_headers(api_key)?)
            .query(query);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let result = Self::send(req, context).await;
        record_result_on_span(&result);
        result
    }

    async fn send<R>(
        req: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<R, PayletterError>
    where
        R: DeserializeOwned,
    {
        let http_response = req
            .send()
            .await
            .map_err(|e| PayletterError::Http { context, source: e })?;
        let status = http_response.status();
        let body = http_response
            .text()
            .await
            .map_err(|e| PayletterError::ResponseBodyRead { context, source: e })?;
        parse_response(context, status, body)
    }
}

/// Builds the `Authorization` and `Content-Type` headers for one API key.
fn auth_headers(api_key: &str) -> Result<HeaderMap, PayletterError> {
    let mut authorization = HeaderValue::from_str(&format!("{AUTH_SCHEME} {api_key}"))
        .map_err(|e| PayletterError::InvalidHeader {
            context: "Failed to build Authorization header",
            source: e,
        })?;
    authorization.set_sensitive(true);
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Maps a response body onto the typed result: error envelope first, then
/// HTTP status, then the payload.
fn parse_response<R>(
    context: &'static str,
    status: StatusCode,
    body: String,
) -> Result<R, PayletterError>
where
    R: DeserializeOwned,
{
    let document = serde_json::from_str::<serde_json::Value>(&body).ok();
    if let Some(error) = document.as_ref().and_then(GatewayErrorBody::detect) {
        return Err(PayletterError::Gateway {
            context,
            status,
            code: error.code,
            message: error.message,
        });
    }
    if !status.is_success() {
        return Err(PayletterError::HttpStatus {
            context,
            status,
            body,
        });
    }
    match document {
        Some(document) => serde_json::from_value(document),
        None => serde_json::from_str(&body),
    }
    .map_err(|e| PayletterError::JsonDeserialization { context, source: e })
}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to Payletter failed");
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use payletter_proto::{PaymentDetails, PgCode, ReqDate, hash};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("pay_test", "PAYKEY", "SEARCHKEY").with_ip_addr("10.0.0.1")
    }

    fn client_for(server: &MockServer) -> PayletterClient {
        let base = server.uri();
        let endpoints = Endpoints::try_new(&format!("{base}/pg"), &format!("{base}/ez")).unwrap();
        PayletterClient::try_new(credentials(), endpoints).unwrap()
    }

    fn details(pgcode: PgCode) -> PaymentDetails {
        PaymentDetails {
            pgcode,
            user_id: 12345,
            user_name: "홍길동".into(),
            service_name: "Shop".into(),
            order_no: "ORD-1".into(),
            amount: 1000,
            product_name: "Coffee".into(),
            email_flag: "N".into(),
            email_addr: None,
            custom_parameter: String::new(),
            return_url: "https://shop.example/return".into(),
            callback_url: "https://shop.example/callback".into(),
            cancel_url: "https://shop.example/cancel".into(),
        }
    }

    #[tokio::test]
    async fn test_charge_auto_pay_sends_payment_key_and_client_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/autopay"))
            .and(header("authorization", "PLKEY PAYKEY"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "billkey": "BK-1",
                "amount": 1000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tid": "TX0001",
                "cid": "C1",
                "amount": "1000",
                "billkey": "BK-2",
                "transaction_date": "2024-01-01 12:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .charge_auto_pay(AutoPayRequest {
                pgcode: PgCode::CreditCard,
                client_id: "ignored".into(),
                service_name: "Shop".into(),
                user_id: 12345,
                user_name: "홍길동".into(),
                order_no: "ORD-1".into(),
                amount: 1000,
                product_name: "Coffee".into(),
                billkey: "BK-1".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.tid, "TX0001");
        assert_eq!(response.amount, 1000);
        assert_eq!(response.billkey, "BK-2");
    }

    #[tokio::test]
    async fn test_gateway_envelope_wins_over_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/cancel"))
            .and(header("authorization", "PLKEY PAYKEY"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "ip_addr": "10.0.0.1",
                "tid": "TX0001"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "code": 3001, "message": "already canceled" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .cancel_transaction(CancelRequest {
                pgcode: PgCode::CreditCard,
                client_id: "other_client".into(),
                user_id: 12345,
                tid: "TX0001".into(),
                ip_addr: "192.0.2.1".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "[3001]already canceled");
        assert_eq!(err.gateway_code(), Some("3001"));
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_nested_envelope_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/cancel/partial"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "ip_addr": "10.0.0.1",
                "taxfree_amount": 0
            })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": "PL400", "message": "amount exceeds balance" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .partial_cancel_transaction(PartialCancelRequest {
                pgcode: PgCode::CreditCard,
                client_id: String::new(),
                user_id: 12345,
                tid: "TX0001".into(),
                amount: 99_999,
                tax_amount: None,
                tax_free_amount: Some(0),
                ip_addr: String::new(),
            })
            .await
            .unwrap_err();
        let PayletterError::Gateway { status, code, .. } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "PL400");
    }

    #[tokio::test]
    async fn test_plain_error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pg/v1.0/payments/transaction/list"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_transactions(&TransactionListQuery::for_date("20240101"))
            .await
            .unwrap_err();
        match err {
            PayletterError::HttpStatus { status, body, .. } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "Bad Gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/request"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .request_normal_payment(NormalPaymentRequest {
                details: details(PgCode::CreditCard),
                naver_pay: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PayletterError::JsonDeserialization { .. }));
    }

    #[tokio::test]
    async fn test_list_transactions_uses_search_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pg/v1.0/payments/transaction/list"))
            .and(header("authorization", "PLKEY SEARCHKEY"))
            .and(query_param("client_id", "pay_test"))
            .and(query_param("date", "20240101"))
            .and(query_param("date_type", "transaction"))
            .and(query_param("page_no", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "list": [{ "tid": "TX0001", "amount": 1000, "pgcode": "creditcard" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server)
            .list_transactions(&TransactionListQuery::for_date("20240101"))
            .await
            .unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.list[0].tid, "TX0001");
    }

    #[tokio::test]
    async fn test_naver_pay_uses_override_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/request"))
            .and(header("authorization", "PLKEY NAVERKEY"))
            .and(body_partial_json(json!({
                "client_id": "pay_naver",
                "pgcode": "naverpay",
                "autopay_flag": "N",
                "email_flag": "N",
                "receipt_flag": ""
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "online_url": "https://pay.example/online",
                "mobile_url": "https://pay.example/mobile",
                "token": 77
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .request_normal_payment(NormalPaymentRequest {
                details: details(PgCode::NaverPay),
                naver_pay: Some(payletter_proto::NaverPayCredentials {
                    client_id: "pay_naver".into(),
                    api_key: "NAVERKEY".into(),
                }),
            })
            .await
            .unwrap();
        assert_eq!(response.token, Some(77));
    }

    #[tokio::test]
    async fn test_registered_methods_signed_with_payment_key() {
        let server = MockServer::start().await;
        let expected_hash = hash::user_hash("pay_test", 12345, "20240101120000", "PAYKEY");
        Mock::given(method("GET"))
            .and(path("/ez/api/user/methods"))
            .and(header("authorization", "PLKEY SEARCHKEY"))
            .and(query_param("user_id", "12345"))
            .and(query_param("req_date", "20240101120000"))
            .and(query_param("hash_data", expected_hash.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "join_date": "20230101",
                "method_count": null,
                "method_list": [{
                    "payment_method": "creditcard",
                    "billkey": "BK-1",
                    "method_code": "P001",
                    "last_tran_date": "20240101"
                }],
                "password_skip_flag": "N"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let methods = client_for(&server)
            .registered_easy_pay_methods(&MethodsQuery {
                user_id: 12345,
                req_date: ReqDate::from("20240101120000"),
            })
            .await
            .unwrap();
        assert!(methods.method_count.is_empty());
        assert_eq!(methods.method_list[0].billkey, "BK-1");
        assert!(!methods.method_list[0].method_name.is_empty());
    }

    #[tokio::test]
    async fn test_register_easy_pay_method_posts_signed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ez/api/url/request/register-method"))
            .and(header("authorization", "PLKEY PAYKEY"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "user_id": 12345,
                "payment_method": "creditcard",
                "req_date": "20240101120000",
                "hash_data": "efbd0930bab8c6a4000498bfec211929d114c76ac3f933b9eedbd4ca590a3452"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "TK",
                "redirect_url": "https://ppay.example/register"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoints = Endpoints::try_new(
            &format!("{}/pg", server.uri()),
            &format!("{}/ez", server.uri()),
        )
        .unwrap();
        let client = PayletterClient::try_new(
            Credentials::new("pay_test", "SECRET", "SEARCHKEY"),
            endpoints,
        )
        .unwrap();
        let response = client
            .register_easy_pay_method(RegisterMethodRequest {
                user_id: 12345,
                service_name: "Shop".into(),
                payment_method: PgCode::CreditCard,
                return_url: "https://shop.example/return".into(),
                cancel_url: "https://shop.example/cancel".into(),
                req_date: ReqDate::from("20240101120000"),
            })
            .await
            .unwrap();
        assert_eq!(response.token.as_deref(), Some("TK"));
    }

    #[tokio::test]
    async fn test_cancel_easy_pay_carries_ip_and_hash() {
        let server = MockServer::start().await;
        let expected_hash =
            hash::cancel_hash("pay_test", "TX0001", 1000, "20240101120000", "PAYKEY");
        Mock::given(method("POST"))
            .and(path("/ez/api/payments/cancel"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "ip_addr": "10.0.0.1",
                "tid": "TX0001",
                "hash_data": expected_hash
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tid": "TX0001",
                "cid": "C9",
                "amount": 1000,
                "cancel_date": "20240101130000"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .cancel_easy_pay(EasyPayCancelRequest {
                user_id: 12345,
                tid: "TX0001".into(),
                amount: 1000,
                req_date: ReqDate::from("20240101120000"),
            })
            .await
            .unwrap();
        assert_eq!(response.cid, "C9");
    }

    #[tokio::test]
    async fn test_easy_pay_payment_formats_install_month() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/request"))
            .and(body_partial_json(json!({
                "billkey": "BK-1",
                "install_month": "03",
                "req_date": "20240101120000",
                "email_flag": "N",
                "email_addr": "buyer@example.com",
                "receipt_flag": "Y"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "TK",
                "redirect_url": "https://ppay.example/pay",
                "order_no": "ORD-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .request_easy_pay_payment(EasyPayPaymentRequest {
                details: PaymentDetails {
                    email_addr: Some("buyer@example.com".into()),
                    ..details(PgCode::CreditCard)
                },
                req_date: ReqDate::from("20240101120000"),
                billkey: "BK-1".into(),
                receipt_flag: "Y".into(),
                receipt_type: None,
                receipt_info: None,
                install_month: 3,
            })
            .await
            .unwrap();
        assert_eq!(response.order_no.as_deref(), Some("ORD-1"));
    }

    #[tokio::test]
    async fn test_register_auto_pay_sets_flags() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pg/v1.0/payments/request"))
            .and(body_partial_json(json!({
                "client_id": "pay_test",
                "autopay_flag": "Y",
                "receipt_flag": "N"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "online_url": "https://pay.example/online",
                "mobile_url": "https://pay.example/mobile"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .register_auto_pay(RegisterAutoPayRequest {
                pgcode: PgCode::CreditCard,
                service_name: "Shop".into(),
                user_id: 12345,
                user_name: "홍길동".into(),
                order_no: "ORD-1".into(),
                amount: 1000,
                product_name: "Subscription".into(),
                custom_parameter: String::new(),
                return_url: "https://shop.example/return".into(),
                callback_url: "https://shop.example/callback".into(),
                cancel_url: "https://shop.example/cancel".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.token, None);
    }

    #[test]
    fn test_verify_callback() {
        let endpoints = Endpoints::try_new("http://127.0.0.1:1", "http://127.0.0.1:1").unwrap();
        let client =
            PayletterClient::try_new(Credentials::new("pay_test", "SECRET", "S"), endpoints)
                .unwrap();
        let body = json!({
            "user_id": "12345",
            "amount": 1000,
            "tid": "TX0001",
            "pgcode": "creditcard",
            "card_code": "P001",
            "payhash": "9d2399e45d39d9ffb58c65a72eeda888c3c9f09ff0fdda3194ca9d45fcc30252"
        })
        .to_string();
        let callback = client.verify_callback(body.as_bytes()).unwrap();
        assert!(!callback.pay_info.is_empty());

        let tampered = body.replace("1000", "2000");
        assert!(matches!(
            client.verify_callback(tampered.as_bytes()),
            Err(PayletterError::Protocol(_))
        ));
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let err = PayletterClient::try_new(
            Credentials::new("pay_test", "BAD\nKEY", "SEARCHKEY"),
            Endpoints::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PayletterError::InvalidHeader { .. }));
    }

    #[cfg(feature = "telemetry")]
    mod spans {
        use std::sync::{Arc, Mutex};

        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        use super::*;

        /// Collects every field value recorded on any span.
        #[derive(Clone, Default)]
        struct SpanFields(Arc<Mutex<Vec<(String, String)>>>);

        impl SpanFields {
            fn contains(&self, name: &str, value: &str) -> bool {
                self.0
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|(n, v)| n == name && v == value)
            }
        }

        struct Collector<'a>(&'a mut Vec<(String, String)>);

        impl Visit for Collector<'_> {
            fn record_str(&mut self, field: &Field, value: &str) {
                self.0.push((field.name().to_owned(), value.to_owned()));
            }

            fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                self.0.push((field.name().to_owned(), format!("{value:?}")));
            }
        }

        impl<S: tracing::Subscriber> Layer<S> for SpanFields {
            fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
                let mut fields = self.0.lock().unwrap();
                attrs.record(&mut Collector(&mut fields));
            }

            fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
                let mut fields = self.0.lock().unwrap();
                values.record(&mut Collector(&mut fields));
            }
        }

        #[tokio::test]
        async fn test_failure_recorded_on_span() {
            let fields = SpanFields::default();
            let subscriber = tracing_subscriber::registry().with(fields.clone());
            let _guard = tracing::subscriber::set_default(subscriber);

            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/pg/v1.0/payments/transaction/list"))
                .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
                .mount(&server)
                .await;

            let err = client_for(&server)
                .list_transactions(&TransactionListQuery::for_date("20240101"))
                .await
                .unwrap_err();
            assert!(fields.contains("date", "20240101"));
            assert!(fields.contains("otel.status_code", "ERROR"));
            assert!(fields.contains("error.message", &err.to_string()));
        }

        #[tokio::test]
        async fn test_success_recorded_on_span() {
            let fields = SpanFields::default();
            let subscriber = tracing_subscriber::registry().with(fields.clone());
            let _guard = tracing::subscriber::set_default(subscriber);

            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/pg/v1.0/payments/cancel"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "tid": "TX0001",
                    "cid": "C1",
                    "amount": 1000,
                    "cancel_date": "2024-01-01 13:00:00"
                })))
                .mount(&server)
                .await;

            client_for(&server)
                .cancel_transaction(CancelRequest {
                    pgcode: PgCode::CreditCard,
                    client_id: String::new(),
                    user_id: 12345,
                    tid: "TX0001".into(),
                    ip_addr: String::new(),
                })
                .await
                .unwrap();
            assert!(fields.contains("tid", "TX0001"));
            assert!(fields.contains("otel.status_code", "OK"));
            assert!(!fields.contains("otel.status_code", "ERROR"));
        }
    }
}
