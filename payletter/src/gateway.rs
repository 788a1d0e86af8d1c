//! The [`PaymentGateway`] abstraction over the Payletter API.
//!
//! Application code that depends on `dyn PaymentGateway` can run against the
//! live [`PayletterClient`] or the offline [`MockGateway`](crate::MockGateway).

use payletter_proto::{
    AutoPayRequest, AutoPayResponse, CancelRequest, CancelResponse, EasyPayCancelRequest,
    EasyPayCancelResponse, EasyPayPaymentRequest, EasyPayUiResponse, MethodsQuery,
    NormalPaymentRequest, NormalPaymentResponse, PartialCancelRequest, RegisterAutoPayRequest,
    RegisterAutoPayResponse, RegisterMethodRequest, RegisteredMethods, TransactionList,
    TransactionListQuery,
};

use crate::client::PayletterClient;
use crate::error::PayletterError;

/// Payment operations offered by the gateway.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a billing-key registration window.
    async fn register_auto_pay(
        &self,
        request: RegisterAutoPayRequest,
    ) -> Result<RegisterAutoPayResponse, PayletterError>;

    /// Charges a registered billing key.
    async fn charge_auto_pay(
        &self,
        request: AutoPayRequest,
    ) -> Result<AutoPayResponse, PayletterError>;

    /// Cancels a whole transaction.
    async fn cancel_transaction(
        &self,
        request: CancelRequest,
    ) -> Result<CancelResponse, PayletterError>;

    /// Refunds part of a transaction.
    async fn partial_cancel_transaction(
        &self,
        request: PartialCancelRequest,
    ) -> Result<CancelResponse, PayletterError>;

    /// Opens a one-off payment window.
    async fn request_normal_payment(
        &self,
        request: NormalPaymentRequest,
    ) -> Result<NormalPaymentResponse, PayletterError>;

    /// Lists one page of a day's transactions.
    async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, PayletterError>;

    /// Opens the easy-pay method registration window.
    async fn register_easy_pay_method(
        &self,
        request: RegisterMethodRequest,
    ) -> Result<EasyPayUiResponse, PayletterError>;

    /// Lists a user's registered easy-pay methods.
    async fn registered_easy_pay_methods(
        &self,
        query: &MethodsQuery,
    ) -> Result<RegisteredMethods, PayletterError>;

    /// Cancels an easy-pay transaction.
    async fn cancel_easy_pay(
        &self,
        request: EasyPayCancelRequest,
    ) -> Result<EasyPayCancelResponse, PayletterError>;

    /// Pays with a registered easy-pay method.
    async fn request_easy_pay_payment(
        &self,
        request: EasyPayPaymentRequest,
    ) -> Result<EasyPayUiResponse, PayletterError>;
}

#[async_trait::async_trait]
impl PaymentGateway for PayletterClient {
    async fn register_auto_pay(
        &self,
        request: RegisterAutoPayRequest,
    ) -> Result<RegisterAutoPayResponse, PayletterError> {
        Self::register_auto_pay(self, request).await
    }

    async fn charge_auto_pay(
        &self,
        request: AutoPayRequest,
    ) -> Result<AutoPayResponse, PayletterError> {
        Self::charge_auto_pay(self, request).await
    }

    async fn cancel_transaction(
        &self,
        request: CancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        Self::cancel_transaction(self, request).await
    }

    async fn partial_cancel_transaction(
        &self,
        request: PartialCancelRequest,
    ) -> Result<CancelResponse, PayletterError> {
        Self::partial_cancel_transaction(self, request).await
    }

    async fn request_normal_payment(
        &self,
        request: NormalPaymentRequest,
    ) -> Result<NormalPaymentResponse, PayletterError> {
        Self::request_normal_payment(self, request).await
    }

    async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, PayletterError> {
        Self::list_transactions(self, query).await
    }

    async fn register_easy_pay_method(
        &self,
        request: RegisterMethodRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        Self::register_easy_pay_method(self, request).await
    }

    async fn registered_easy_pay_methods(
        &self,
        query: &MethodsQuery,
    ) -> Result<RegisteredMethods, PayletterError> {
        Self::registered_easy_pay_methods(self, query).await
    }

    async fn cancel_easy_pay(
        &self,
        request: EasyPayCancelRequest,
    ) -> Result<EasyPayCancelResponse, PayletterError> {
        Self::cancel_easy_pay(self, request).await
    }

    async fn request_easy_pay_payment(
        &self,
        request: EasyPayPaymentRequest,
    ) -> Result<EasyPayUiResponse, PayletterError> {
        Self::request_easy_pay_payment(self, request).await
    }
}
