//! Payletter endpoint constants.

/// Authorization scheme prefix: `Authorization: PLKEY <api key>`.
pub const AUTH_SCHEME: &str = "PLKEY";

/// Production PG API base URL.
pub const PRODUCTION_PG_API_URL: &str = "https://pgapi.payletter.com/";

/// Production easy-pay API base URL.
pub const PRODUCTION_EASY_PAY_URL: &str = "https://pgapi.payletter.com/";

/// Test PG API base URL.
pub const TEST_PG_API_URL: &str = "https://testpgapi.payletter.com/";

/// Test easy-pay API base URL.
pub const TEST_EASY_PAY_URL: &str = "https://testppay.payletter.com/";

/// `POST`: open a payment window (auto-pay registration, normal and easy-pay payments).
pub const PAYMENTS_REQUEST_PATH: &str = "v1.0/payments/request";

/// `POST`: charge a billing key.
pub const AUTOPAY_PATH: &str = "v1.0/payments/autopay";

/// `POST`: cancel a whole transaction.
pub const CANCEL_PATH: &str = "v1.0/payments/cancel";

/// `POST`: cancel part of a transaction.
pub const PARTIAL_CANCEL_PATH: &str = "v1.0/payments/cancel/partial";

/// `GET`: list transactions for a day.
pub const TRANSACTION_LIST_PATH: &str = "v1.0/payments/transaction/list";

/// `POST`: open the easy-pay method registration window.
pub const EASY_PAY_REGISTER_METHOD_PATH: &str = "api/url/request/register-method";

/// `GET`: list a user's registered easy-pay methods.
pub const EASY_PAY_METHODS_PATH: &str = "api/user/methods";

/// `POST`: cancel an easy-pay transaction.
pub const EASY_PAY_CANCEL_PATH: &str = "api/payments/cancel";

/// Environment variable holding the merchant client id.
pub const ENV_CLIENT_ID: &str = "PAYLETTER_CLIENT_ID";

/// Environment variable holding the payment API key.
pub const ENV_PAYMENT_API_KEY: &str = "PAYLETTER_PAYMENT_API_KEY";

/// Environment variable holding the search API key.
pub const ENV_SEARCH_API_KEY: &str = "PAYLETTER_SEARCH_API_KEY";

/// Environment variable holding the merchant server IP address.
pub const ENV_IP_ADDR: &str = "PAYLETTER_IP_ADDR";
