//! Payment-method codes and display-name tables.
//!
//! The gateway identifies payment methods with a lowercase `pgcode` string and
//! reports card issuers and banks with short numeric codes. This module holds
//! the [`PgCode`] enum and the static tables that turn issuer/bank codes into
//! the Korean display names shown to end users.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Payment method identifier (`pgcode`) understood by the gateway.
///
/// Serialized as the lowercase code string. Codes this crate does not know
/// about are preserved in [`PgCode::Other`] so that responses from newer
/// gateway versions still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PgCode {
    /// Credit or check card (`creditcard`).
    CreditCard,
    /// Real-time bank transfer (`banktransfer`).
    BankTransfer,
    /// Virtual account deposit (`virtualaccount`).
    VirtualAccount,
    /// Mobile carrier billing (`mobile`).
    Mobile,
    /// Easy-pay registered bank account (`easybank`).
    EasyBank,
    /// Naver Pay (`naverpay`).
    NaverPay,
    /// Kakao Pay (`kakaopay`).
    KakaoPay,
    /// PAYCO (`payco`).
    Payco,
    /// Toss (`toss`).
    Toss,
    /// Samsung Pay (`samsungpay`).
    SamsungPay,
    /// SSG Pay (`ssgpay`).
    SsgPay,
    /// Apple Pay (`applepay`).
    ApplePay,
    /// `PayPal` (`paypal`).
    PayPal,
    /// Any other code, stored lowercase.
    Other(String),
}

impl PgCode {
    /// Returns the wire representation of this code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreditCard => "creditcard",
            Self::BankTransfer => "banktransfer",
            Self::VirtualAccount => "virtualaccount",
            Self::Mobile => "mobile",
            Self::EasyBank => "easybank",
            Self::NaverPay => "naverpay",
            Self::KakaoPay => "kakaopay",
            Self::Payco => "payco",
            Self::Toss => "toss",
            Self::SamsungPay => "samsungpay",
            Self::SsgPay => "ssgpay",
            Self::ApplePay => "applepay",
            Self::PayPal => "paypal",
            Self::Other(code) => code,
        }
    }
}

impl Display for PgCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PgCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Ok(match code.as_str() {
            "creditcard" => Self::CreditCard,
            "banktransfer" => Self::BankTransfer,
            "virtualaccount" => Self::VirtualAccount,
            "mobile" => Self::Mobile,
            "easybank" => Self::EasyBank,
            "naverpay" => Self::NaverPay,
            "kakaopay" => Self::KakaoPay,
            "payco" => Self::Payco,
            "toss" => Self::Toss,
            "samsungpay" => Self::SamsungPay,
            "ssgpay" => Self::SsgPay,
            "applepay" => Self::ApplePay,
            "paypal" => Self::PayPal,
            _ => Self::Other(code),
        })
    }
}

impl Serialize for PgCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PgCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(code) = Self::from_str(&s);
        Ok(code)
    }
}

/// Card issuer codes reported in `card_code` / `method_code`.
pub const CARD_CODES: &[(&str, &str)] = &[
    ("P001", "비씨카드"),
    ("P002", "KB국민카드"),
    ("P003", "하나카드"),
    ("P004", "삼성카드"),
    ("P005", "신한카드"),
    ("P006", "현대카드"),
    ("P007", "롯데카드"),
    ("P008", "NH카드"),
    ("P009", "씨티카드"),
    ("P010", "수협카드"),
    ("P011", "우리카드"),
    ("P012", "신협카드"),
    ("P013", "광주카드"),
    ("P014", "전북카드"),
    ("P015", "제주카드"),
    ("P016", "우체국카드"),
    ("P017", "MG새마을금고"),
    ("P018", "저축은행"),
    ("P019", "카카오뱅크카드"),
    ("P020", "은련카드"),
    ("P021", "해외 VISA 카드"),
    ("P022", "해외 MASTER 카드"),
    ("P023", "해외 JCB 카드"),
    ("P024", "해외 AMX 카드"),
    ("P025", "해외 DINERS 카드"),
];

/// Bank codes reported for easy-pay bank accounts.
pub const BANK_CODES: &[(&str, &str)] = &[
    ("002", "KDB산업은행"),
    ("003", "IBK기업은행"),
    ("004", "KB국민은행"),
    ("007", "수협은행"),
    ("011", "NH농협은행"),
    ("012", "농협중앙회"),
    ("020", "우리은행"),
    ("023", "SC제일은행"),
    ("027", "한국씨티은행"),
    ("031", "대구은행"),
    ("032", "부산은행"),
    ("034", "광주은행"),
    ("035", "제주은행"),
    ("037", "전북은행"),
    ("039", "경남은행"),
    ("045", "새마을금고중앙회"),
    ("048", "신협중앙회"),
    ("064", "산림조합중앙회"),
    ("071", "우체국은행"),
    ("081", "하나은행"),
    ("088", "신한은행"),
    ("089", "케이뱅크"),
    ("090", "카카오뱅크"),
];

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Looks up the display name of a card issuer code (e.g. `"P002"`).
#[must_use]
pub fn card_name(code: &str) -> Option<&'static str> {
    lookup(CARD_CODES, code)
}

/// Looks up the display name of a bank code (e.g. `"088"`).
#[must_use]
pub fn bank_name(code: &str) -> Option<&'static str> {
    lookup(BANK_CODES, code)
}

/// Resolves the display name of a method code for the given payment method.
///
/// Cards resolve through [`CARD_CODES`], easy-pay bank accounts through
/// [`BANK_CODES`]. Other payment methods have no code table.
#[must_use]
pub fn method_name(pg_code: &PgCode, code: &str) -> Option<&'static str> {
    match pg_code {
        PgCode::CreditCard => card_name(code),
        PgCode::EasyBank => bank_name(code),
        _ => None,
    }
}
