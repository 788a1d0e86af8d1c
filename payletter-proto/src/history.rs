//! Transaction history listing.
//!
//! History is queried per day with the account's search API key and paged by
//! `page_no`. Records are deserialized leniently because the gateway adds
//! columns over time and mixes numeric and string encodings.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::codes::PgCode;

/// Which date a [`TransactionListQuery`] filters on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    /// Approval or cancel date.
    #[default]
    Transaction,
    /// Settlement date.
    Settle,
}

impl DateType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Settle => "settle",
        }
    }
}

impl Display for DateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of transaction history for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionListQuery {
    /// Day to list, `yyyyMMdd`.
    pub date: String,
    /// Which date `date` refers to.
    #[serde(default)]
    pub date_type: DateType,
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page_no: u32,
    /// Restrict to one payment method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgcode: Option<PgCode>,
    /// Restrict to one merchant order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,
}

const fn first_page() -> u32 {
    1
}

impl TransactionListQuery {
    /// Creates a query for the first page of a day's transactions.
    #[must_use]
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            date_type: DateType::Transaction,
            page_no: first_page(),
            pgcode: None,
            order_no: None,
        }
    }

    /// Builds the query string parameters.
    #[must_use]
    pub fn to_query(&self, client_id: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("client_id", client_id.to_owned()),
            ("date", self.date.clone()),
            ("date_type", self.date_type.to_string()),
            ("page_no", self.page_no.max(1).to_string()),
        ];
        if let Some(pgcode) = &self.pgcode {
            query.push(("pgcode", pgcode.to_string()));
        }
        if let Some(order_no) = &self.order_no {
            query.push(("order_no", order_no.clone()));
        }
        query
    }
}

/// A single transaction in the history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    /// Approval or cancel timestamp.
    pub transaction_date: String,
    /// Gateway transaction id.
    pub tid: String,
    /// Approval id.
    pub cid: String,
    /// Merchant order number.
    pub order_no: String,
    /// Payment method.
    pub pgcode: Option<PgCode>,
    /// Merchant-side user id.
    #[serde(deserialize_with = "crate::lenient::string_from_any")]
    pub user_id: String,
    /// User display name.
    pub user_name: String,
    /// Service name.
    pub service_name: String,
    /// Product name.
    pub product_name: String,
    /// Amount in KRW.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub amount: u64,
    /// Taxable portion.
    #[serde(deserialize_with = "crate::lenient::u64_from_any")]
    pub tax_amount: u64,
    /// Payment instrument description.
    pub pay_info: String,
    /// Transaction status code.
    #[serde(deserialize_with = "crate::lenient::string_from_any")]
    pub status_code: String,
    /// Transaction status description.
    pub status_name: String,
}

/// A page of transaction history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
    /// Number of transactions on all pages.
    #[serde(default, deserialize_with = "crate::lenient::u64_from_any")]
    pub total_count: u64,
    /// Transactions on this page.
    #[serde(default, deserialize_with = "crate::lenient::vec_or_null")]
    pub list: Vec<TransactionRecord>,
}
