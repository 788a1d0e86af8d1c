//! Command-line arguments and their execution against a [`PaymentGateway`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use payletter::proto::{
    AutoPayRequest, CancelRequest, DateType, EasyPayCancelRequest, MethodsQuery,
    PartialCancelRequest, PaymentCallback, PgCode, ReqDate, TransactionListQuery,
};
use payletter::{Credentials, PaymentGateway};
use serde_json::Value;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Payletter payment gateway command-line tool.
#[derive(Debug, Parser)]
#[command(name = "payletter", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Gateway operations exposed on the command line.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List a user's registered easy-pay methods.
    Methods {
        /// Merchant-side user id.
        #[arg(long)]
        user_id: u64,
    },

    /// List one page of a day's transactions.
    History(HistoryArgs),

    /// Charge a registered billing key.
    Charge(ChargeArgs),

    /// Cancel a whole transaction.
    Cancel {
        /// Payment method of the transaction.
        #[arg(long)]
        pgcode: PgCode,
        /// Merchant-side user id of the transaction.
        #[arg(long)]
        user_id: u64,
        /// Gateway transaction id.
        #[arg(long)]
        tid: String,
    },

    /// Refund part of a transaction.
    PartialCancel {
        /// Payment method of the transaction.
        #[arg(long)]
        pgcode: PgCode,
        /// Merchant-side user id of the transaction.
        #[arg(long)]
        user_id: u64,
        /// Gateway transaction id.
        #[arg(long)]
        tid: String,
        /// Amount to refund, in KRW.
        #[arg(long)]
        amount: u64,
        /// Taxable portion of the refund.
        #[arg(long)]
        tax_amount: Option<u64>,
        /// Tax-free portion of the refund.
        #[arg(long)]
        tax_free_amount: Option<u64>,
    },

    /// Cancel an easy-pay transaction.
    EasyCancel {
        /// Merchant-side user id.
        #[arg(long)]
        user_id: u64,
        /// Gateway transaction id.
        #[arg(long)]
        tid: String,
        /// Amount to cancel, in KRW.
        #[arg(long)]
        amount: u64,
    },

    /// Check the payhash of a payment callback saved as JSON.
    VerifyCallback {
        /// Callback document.
        file: PathBuf,
    },
}

/// Arguments of the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Day to list, `yyyyMMdd`.
    #[arg(long)]
    pub date: String,
    /// Filter on the settlement date instead of the transaction date.
    #[arg(long)]
    pub settle: bool,
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Restrict to one payment method.
    #[arg(long)]
    pub pgcode: Option<PgCode>,
    /// Restrict to one merchant order number.
    #[arg(long)]
    pub order_no: Option<String>,
}

/// Arguments of the `charge` command.
#[derive(Debug, Args)]
pub struct ChargeArgs {
    /// Payment method the billing key belongs to.
    #[arg(long)]
    pub pgcode: PgCode,
    /// Merchant-side user id.
    #[arg(long)]
    pub user_id: u64,
    /// User display name.
    #[arg(long)]
    pub user_name: String,
    /// Service name.
    #[arg(long)]
    pub service_name: String,
    /// Merchant order number.
    #[arg(long)]
    pub order_no: String,
    /// Amount to charge, in KRW.
    #[arg(long)]
    pub amount: u64,
    /// Product name.
    #[arg(long)]
    pub product_name: String,
    /// Billing key.
    #[arg(long)]
    pub billkey: String,
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Methods { .. } => "methods",
            Self::History(_) => "history",
            Self::Charge(_) => "charge",
            Self::Cancel { .. } => "cancel",
            Self::PartialCancel { .. } => "partial-cancel",
            Self::EasyCancel { .. } => "easy-cancel",
            Self::VerifyCallback { .. } => "verify-callback",
        }
    }

    /// Runs the command and returns its result as JSON.
    ///
    /// `credentials` are only consulted by `verify-callback`, which needs the
    /// payment key but no gateway call.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the gateway call fails or the callback does
    /// not verify.
    pub async fn execute(
        self,
        gateway: &dyn PaymentGateway,
        credentials: &Credentials,
    ) -> Result<Value, CliError> {
        let value = match self {
            Self::Methods { user_id } => {
                let query = MethodsQuery {
                    user_id,
                    req_date: ReqDate::now(),
                };
                serde_json::to_value(gateway.registered_easy_pay_methods(&query).await?)?
            }
            Self::History(args) => {
                let query = TransactionListQuery {
                    date: args.date,
                    date_type: if args.settle {
                        DateType::Settle
                    } else {
                        DateType::Transaction
                    },
                    page_no: args.page,
                    pgcode: args.pgcode,
                    order_no: args.order_no,
                };
                serde_json::to_value(gateway.list_transactions(&query).await?)?
            }
            Self::Charge(args) => {
                let request = AutoPayRequest {
                    pgcode: args.pgcode,
                    client_id: String::new(),
                    service_name: args.service_name,
                    user_id: args.user_id,
                    user_name: args.user_name,
                    order_no: args.order_no,
                    amount: args.amount,
                    product_name: args.product_name,
                    billkey: args.billkey,
                };
                serde_json::to_value(gateway.charge_auto_pay(request).await?)?
            }
            Self::Cancel {
                pgcode,
                user_id,
                tid,
            } => {
                let request = CancelRequest {
                    pgcode,
                    client_id: String::new(),
                    user_id,
                    tid,
                    ip_addr: String::new(),
                };
                serde_json::to_value(gateway.cancel_transaction(request).await?)?
            }
            Self::PartialCancel {
                pgcode,
                user_id,
                tid,
                amount,
                tax_amount,
                tax_free_amount,
            } => {
                let request = PartialCancelRequest {
                    pgcode,
                    client_id: String::new(),
                    user_id,
                    tid,
                    amount,
                    tax_amount,
                    tax_free_amount,
                    ip_addr: String::new(),
                };
                serde_json::to_value(gateway.partial_cancel_transaction(request).await?)?
            }
            Self::EasyCancel {
                user_id,
                tid,
                amount,
            } => {
                let request = EasyPayCancelRequest {
                    user_id,
                    tid,
                    amount,
                    req_date: ReqDate::now(),
                };
                serde_json::to_value(gateway.cancel_easy_pay(request).await?)?
            }
            Self::VerifyCallback { file } => {
                let body = std::fs::read(&file).map_err(|source| CliError::Io {
                    path: file.clone(),
                    source,
                })?;
                let mut callback = PaymentCallback::from_json(&body)
                    .map_err(payletter::PayletterError::from)?;
                callback
                    .verify(&credentials.payment_api_key)
                    .map_err(payletter::PayletterError::from)?;
                callback.resolve_pay_info();
                serde_json::to_value(callback)?
            }
        };
        Ok(value)
    }
}
