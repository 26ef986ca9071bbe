//! Payment dispatch: routes a payment-method selector to one of three
//! processor adapters.
//!
//! Every adapter is a stub. In mock mode it fabricates a successful
//! transaction id; otherwise it reports the integration as pending, which
//! callers can tell apart from a genuine decline. All failures are returned
//! as data so the caller branches without exception handling. No retries,
//! no idempotency keys, no persistence of outcomes.

use crate::{
    config::{ProcessorConfig, ProcessorsConfig},
    types::{CardDetails, PaymentFailureKind, PaymentOutcome, PaymentRequest},
};
use uuid::Uuid;

/// The three processor families this storefront routes to. `provider_id`
/// is stable: it prefixes transaction ids and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorFamily {
    PrimaryCard,
    WalletRedirect,
    Regional,
}

impl ProcessorFamily {
    pub fn provider_id(self) -> &'static str {
        match self {
            ProcessorFamily::PrimaryCard => "primary_card",
            ProcessorFamily::WalletRedirect => "wallet",
            ProcessorFamily::Regional => "regional",
        }
    }
}

pub struct PaymentDispatcher {
    config: ProcessorsConfig,
}

impl PaymentDispatcher {
    pub fn new(config: ProcessorsConfig) -> Self {
        Self { config }
    }

    /// Route one payment attempt.
    ///
    /// `credit_card` requires card details and goes to the primary card
    /// processor; `paypal` goes to the wallet-redirect processor;
    /// `bank_transfer` goes to the regional processor. Anything else is an
    /// unsupported-method failure.
    pub fn process_payment(
        &self,
        method: &str,
        request: &PaymentRequest,
        card: Option<&CardDetails>,
    ) -> PaymentOutcome {
        match method {
            "credit_card" => {
                if card.is_none() {
                    return PaymentOutcome::failed(
                        PaymentFailureKind::MissingCardDetails,
                        "card details required",
                    );
                }
                self.charge(ProcessorFamily::PrimaryCard, request)
            }
            "paypal" => self.charge(ProcessorFamily::WalletRedirect, request),
            "bank_transfer" => self.charge(ProcessorFamily::Regional, request),
            other => PaymentOutcome::failed(
                PaymentFailureKind::UnsupportedMethod,
                format!("unsupported payment method: {other}"),
            ),
        }
    }

    fn charge(&self, family: ProcessorFamily, request: &PaymentRequest) -> PaymentOutcome {
        let provider = family.provider_id();
        let processor = self.processor(family);

        if processor.mock_mode {
            let transaction_id = format!("{provider}_test_{}", Uuid::new_v4().simple());
            log::info!(
                "payment: {provider} mock charge {:.2} {} -> {transaction_id}",
                request.amount,
                request.currency
            );
            PaymentOutcome::succeeded(transaction_id)
        } else {
            log::warn!(
                "payment: {provider} integration pending, rejecting {:.2} {}",
                request.amount,
                request.currency
            );
            PaymentOutcome::failed(
                PaymentFailureKind::IntegrationPending,
                format!("{provider} integration is not yet implemented"),
            )
        }
    }

    fn processor(&self, family: ProcessorFamily) -> &ProcessorConfig {
        match family {
            ProcessorFamily::PrimaryCard => &self.config.primary_card,
            ProcessorFamily::WalletRedirect => &self.config.wallet,
            ProcessorFamily::Regional => &self.config.regional,
        }
    }
}
