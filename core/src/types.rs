//! Shared value types for checkout risk evaluation and payment dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque buyer identifier assigned by the storefront. Non-empty.
pub type BuyerId = String;

// ── Order snapshot ───────────────────────────────────────────────────────────

/// One line of an order: a product at a unit price, `quantity` >= 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub unit_price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub street: String,
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard { last_four: String, bin: String },
    Paypal,
    BankTransfer,
}

/// Immutable snapshot of a single checkout attempt, assembled by the
/// calling checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub buyer_id: BuyerId,
    pub line_items: Vec<LineItem>,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub payment_method: PaymentMethod,
    pub source_ip: String,
    pub user_agent: String,
    pub submitted_at: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Total order value: sum of unit_price * quantity over all lines.
    pub fn total_amount(&self) -> f64 {
        self.line_items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum()
    }
}

// ── Fraud verdicts ───────────────────────────────────────────────────────────

/// Risk classification for an order. Variant order defines severity, so
/// escalation is `max(current, new)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Output of a fraud evaluation pass.
///
/// `reasons` is append-only in evaluation order. `verified` is derived:
/// true unless the risk level is high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudVerdict {
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub verified: bool,
}

/// Gate decision for the checkout flow. `approved` and `requires_review`
/// are mutually exclusive complements over the three risk levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub approved: bool,
    pub requires_review: bool,
    pub verdict: FraudVerdict,
}

/// Result of a login-attempt screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCheck {
    pub suspicious: bool,
    pub reason: Option<String>,
}

// ── Payment dispatch ─────────────────────────────────────────────────────────

/// Card data supplied alongside a credit-card payment. The dispatcher only
/// checks presence; contents are opaque to this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub bin: String,
    pub last_four: String,
}

/// Payment details handed to a processor adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Why a payment attempt failed. `IntegrationPending` marks the intentional
/// placeholder path for processors with no live integration wired up, so
/// callers can tell it apart from a genuine decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFailureKind {
    MissingCardDetails,
    UnsupportedMethod,
    IntegrationPending,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFailure {
    pub kind: PaymentFailureKind,
    pub message: String,
}

/// Outcome of a payment dispatch. Exactly one of `transaction_id` (on
/// success) or `error` (on failure) is populated. Failures are data, never
/// panics or `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub error: Option<PaymentFailure>,
}

impl PaymentOutcome {
    pub fn succeeded(transaction_id: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id.into()),
            error: None,
        }
    }

    pub fn failed(kind: PaymentFailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            error: Some(PaymentFailure {
                kind,
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Medium.max(RiskLevel::High), RiskLevel::High);
        assert_eq!(RiskLevel::High.max(RiskLevel::Low), RiskLevel::High);
    }

    #[test]
    fn outcome_populates_exactly_one_side() {
        let ok = PaymentOutcome::succeeded("primary_card_test_1");
        assert!(ok.success);
        assert!(ok.transaction_id.is_some());
        assert!(ok.error.is_none());

        let err = PaymentOutcome::failed(PaymentFailureKind::Declined, "declined");
        assert!(!err.success);
        assert!(err.transaction_id.is_none());
        assert!(err.error.is_some());
    }

    #[test]
    fn total_amount_sums_all_lines() {
        let order = OrderSnapshot {
            buyer_id: "b-1".into(),
            line_items: vec![
                LineItem {
                    product_id: "sku-1".into(),
                    unit_price: 10.0,
                    quantity: 3,
                },
                LineItem {
                    product_id: "sku-2".into(),
                    unit_price: 5.5,
                    quantity: 2,
                },
            ],
            shipping_address: Address {
                country: "US".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                street: "1 Main St".into(),
            },
            billing_address: None,
            payment_method: PaymentMethod::Paypal,
            source_ip: "203.0.113.7".into(),
            user_agent: "test".into(),
            submitted_at: chrono::Utc::now(),
        };
        assert_eq!(order.total_amount(), 41.0);
    }
}
