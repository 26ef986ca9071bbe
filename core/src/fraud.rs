//! Rule-based fraud evaluation over checkout order snapshots.
//!
//! Six checks run in a fixed order, each appending a human-readable reason
//! on trigger and escalating the risk level monotonically:
//!   1. Shipping destination on the high-risk country list (sets high)
//!   2. Source-IP geolocation vs shipping country (at least medium)
//!   3. Order velocity in the rolling window (at least medium)
//!   4. Billing vs shipping country mismatch (at least medium)
//!   5. High order value (aggravating only; never escalates on its own)
//!   6. Card BIN blocklist (sets high)
//!
//! RULE: The check order is fixed. The high-value check escalates only when
//! an earlier check has already appended a reason, so reordering the checks
//! changes policy.
//!
//! Evaluation never fails. The worst case is a low verdict with no reasons.

use crate::{
    config::FraudRulesConfig,
    geo::GeoResolver,
    history::OrderHistory,
    types::{FraudVerdict, LoginCheck, OrderSnapshot, PaymentMethod, ReviewDecision, RiskLevel},
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub struct FraudEvaluator {
    rules: FraudRulesConfig,
    history: Arc<dyn OrderHistory>,
    geo: Arc<dyn GeoResolver>,
}

impl FraudEvaluator {
    pub fn new(
        rules: FraudRulesConfig,
        history: Arc<dyn OrderHistory>,
        geo: Arc<dyn GeoResolver>,
    ) -> Self {
        Self {
            rules,
            history,
            geo,
        }
    }

    /// Classify one checkout attempt.
    ///
    /// Deterministic given the history store's current state. Not pure: the
    /// submission is recorded into the store as a side effect, after the
    /// velocity count, so it never counts against itself.
    pub fn evaluate(&self, order: &OrderSnapshot) -> FraudVerdict {
        let mut level = RiskLevel::Low;
        let mut reasons: Vec<String> = Vec::new();

        if order.line_items.is_empty() {
            log::warn!("buyer={} fraud: order has no line items", order.buyer_id);
        }

        let shipping_country = order.shipping_address.country.as_str();

        // 1. Destination risk
        if self.rules.is_high_risk_country(shipping_country) {
            reasons.push(format!(
                "Shipping destination {shipping_country} is on the high-risk country list"
            ));
            level = RiskLevel::High;
        }

        // 2. IP/geo mismatch. Unknown IPs give no evidence either way.
        if let Some(ip_country) = self.geo.country_of(&order.source_ip) {
            if !countries_match(&ip_country, shipping_country) {
                reasons.push(format!(
                    "Source IP {} geolocates to {ip_country} but the order ships to {shipping_country}",
                    order.source_ip
                ));
                level = level.max(RiskLevel::Medium);
            }
        }

        // 3. Velocity
        let window = Duration::hours(self.rules.velocity_window_hours);
        let prior = self
            .history
            .count_within(&order.buyer_id, order.submitted_at, window);
        if prior >= self.rules.velocity_max_orders {
            reasons.push(format!(
                "{prior} orders from this buyer in the last {} hours",
                self.rules.velocity_window_hours
            ));
            level = level.max(RiskLevel::Medium);
        }
        self.history.record(&order.buyer_id, order.submitted_at);

        // 4. Address mismatch
        if let Some(billing) = &order.billing_address {
            if !countries_match(&billing.country, shipping_country) {
                reasons.push(format!(
                    "Billing country {} differs from shipping country {shipping_country}",
                    billing.country
                ));
                level = level.max(RiskLevel::Medium);
            }
        }

        // 5. High value. Aggravating only: escalates to high when another
        //    reason is already on the list, otherwise leaves the level alone.
        let total = order.total_amount();
        if total > self.rules.high_value_threshold {
            reasons.push(format!(
                "Order total {total:.2} exceeds the {:.2} high-value threshold",
                self.rules.high_value_threshold
            ));
            if reasons.len() > 1 {
                level = RiskLevel::High;
            }
        }

        // 6. Card BIN blocklist
        if let PaymentMethod::CreditCard { bin, .. } = &order.payment_method {
            if self.rules.is_blocked_bin(bin) {
                reasons.push(format!("Card BIN {bin} is blocklisted"));
                level = RiskLevel::High;
            }
        }

        for reason in &reasons {
            log::debug!("buyer={} fraud: {reason}", order.buyer_id);
        }
        if level != RiskLevel::Low {
            log::info!(
                "buyer={} fraud: risk={level:?} with {} signal(s)",
                order.buyer_id,
                reasons.len()
            );
        }

        FraudVerdict {
            verified: level != RiskLevel::High,
            risk_level: level,
            reasons,
        }
    }

    /// Gate decision for checkout: approve outright only at low risk,
    /// everything else goes to manual review.
    pub fn review_decision(&self, order: &OrderSnapshot) -> ReviewDecision {
        let verdict = self.evaluate(order);
        ReviewDecision {
            approved: verdict.risk_level == RiskLevel::Low,
            requires_review: verdict.risk_level != RiskLevel::Low,
            verdict,
        }
    }

    /// Login-attempt screen. Placeholder, not a real control: always reports
    /// not-suspicious until a velocity/anomaly model is wired in.
    pub fn check_login_attempt(
        &self,
        _buyer_id: &str,
        _ip: &str,
        _user_agent: &str,
        _at: DateTime<Utc>,
    ) -> LoginCheck {
        LoginCheck {
            suspicious: false,
            reason: None,
        }
    }
}

fn countries_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
