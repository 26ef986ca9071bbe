//! Velocity check integration tests: rolling-window counting, the exclusive
//! 24-hour boundary, and self-exclusion of the order under evaluation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use storefront_core::{
    config::CheckoutConfig,
    fraud::FraudEvaluator,
    geo::TableGeoResolver,
    history::{InMemoryOrderHistory, OrderHistory},
    types::{Address, LineItem, OrderSnapshot, PaymentMethod, RiskLevel},
};

fn order_at(submitted_at: DateTime<Utc>) -> OrderSnapshot {
    OrderSnapshot {
        buyer_id: "buyer-velocity".into(),
        line_items: vec![LineItem {
            product_id: "sku-1".into(),
            unit_price: 25.0,
            quantity: 1,
        }],
        shipping_address: Address {
            country: "US".into(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            street: "1 Main St".into(),
        },
        billing_address: None,
        payment_method: PaymentMethod::Paypal,
        source_ip: "203.0.113.7".into(),
        user_agent: "Mozilla/5.0".into(),
        submitted_at,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap()
}

fn evaluator_with_history() -> (FraudEvaluator, Arc<InMemoryOrderHistory>) {
    let config = CheckoutConfig::default_test();
    let history = Arc::new(InMemoryOrderHistory::new(Duration::hours(
        config.fraud.velocity_window_hours,
    )));
    let evaluator = FraudEvaluator::new(
        config.fraud,
        history.clone(),
        Arc::new(TableGeoResolver::empty()),
    );
    (evaluator, history)
}

/// Three prior orders inside the window trigger the velocity reason on the
/// fourth.
#[test]
fn three_priors_in_window_trigger() {
    let (evaluator, history) = evaluator_with_history();
    for hours_ago in [1, 2, 3] {
        history.record("buyer-velocity", now() - Duration::hours(hours_ago));
    }

    let verdict = evaluator.evaluate(&order_at(now()));
    assert_eq!(verdict.risk_level, RiskLevel::Medium);
    assert_eq!(verdict.reasons.len(), 1);
    assert!(
        verdict.reasons[0].contains("orders from this buyer"),
        "Unexpected reason: {}",
        verdict.reasons[0]
    );
}

/// Two prior orders are below the threshold.
#[test]
fn two_priors_do_not_trigger() {
    let (evaluator, history) = evaluator_with_history();
    for hours_ago in [1, 2] {
        history.record("buyer-velocity", now() - Duration::hours(hours_ago));
    }

    let verdict = evaluator.evaluate(&order_at(now()));
    assert_eq!(verdict.risk_level, RiskLevel::Low);
    assert!(verdict.reasons.is_empty());
}

/// A submission exactly 24 hours old sits outside the exclusive window, so
/// two in-window priors plus one boundary prior do not trigger.
#[test]
fn boundary_prior_is_outside_the_window() {
    let (evaluator, history) = evaluator_with_history();
    history.record("buyer-velocity", now() - Duration::hours(24));
    history.record("buyer-velocity", now() - Duration::hours(2));
    history.record("buyer-velocity", now() - Duration::hours(1));

    let verdict = evaluator.evaluate(&order_at(now()));
    assert_eq!(verdict.risk_level, RiskLevel::Low);
}

/// Just inside the boundary still counts.
#[test]
fn prior_just_inside_the_window_counts() {
    let (evaluator, history) = evaluator_with_history();
    history.record(
        "buyer-velocity",
        now() - Duration::hours(24) + Duration::minutes(1),
    );
    history.record("buyer-velocity", now() - Duration::hours(2));
    history.record("buyer-velocity", now() - Duration::hours(1));

    let verdict = evaluator.evaluate(&order_at(now()));
    assert_eq!(verdict.risk_level, RiskLevel::Medium);
}

/// The order under evaluation is recorded after counting, so a burst of
/// evaluations only trips on the fourth call.
#[test]
fn current_order_does_not_count_against_itself() {
    let (evaluator, _history) = evaluator_with_history();

    for i in 0..3 {
        let verdict = evaluator.evaluate(&order_at(now() + Duration::minutes(i)));
        assert_eq!(
            verdict.risk_level,
            RiskLevel::Low,
            "Evaluation {i} should not trigger velocity"
        );
    }

    let verdict = evaluator.evaluate(&order_at(now() + Duration::minutes(3)));
    assert_eq!(verdict.risk_level, RiskLevel::Medium);
}

/// Every evaluation records the submission, triggered or not.
#[test]
fn every_evaluation_is_recorded() {
    let (evaluator, history) = evaluator_with_history();
    assert_eq!(history.recorded_count("buyer-velocity"), 0);

    evaluator.evaluate(&order_at(now()));
    assert_eq!(history.recorded_count("buyer-velocity"), 1);

    evaluator.evaluate(&order_at(now() + Duration::minutes(5)));
    assert_eq!(history.recorded_count("buyer-velocity"), 2);
}

/// Velocity is tracked per buyer; other buyers' bursts are invisible.
#[test]
fn velocity_is_per_buyer() {
    let (evaluator, history) = evaluator_with_history();
    for hours_ago in [1, 2, 3] {
        history.record("someone-else", now() - Duration::hours(hours_ago));
    }

    let verdict = evaluator.evaluate(&order_at(now()));
    assert_eq!(verdict.risk_level, RiskLevel::Low);
}

/// Stale submissions are pruned as new ones arrive, keeping the per-buyer
/// history bounded across a long-running process.
#[test]
fn stale_history_is_pruned_through_the_evaluator() {
    let (evaluator, history) = evaluator_with_history();
    history.record("buyer-velocity", now() - Duration::hours(40));
    history.record("buyer-velocity", now() - Duration::hours(30));
    assert_eq!(history.recorded_count("buyer-velocity"), 2);

    evaluator.evaluate(&order_at(now()));
    assert_eq!(
        history.recorded_count("buyer-velocity"),
        1,
        "Entries older than the retention window should be evicted"
    );
}
