//! Storefront checkout risk core.
//!
//! Two independent components invoked by the checkout flow:
//!   - fraud: rule-based risk classification of order snapshots, backed by
//!     a process-lifetime per-buyer velocity history
//!   - payments: routing of a payment-method selector to stubbed processor
//!     adapters (mocked success or explicit pending-integration failure)

pub mod config;
pub mod error;
pub mod fraud;
pub mod geo;
pub mod history;
pub mod payments;
pub mod types;
