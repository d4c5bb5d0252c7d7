//! Application layer: the payment orchestrator, the dashboard queries and the
//! per-request tracking they share.
//!
//! `PaymentOrchestrator` runs one checkout cycle at a time and reports every
//! outcome as a `PaymentResult`. `BillingDashboard` serves history and
//! analytics. Both record loading and error state in a `RequestTracker`.

pub mod dashboard;
pub mod orchestrator;
pub mod tracker;
