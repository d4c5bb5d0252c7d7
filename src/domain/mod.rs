//! Domain model: plans, orders, payment outcomes, history records and the
//! ports the application layer talks through.

pub mod analytics;
pub mod checkout;
pub mod money;
pub mod order;
pub mod payment;
pub mod plan;
pub mod ports;
pub mod transaction;
