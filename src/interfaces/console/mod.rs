//! Terminal renderings of the plan picker, history table and analytics view.
//!
//! Everything here is a pure function of data that was already fetched.

pub mod analytics_view;
pub mod derived;
pub mod history_table;
pub mod plan_picker;

pub use analytics_view::render_analytics;
pub use history_table::render_history;
pub use plan_picker::render_plans;
