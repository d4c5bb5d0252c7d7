use crate::domain::money::{INR, format_minor};
use crate::domain::plan::Plan;
use std::fmt::Write;

/// Lists the plans a customer can pick from.
pub fn render_plans(plans: &[Plan]) -> String {
    let mut out = String::new();
    for plan in plans {
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:>12}  {}",
            plan.id,
            plan.name,
            format_minor(plan.price(), INR),
            plan.description
        );
        for feature in plan.features {
            let _ = writeln!(out, "{:<12}   * {}", "", feature);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_plan_with_price() {
        let rendered = render_plans(Plan::catalog());
        for plan in Plan::catalog() {
            assert!(rendered.contains(plan.id));
            assert!(rendered.contains(&format_minor(plan.price(), INR)));
        }
        assert!(rendered.contains("* API access"));
    }
}
