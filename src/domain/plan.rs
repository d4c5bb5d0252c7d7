use super::money::MinorUnits;
use crate::error::{BillingError, Result};
use serde::Serialize;

/// A subscription plan offered in the picker.
///
/// Plans are defined at build time and never mutated. `unit_price` is held
/// in whole rupees; [`Plan::price`] gives the minor-unit amount charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub unit_price: u64,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

impl Plan {
    /// The amount charged for this plan, in minor units.
    pub fn price(&self) -> MinorUnits {
        MinorUnits::from_major(self.unit_price)
    }

    /// Looks a plan up in the static catalog.
    pub fn find(id: &str) -> Result<&'static Plan> {
        CATALOG
            .iter()
            .find(|plan| plan.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| BillingError::UnknownPlan(id.to_string()))
    }

    pub fn catalog() -> &'static [Plan] {
        CATALOG
    }
}

static CATALOG: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Basic",
        unit_price: 499,
        description: "For individuals getting started",
        features: &["1 project", "Community support", "Monthly usage reports"],
    },
    Plan {
        id: "pro",
        name: "Pro",
        unit_price: 1499,
        description: "For growing teams",
        features: &[
            "10 projects",
            "Priority email support",
            "Weekly usage reports",
            "API access",
        ],
    },
    Plan {
        id: "enterprise",
        name: "Enterprise",
        unit_price: 4999,
        description: "For organisations with advanced needs",
        features: &[
            "Unlimited projects",
            "Dedicated account manager",
            "Real-time usage reports",
            "API access",
            "SSO",
        ],
    },
];
