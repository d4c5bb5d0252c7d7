use super::money::{INR, MinorUnits};
use super::plan::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who is paying. Used for the order's notes and the checkout prefill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            contact: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub amount: MinorUnits,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
    pub customer: Customer,
}

impl OrderRequest {
    /// Builds the order request for a plan selection made at `now`.
    ///
    /// The amount is the plan price scaled to paise and the currency is
    /// always INR. Notes carry plan and customer metadata for the backend.
    pub fn for_plan(plan: &Plan, customer: Customer, now: DateTime<Utc>) -> Self {
        let mut notes = BTreeMap::new();
        notes.insert("plan_id".to_string(), plan.id.to_string());
        notes.insert("plan_name".to_string(), plan.name.to_string());
        notes.insert("customer_name".to_string(), customer.name.clone());
        notes.insert("customer_email".to_string(), customer.email.clone());

        Self {
            amount: plan.price(),
            currency: INR.to_string(),
            receipt: format!("receipt_{}_{}", plan.id, now.timestamp_millis()),
            notes,
            customer,
        }
    }
}

/// A backend-issued order. Lives for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: MinorUnits,
    pub currency: String,
    #[serde(default)]
    pub customer: Customer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_request_for_every_plan() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        for plan in Plan::catalog() {
            let request = OrderRequest::for_plan(plan, Customer::new("Asha", "asha@example.com"), now);
            assert_eq!(request.amount.value(), plan.unit_price * 100);
            assert_eq!(request.currency, "INR");
            assert_eq!(
                request.receipt,
                format!("receipt_{}_{}", plan.id, now.timestamp_millis())
            );
            assert_eq!(request.notes["plan_id"], plan.id);
            assert_eq!(request.notes["customer_email"], "asha@example.com");
        }
    }

    #[test]
    fn test_order_deserializes_without_customer() {
        let order: Order =
            serde_json::from_str(r#"{"id":"order_1","amount":49900,"currency":"INR"}"#).unwrap();
        assert_eq!(order.amount, MinorUnits(49_900));
        assert_eq!(order.customer, Customer::default());
    }
}
