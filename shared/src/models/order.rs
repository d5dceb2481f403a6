//! Order Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order entity
///
/// `order_number` is the caller's natural key, `unique_id` the generated
/// public handle. Both are unique and neither changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    pub unique_id: String,
    pub payment_description: String,
    pub street_address: String,
    pub town: String,
    pub country: String,
    /// Amount in currency unit (NUMERIC(10,2))
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// ISO 4217 code
    pub currency: String,
    pub payment_due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create order payload (already validated)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_number: String,
    pub payment_description: String,
    pub street_address: String,
    pub town: String,
    pub country: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub payment_due_date: NaiveDate,
}

impl OrderCreate {
    /// Attach a generated public id, producing the row to insert
    pub fn with_unique_id(self, unique_id: String) -> NewOrder {
        NewOrder {
            unique_id,
            order: self,
        }
    }
}

/// Row handed to the repository: the payload plus its generated `unique_id`
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub unique_id: String,
    pub order: OrderCreate,
}

/// Optional list filters, combined with AND
///
/// `Some("")` is a literal value, not "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Exact match on `country`
    pub country: Option<String>,
    /// Substring match on `payment_description`
    pub description: Option<String>,
}

impl OrderFilter {
    pub fn by_country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            description: None,
        }
    }

    pub fn by_description(description: impl Into<String>) -> Self {
        Self {
            country: None,
            description: Some(description.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Order {
        Order {
            order_number: "ORD-1".to_string(),
            unique_id: "ABC-defg-XYZ".to_string(),
            payment_description: "Monthly subscription".to_string(),
            street_address: "123 Main St".to_string(),
            town: "Tallinn".to_string(),
            country: "Estonia".to_string(),
            amount: Decimal::from_str("99.99").unwrap(),
            currency: "EUR".to_string(),
            payment_due_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            created_at: DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["orderNumber"], "ORD-1");
        assert_eq!(json["uniqueId"], "ABC-defg-XYZ");
        assert_eq!(json["paymentDueDate"], "2023-12-31");
        assert_eq!(json["amount"], 99.99);
        assert!(json.get("order_number").is_none());
    }

    #[test]
    fn test_order_create_accepts_numeric_amount() {
        let json = r#"{
            "orderNumber": "ORD-2",
            "paymentDescription": "Subscription",
            "streetAddress": "1 Road",
            "town": "Helsinki",
            "country": "Finland",
            "amount": 10.5,
            "currency": "EUR",
            "paymentDueDate": "2024-02-29"
        }"#;
        let create: OrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.amount, Decimal::from_str("10.5").unwrap());
        assert_eq!(
            create.payment_due_date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let new_order = create.clone().with_unique_id("XYZ-abcd-EFG".to_string());
        assert_eq!(new_order.unique_id, "XYZ-abcd-EFG");
        assert_eq!(new_order.order, create);
    }

    #[test]
    fn test_filter_constructors() {
        assert_eq!(OrderFilter::default().country, None);
        assert_eq!(
            OrderFilter::by_country("Finland").country.as_deref(),
            Some("Finland")
        );
        assert_eq!(
            OrderFilter::by_description("").description.as_deref(),
            Some("")
        );
    }
}
