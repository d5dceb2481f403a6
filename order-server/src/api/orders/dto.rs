//! Request payloads for the order endpoints

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::OrderCreate;
use validator::{Validate, ValidationError};

/// Largest amount a NUMERIC(10,2) column holds
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// `POST /orders` body
///
/// Missing fields deserialize to empty values so that every failing field is
/// reported at once instead of stopping at the first absent one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
#[validate(schema(function = "check_amount", skip_on_field_errors = false))]
pub struct CreateOrderRequest {
    #[validate(custom(function = "not_blank"))]
    pub order_number: String,
    #[validate(custom(function = "not_blank"))]
    pub payment_description: String,
    #[validate(custom(function = "not_blank"))]
    pub street_address: String,
    #[validate(custom(function = "not_blank"))]
    pub town: String,
    #[validate(custom(function = "not_blank"))]
    pub country: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[validate(required)]
    pub amount: Option<Decimal>,
    #[validate(
        length(equal = 3, message = "currency must be exactly 3 characters"),
        custom(function = "ascii_letters")
    )]
    pub currency: String,
    #[validate(required)]
    pub payment_due_date: Option<NaiveDate>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn ascii_letters(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("currency_code")
            .with_message("currency must contain only letters".into()));
    }
    Ok(())
}

fn check_amount(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    match req.amount {
        Some(amount) if amount < Decimal::ZERO => Err(ValidationError::new("amount_min")
            .with_message("amount must not be less than 0".into())),
        Some(amount) if amount > MAX_AMOUNT => Err(ValidationError::new("amount_max")
            .with_message(format!("amount must not be greater than {MAX_AMOUNT}").into())),
        _ => Ok(()),
    }
}

impl TryFrom<CreateOrderRequest> for OrderCreate {
    type Error = AppError;

    /// Expects a request that already passed [`Validate::validate`]
    fn try_from(req: CreateOrderRequest) -> Result<Self, Self::Error> {
        let (Some(amount), Some(payment_due_date)) = (req.amount, req.payment_due_date) else {
            return Err(AppError::validation("amount and paymentDueDate are required"));
        };
        Ok(OrderCreate {
            order_number: req.order_number,
            payment_description: req.payment_description,
            street_address: req.street_address,
            town: req.town,
            country: req.country,
            amount,
            currency: req.currency,
            payment_due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extract::violation_messages;
    use serde_json::json;
    use std::str::FromStr;

    fn valid_body() -> serde_json::Value {
        json!({
            "orderNumber": "ORD-12345",
            "paymentDescription": "Monthly subscription",
            "streetAddress": "123 Main St",
            "town": "Tallinn",
            "country": "Estonia",
            "amount": 99.99,
            "currency": "EUR",
            "paymentDueDate": "2023-12-31"
        })
    }

    fn parse(body: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(body).unwrap()
    }

    fn messages(body: serde_json::Value) -> Vec<String> {
        match parse(body).validate() {
            Ok(()) => Vec::new(),
            Err(e) => violation_messages(&e),
        }
    }

    #[test]
    fn test_valid_body_converts() {
        let req = parse(valid_body());
        req.validate().unwrap();

        let order = OrderCreate::try_from(req).unwrap();
        assert_eq!(order.order_number, "ORD-12345");
        assert_eq!(order.amount, Decimal::from_str("99.99").unwrap());
        assert_eq!(order.payment_due_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_zero_amount_is_valid() {
        let mut body = valid_body();
        body["amount"] = json!(0);
        assert!(messages(body).is_empty());
    }

    #[test]
    fn test_empty_body_reports_every_field() {
        let msgs = messages(json!({}));
        assert!(msgs.contains(&"orderNumber should not be empty".to_string()));
        assert!(msgs.contains(&"paymentDescription should not be empty".to_string()));
        assert!(msgs.contains(&"streetAddress should not be empty".to_string()));
        assert!(msgs.contains(&"town should not be empty".to_string()));
        assert!(msgs.contains(&"country should not be empty".to_string()));
        assert!(msgs.contains(&"amount is required".to_string()));
        assert!(msgs.contains(&"currency must be exactly 3 characters".to_string()));
        assert!(msgs.contains(&"paymentDueDate is required".to_string()));
    }

    #[test]
    fn test_blank_string_is_rejected() {
        let mut body = valid_body();
        body["town"] = json!("   ");
        assert_eq!(messages(body), ["town should not be empty"]);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut body = valid_body();
        body["amount"] = json!(-1);
        assert_eq!(messages(body), ["amount must not be less than 0"]);
    }

    #[test]
    fn test_amount_above_column_range_is_rejected() {
        let mut body = valid_body();
        body["amount"] = json!(1_000_000_000);
        assert_eq!(messages(body), ["amount must not be greater than 99999999.99"]);
    }

    #[test]
    fn test_currency_rules() {
        let mut body = valid_body();
        body["currency"] = json!("EURO");
        assert_eq!(messages(body.clone()), ["currency must be exactly 3 characters"]);

        body["currency"] = json!("E1R");
        assert_eq!(messages(body), ["currency must contain only letters"]);
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let mut body = valid_body();
        body["extra"] = json!(true);
        assert!(serde_json::from_value::<CreateOrderRequest>(body).is_err());
    }

    #[test]
    fn test_bad_date_is_a_parse_error() {
        let mut body = valid_body();
        body["paymentDueDate"] = json!("31/12/2023");
        assert!(serde_json::from_value::<CreateOrderRequest>(body).is_err());
    }
}
