//! Order Repository (SQLite)
//!
//! SQLite has no exact decimal type, so `amount` is stored as TEXT with two
//! decimal places and parsed back into a `Decimal`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{NewOrder, Order, OrderFilter};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::order::{COL_ORDER_NUMBER, COL_UNIQUE_ID, ORDER_COLUMNS};
use super::{OrderRepository, RepoError, RepoResult, map_insert_error};

/// Scale of the `amount` column
const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_number: String,
    unique_id: String,
    payment_description: String,
    street_address: String,
    town: String,
    country: String,
    amount: String,
    currency: String,
    payment_due_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&row.amount).map_err(|e| {
            RepoError::Database(format!(
                "Invalid amount '{}' for order {}: {e}",
                row.amount, row.order_number
            ))
        })?;
        Ok(Order {
            order_number: row.order_number,
            unique_id: row.unique_id,
            payment_description: row.payment_description,
            street_address: row.street_address,
            town: row.town,
            country: row.country,
            amount,
            currency: row.currency,
            payment_due_date: row.payment_due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `amount` as stored: rounded half away from zero, like PostgreSQL's
/// NUMERIC, and padded to [`AMOUNT_SCALE`] places
fn amount_text(amount: Decimal) -> String {
    let mut value =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(AMOUNT_SCALE);
    value.to_string()
}

#[derive(Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {column} = ?"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Order::try_from).transpose()
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let NewOrder { unique_id, order } = data;
        let sql = format!(
            r#"
            INSERT INTO orders (order_number, unique_id, payment_description, street_address,
                                town, country, amount, currency, payment_due_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(&order.order_number)
            .bind(&unique_id)
            .bind(&order.payment_description)
            .bind(&order.street_address)
            .bind(&order.town)
            .bind(&order.country)
            .bind(amount_text(order.amount))
            .bind(&order.currency)
            .bind(order.payment_due_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_insert_error(
                    e,
                    &[
                        (COL_ORDER_NUMBER, order.order_number.as_str()),
                        (COL_UNIQUE_ID, unique_id.as_str()),
                    ],
                )
            })?;
        Order::try_from(row)
    }

    async fn find_all(
        &self,
        filter: &OrderFilter,
        priority_country: &str,
    ) -> RepoResult<Vec<Order>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1 = 1"));
        if let Some(country) = &filter.country {
            qb.push(" AND country = ").push_bind(country.clone());
        }
        // instr() rather than LIKE: SQLite's LIKE ignores ASCII case
        if let Some(description) = &filter.description {
            qb.push(" AND instr(payment_description, ")
                .push_bind(description.clone())
                .push(") > 0");
        }
        qb.push(" ORDER BY CASE WHEN country = ")
            .push_bind(priority_country.to_string())
            .push(" THEN 0 ELSE 1 END, payment_due_date");

        let rows = qb.build_query_as::<OrderRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> RepoResult<Option<Order>> {
        self.find_one(COL_UNIQUE_ID, unique_id).await
    }

    async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        self.find_one(COL_ORDER_NUMBER, order_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::OrderCreate;

    async fn repo() -> SqliteOrderRepository {
        let db = DbService::sqlite_in_memory().await.unwrap();
        SqliteOrderRepository::new(db.sqlite_pool().unwrap().clone())
    }

    fn new_order(number: &str, unique_id: &str, country: &str, description: &str, due: &str) -> NewOrder {
        OrderCreate {
            order_number: number.to_string(),
            payment_description: description.to_string(),
            street_address: "1 Test St".to_string(),
            town: "Test Town".to_string(),
            country: country.to_string(),
            amount: Decimal::from_str("99.99").unwrap(),
            currency: "EUR".to_string(),
            payment_due_date: NaiveDate::from_str(due).unwrap(),
        }
        .with_unique_id(unique_id.to_string())
    }

    #[test]
    fn test_amount_text_is_fixed_scale() {
        assert_eq!(amount_text(Decimal::from_str("10.5").unwrap()), "10.50");
        assert_eq!(amount_text(Decimal::from_str("3").unwrap()), "3.00");
        assert_eq!(amount_text(Decimal::from_str("1.005").unwrap()), "1.01");
        assert_eq!(amount_text(Decimal::from_str("2.125").unwrap()), "2.13");
        assert_eq!(amount_text(Decimal::from_str("1.004").unwrap()), "1.00");
    }

    #[tokio::test]
    async fn test_create_and_find_by_keys() {
        let repo = repo().await;
        let created = repo
            .create(new_order("ORD-1", "ABC-defg-XYZ", "Estonia", "Monthly subscription", "2023-12-31"))
            .await
            .unwrap();

        assert_eq!(created.order_number, "ORD-1");
        assert_eq!(created.unique_id, "ABC-defg-XYZ");
        assert_eq!(created.amount, Decimal::from_str("99.99").unwrap());
        assert_eq!(created.created_at, created.updated_at);

        let by_number = repo.find_by_order_number("ORD-1").await.unwrap().unwrap();
        assert_eq!(by_number, created);
        let by_id = repo.find_by_unique_id("ABC-defg-XYZ").await.unwrap().unwrap();
        assert_eq!(by_id, created);

        assert!(repo.find_by_order_number("ORD-404").await.unwrap().is_none());
        assert!(repo.find_by_unique_id("ZZZ-zzzz-ZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_values_are_bound_not_spliced() {
        let repo = repo().await;
        repo.create(new_order("ORD-1", "ABC-defg-XYZ", "Estonia", "x", "2023-12-31"))
            .await
            .unwrap();

        let found = repo
            .find_by_order_number("' OR '1'='1")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_order_number_is_reported() {
        let repo = repo().await;
        repo.create(new_order("ORD-1", "ABC-defg-XYZ", "Estonia", "x", "2023-12-31"))
            .await
            .unwrap();

        let err = repo
            .create(new_order("ORD-1", "DEF-ghjk-MNP", "Finland", "y", "2024-01-01"))
            .await
            .unwrap_err();
        match err {
            RepoError::Duplicate { column, value } => {
                assert_eq!(column, COL_ORDER_NUMBER);
                assert_eq!(value, "ORD-1");
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_unique_id_is_reported() {
        let repo = repo().await;
        repo.create(new_order("ORD-1", "ABC-defg-XYZ", "Estonia", "x", "2023-12-31"))
            .await
            .unwrap();

        let err = repo
            .create(new_order("ORD-2", "ABC-defg-XYZ", "Estonia", "x", "2023-12-31"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Duplicate { column: COL_UNIQUE_ID, .. }
        ));
    }

    #[tokio::test]
    async fn test_find_all_filters() {
        let repo = repo().await;
        repo.create(new_order("A", "AAA-aaaa-AAA", "Estonia", "Monthly Subscription", "2023-01-15"))
            .await
            .unwrap();
        repo.create(new_order("B", "BBB-bbbb-BBB", "Estonia", "One-off fee", "2023-01-05"))
            .await
            .unwrap();
        repo.create(new_order("C", "CCC-cccc-CCC", "Finland", "Yearly Subscription", "2023-01-10"))
            .await
            .unwrap();

        let numbers = |orders: Vec<Order>| -> Vec<String> {
            orders.into_iter().map(|o| o.order_number).collect()
        };

        let all = repo.find_all(&OrderFilter::default(), "Estonia").await.unwrap();
        assert_eq!(numbers(all), ["B", "A", "C"]);

        let finland = repo
            .find_all(&OrderFilter::by_country("Finland"), "Estonia")
            .await
            .unwrap();
        assert_eq!(numbers(finland), ["C"]);

        let subscriptions = repo
            .find_all(&OrderFilter::by_description("Subscription"), "Estonia")
            .await
            .unwrap();
        assert_eq!(numbers(subscriptions), ["A", "C"]);

        let both = repo
            .find_all(
                &OrderFilter {
                    country: Some("Estonia".to_string()),
                    description: Some("Subscription".to_string()),
                },
                "Estonia",
            )
            .await
            .unwrap();
        assert_eq!(numbers(both), ["A"]);

        let none = repo
            .find_all(&OrderFilter::by_country("Latvia"), "Estonia")
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_empty_strings_are_literal() {
        let repo = repo().await;
        repo.create(new_order("A", "AAA-aaaa-AAA", "Estonia", "Fee", "2023-01-15"))
            .await
            .unwrap();

        let empty_country = repo
            .find_all(&OrderFilter::by_country(""), "Estonia")
            .await
            .unwrap();
        assert!(empty_country.is_empty());

        let empty_description = repo
            .find_all(&OrderFilter::by_description(""), "Estonia")
            .await
            .unwrap();
        assert_eq!(empty_description.len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_treats_wildcards_literally() {
        let repo = repo().await;
        repo.create(new_order("A", "AAA-aaaa-AAA", "Estonia", "100% refund", "2023-01-15"))
            .await
            .unwrap();
        repo.create(new_order("B", "BBB-bbbb-BBB", "Estonia", "1000 units", "2023-01-16"))
            .await
            .unwrap();

        let found = repo
            .find_all(&OrderFilter::by_description("0%"), "Estonia")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_number, "A");
    }

    #[tokio::test]
    async fn test_find_all_description_is_case_sensitive() {
        let repo = repo().await;
        repo.create(new_order("A", "AAA-aaaa-AAA", "Estonia", "Monthly Subscription", "2023-01-15"))
            .await
            .unwrap();

        let lower = repo
            .find_all(&OrderFilter::by_description("subscription"), "Estonia")
            .await
            .unwrap();
        assert!(lower.is_empty());
    }
}
