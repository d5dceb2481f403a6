//! Order Repository (PostgreSQL)

use async_trait::async_trait;
use shared::models::{NewOrder, Order, OrderFilter};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::order::{COL_ORDER_NUMBER, COL_UNIQUE_ID, ORDER_COLUMNS, like_pattern};
use super::{OrderRepository, RepoResult, map_insert_error};

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let NewOrder { unique_id, order } = data;
        let sql = format!(
            r#"
            INSERT INTO orders (order_number, unique_id, payment_description, street_address,
                                town, country, amount, currency, payment_due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(&order.order_number)
            .bind(&unique_id)
            .bind(&order.payment_description)
            .bind(&order.street_address)
            .bind(&order.town)
            .bind(&order.country)
            .bind(order.amount)
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
            })
    }

    async fn find_all(
        &self,
        filter: &OrderFilter,
        priority_country: &str,
    ) -> RepoResult<Vec<Order>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"));
        if let Some(country) = &filter.country {
            qb.push(" AND country = ").push_bind(country.clone());
        }
        if let Some(description) = &filter.description {
            qb.push(" AND payment_description LIKE ")
                .push_bind(like_pattern(description))
                .push(" ESCAPE '\\'");
        }
        qb.push(" ORDER BY CASE WHEN country = ")
            .push_bind(priority_country.to_string())
            .push(" THEN 0 ELSE 1 END, payment_due_date");

        let orders = qb.build_query_as::<Order>().fetch_all(&self.pool).await?;
        Ok(orders)
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE unique_id = $1"
        ))
        .bind(unique_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }
}
