//! Order service
//!
//! Business rules live here: order numbers are unique, every order gets a
//! generated public id, and listings put the priority country first.

use std::sync::Arc;

use shared::error::AppError;
use shared::models::{Order, OrderCreate, OrderFilter};
use shared::unique_id::IdGenerator;

use crate::db::repository::order::COL_UNIQUE_ID;
use crate::db::repository::{OrderRepository, RepoError};
use crate::error::{ServiceError, ServiceResult};

/// Attempts at inserting with a fresh `unique_id` before giving up
pub const MAX_ID_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    id_generator: Arc<dyn IdGenerator>,
    priority_country: Arc<str>,
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        id_generator: Arc<dyn IdGenerator>,
        priority_country: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            repo,
            id_generator,
            priority_country: priority_country.into(),
        }
    }

    pub fn priority_country(&self) -> &str {
        &self.priority_country
    }

    /// Create an order with a freshly generated `unique_id`
    ///
    /// A taken `order_number` is a conflict whether the pre-check sees it or
    /// the unique constraint catches a concurrent insert. A taken `unique_id`
    /// gets a new id.
    pub async fn create_order(&self, input: OrderCreate) -> ServiceResult<Order> {
        if self
            .repo
            .find_by_order_number(&input.order_number)
            .await?
            .is_some()
        {
            return Err(AppError::order_number_exists(&input.order_number).into());
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let unique_id = self.id_generator.generate_id();
            let new_order = input.clone().with_unique_id(unique_id);

            match self.repo.create(new_order).await {
                Ok(order) => return Ok(order),
                Err(RepoError::Duplicate { column, value }) if column == COL_UNIQUE_ID => {
                    tracing::warn!(unique_id = %value, attempt, "Generated unique_id collided");
                    if attempt >= MAX_ID_ATTEMPTS {
                        return Err(ServiceError::Db(
                            format!("No free unique_id after {attempt} attempts").into(),
                        ));
                    }
                }
                Err(RepoError::Duplicate { .. }) => {
                    return Err(AppError::order_number_exists(&input.order_number).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Orders matching `filter`, priority country first, then by due date
    pub async fn list_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<Order>> {
        let mut orders = self.repo.find_all(&filter, &self.priority_country).await?;
        sort_by_priority(&mut orders, &self.priority_country);
        Ok(orders)
    }

    pub async fn get_by_unique_id(&self, unique_id: &str) -> ServiceResult<Order> {
        self.repo
            .find_by_unique_id(unique_id)
            .await?
            .ok_or_else(|| AppError::order_not_found("unique ID", unique_id).into())
    }

    pub async fn get_by_order_number(&self, order_number: &str) -> ServiceResult<Order> {
        self.repo
            .find_by_order_number(order_number)
            .await?
            .ok_or_else(|| AppError::order_not_found("number", order_number).into())
    }
}

/// Stable sort: `priority_country` orders first, each group by ascending due date
///
/// Ties keep their incoming relative order.
pub fn sort_by_priority(orders: &mut [Order], priority_country: &str) {
    orders.sort_by_key(|o| (o.country != priority_country, o.payment_due_date));
}
