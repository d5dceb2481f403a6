//! Order Repository contract

use async_trait::async_trait;
use shared::models::{NewOrder, Order, OrderFilter};

use super::RepoResult;

/// Columns selected for an [`Order`], in struct order
pub(crate) const ORDER_COLUMNS: &str = "order_number, unique_id, payment_description, \
    street_address, town, country, amount, currency, payment_due_date, created_at, updated_at";

pub(crate) const COL_ORDER_NUMBER: &str = "order_number";
pub(crate) const COL_UNIQUE_ID: &str = "unique_id";

/// Storage operations the order service relies on
///
/// Every value is passed as a bound parameter, never spliced into SQL.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order and return it with store-assigned timestamps
    ///
    /// Fails with `RepoError::Duplicate` when `order_number` or `unique_id`
    /// is already taken.
    async fn create(&self, order: NewOrder) -> RepoResult<Order>;

    /// Orders matching `filter`
    ///
    /// Rows come back with `priority_country` first and then by due date,
    /// but callers must not depend on that order.
    async fn find_all(&self, filter: &OrderFilter, priority_country: &str)
    -> RepoResult<Vec<Order>>;

    async fn find_by_unique_id(&self, unique_id: &str) -> RepoResult<Option<Order>>;

    async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>>;
}

/// `LIKE` pattern matching `needle` anywhere, with `%`, `_` and `\` escaped
///
/// Use together with `ESCAPE '\'`.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
