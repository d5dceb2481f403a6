//! Order API Module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /orders | POST | Create an order |
//! | /orders | GET | List orders (`country`, `description` filters) |
//! | /orders/unique/{unique_id} | GET | Order by generated id |
//! | /orders/number/{order_number} | GET | Order by order number |

pub mod dto;
mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Order router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route("/orders/unique/{unique_id}", get(handler::get_by_unique_id))
        .route("/orders/number/{order_number}", get(handler::get_by_order_number))
}
