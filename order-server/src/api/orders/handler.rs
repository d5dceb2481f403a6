//! Order API Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderFilter};

use super::dto::CreateOrderRequest;
use crate::api::extract::ValidatedJson;
use crate::state::AppState;

type ApiResult<T> = Result<T, AppError>;

/// Create an order
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let input = OrderCreate::try_from(payload)?;
    let order_number = input.order_number.clone();

    match state.orders.create_order(input).await {
        Ok(order) => {
            tracing::info!(
                order_number = %order.order_number,
                unique_id = %order.unique_id,
                "Order created"
            );
            Ok((StatusCode::CREATED, Json(order)))
        }
        Err(e) => {
            let err: AppError = e.into();
            if err.code == ErrorCode::OrderNumberExists {
                tracing::warn!(order_number = %order_number, "Duplicate order number");
            }
            Err(err)
        }
    }
}

/// List orders, priority country first
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<OrderFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Order>>> {
    let Query(filter) = query.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let orders = state.orders.list_orders(filter).await?;
    Ok(Json(orders))
}

/// Get order by generated unique id
pub async fn get_by_unique_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Order>> {
    let Path(unique_id) = path.map_err(path_error)?;
    let order = state.orders.get_by_unique_id(&unique_id).await?;
    Ok(Json(order))
}

/// Get order by order number
pub async fn get_by_order_number(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Order>> {
    let Path(order_number) = path.map_err(path_error)?;
    let order = state.orders.get_by_order_number(&order_number).await?;
    Ok(Json(order))
}

fn path_error(rejection: PathRejection) -> AppError {
    AppError::invalid_request(rejection.body_text())
}
