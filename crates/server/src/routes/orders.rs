//! Order route handlers: checkout, history, and the admin status update.

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use mesa_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{Identity, RequireAdmin};
use crate::models::Order;
use crate::services::{CheckoutRequest, CheckoutService};
use crate::state::AppState;

/// Convert the caller's cart into an order.
#[instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = CheckoutService::new(state.pool())
        .checkout(identity.user_id, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders, newest first. An empty history is an empty
/// array, not an error.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>, identity: Identity) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(identity.user_id)
        .await?;

    Ok(Json(orders))
}

/// Fetch one order. Non-owners get a 404 rather than a hint the order
/// exists; admins may fetch any order.
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != identity.user_id && !identity.is_admin {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    Ok(Json(order))
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// Admin: apply a status transition to an order.
///
/// An unknown status string is a 400; a transition the lifecycle forbids is a
/// 409, as is losing the race against a concurrent admin edit.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Order>> {
    let target: OrderStatus = body.status.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid status {:?}. Valid statuses are: pending, processing, shipped, completed, canceled",
            body.status
        ))
    })?;

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    order.status.transition(target)?;
    let updated_at = repo.update_status(id, order.status, target).await?;

    tracing::info!(order_id = %id, from = %order.status, to = %target, "order status updated");

    Ok(Json(Order {
        status: target,
        updated_at,
        ..order
    }))
}
