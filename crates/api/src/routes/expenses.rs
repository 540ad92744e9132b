//! Expense ledger routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use walletify_core::expense::{Expense, ExpenseFilter, ExpenseInput};
use walletify_db::ExpenseRepository;
use walletify_shared::types::ExpenseId;

use crate::{ApiError, AppState, extractors::{JsonBody, PathParam}, middleware::AuthUser};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/filter", post(filter_expenses))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
}

fn repository(state: &AppState) -> ExpenseRepository {
    ExpenseRepository::new((*state.db).clone())
}

/// GET `/expenses` - The caller's expenses, newest first.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(repository(&state).list(auth.user_id()).await?))
}

/// POST `/expenses`
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<ExpenseInput>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = repository(&state)
        .create(auth.user_id(), payload, Utc::now().date_naive())
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET `/expenses/{expense_id}`
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(repository(&state).get(auth.user_id(), expense_id).await?))
}

/// PATCH `/expenses/{expense_id}`
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(expense_id): PathParam<ExpenseId>,
    JsonBody(payload): JsonBody<ExpenseInput>,
) -> Result<Json<Expense>, ApiError> {
    let expense = repository(&state)
        .update(auth.user_id(), expense_id, payload, Utc::now().date_naive())
        .await?;
    Ok(Json(expense))
}

/// DELETE `/expenses/{expense_id}`
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<StatusCode, ApiError> {
    repository(&state)
        .delete(auth.user_id(), expense_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/expenses/filter` - Expenses in an inclusive date range,
/// optionally restricted to some categories.
async fn filter_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(filter): JsonBody<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(repository(&state).filter(auth.user_id(), &filter).await?))
}
