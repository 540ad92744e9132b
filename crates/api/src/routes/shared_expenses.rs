//! Shared expense routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use walletify_core::shared_expense::{
    SharedExpense, SharedExpenseEdit, SharedExpenseFilter, SharedExpenseInput,
};
use walletify_db::SharedExpenseRepository;
use walletify_shared::types::SharedExpenseId;

use crate::{ApiError, AppState, extractors::{JsonBody, PathParam}, middleware::AuthUser};

/// Creates the shared expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shared-expenses",
            get(list_created).post(create_shared_expense),
        )
        .route("/shared-expenses/shared-with-me", get(list_shared_with_me))
        .route("/shared-expenses/pending", get(list_pending))
        .route("/shared-expenses/filter", post(filter_shared_expenses))
        .route(
            "/shared-expenses/{shared_expense_id}",
            get(get_shared_expense)
                .patch(update_shared_expense)
                .delete(delete_shared_expense),
        )
        .route(
            "/shared-expenses/{shared_expense_id}/accept",
            post(accept_shared_expense),
        )
}

fn repository(state: &AppState) -> SharedExpenseRepository {
    SharedExpenseRepository::new((*state.db).clone())
}

/// GET `/shared-expenses` - Recorded by the caller.
async fn list_created(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SharedExpense>>, ApiError> {
    Ok(Json(repository(&state).created_by(auth.user_id()).await?))
}

/// GET `/shared-expenses/shared-with-me`
async fn list_shared_with_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SharedExpense>>, ApiError> {
    Ok(Json(repository(&state).shared_with(auth.user_id()).await?))
}

/// GET `/shared-expenses/pending` - Shared with the caller, not accepted yet.
async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SharedExpense>>, ApiError> {
    Ok(Json(repository(&state).pending(auth.user_id()).await?))
}

/// POST `/shared-expenses`
async fn create_shared_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<SharedExpenseInput>,
) -> Result<(StatusCode, Json<SharedExpense>), ApiError> {
    let shared = repository(&state)
        .create(auth.user_id(), payload, Utc::now().date_naive())
        .await?;
    Ok((StatusCode::CREATED, Json(shared)))
}

/// POST `/shared-expenses/filter`
async fn filter_shared_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(filter): JsonBody<SharedExpenseFilter>,
) -> Result<Json<Vec<SharedExpense>>, ApiError> {
    Ok(Json(repository(&state).filter(auth.user_id(), &filter).await?))
}

/// GET `/shared-expenses/{shared_expense_id}`
async fn get_shared_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<SharedExpenseId>,
) -> Result<Json<SharedExpense>, ApiError> {
    Ok(Json(repository(&state).get(auth.user_id(), id).await?))
}

/// PATCH `/shared-expenses/{shared_expense_id}` - Recipient edit.
async fn update_shared_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<SharedExpenseId>,
    JsonBody(payload): JsonBody<SharedExpenseEdit>,
) -> Result<Json<SharedExpense>, ApiError> {
    let shared = repository(&state)
        .update(auth.user_id(), id, payload, Utc::now().date_naive())
        .await?;
    Ok(Json(shared))
}

/// POST `/shared-expenses/{shared_expense_id}/accept`
async fn accept_shared_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<SharedExpenseId>,
) -> Result<Json<SharedExpense>, ApiError> {
    Ok(Json(repository(&state).accept(auth.user_id(), id).await?))
}

/// DELETE `/shared-expenses/{shared_expense_id}` - Recipient only.
async fn delete_shared_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<SharedExpenseId>,
) -> Result<StatusCode, ApiError> {
    repository(&state).delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
