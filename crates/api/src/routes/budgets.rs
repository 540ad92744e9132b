//! Budget routes: the budget engine over HTTP.
//!
//! The HTTP surface never skips the batch rules.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use walletify_core::budget::{BudgetInput, BudgetView};
use walletify_core::expense::Expense;
use walletify_db::BudgetRepository;
use walletify_shared::AppError;
use walletify_shared::types::{BudgetId, DetailId};

use crate::{ApiError, AppState, extractors::{JsonBody, PathParam}, middleware::AuthUser};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/current", get(current_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route(
            "/budgets/current/future-expenses/{detail_id}/settle",
            post(settle_future_expense),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Optional body of a settlement request.
#[derive(Debug, Default, Deserialize)]
pub struct SettleRequest {
    /// Settlement date; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn repository(state: &AppState) -> BudgetRepository {
    BudgetRepository::new((*state.db).clone())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/budgets` - List the caller's budgets with aggregates.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<BudgetView>>, ApiError> {
    let views = repository(&state).get_all(auth.user_id(), today()).await?;
    Ok(Json(views))
}

/// POST `/budgets` - Create a budget with its details.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<BudgetInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = repository(&state)
        .create(auth.user_id(), payload, false)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET `/budgets/current` - The budget covering today, or `null`.
async fn current_budget(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<BudgetView>>, ApiError> {
    let view = repository(&state)
        .get_current(auth.user_id(), today())
        .await?;
    Ok(Json(view))
}

/// GET `/budgets/{budget_id}` - One budget with aggregates.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(budget_id): PathParam<BudgetId>,
) -> Result<Json<BudgetView>, ApiError> {
    let view = repository(&state)
        .get_budget(auth.user_id(), budget_id, today())
        .await?;
    Ok(Json(view))
}

/// PUT `/budgets/{budget_id}` - Change dates and replace limits.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(budget_id): PathParam<BudgetId>,
    JsonBody(payload): JsonBody<BudgetInput>,
) -> Result<Json<BudgetView>, ApiError> {
    let repo = repository(&state);
    let today = today();
    repo.update(auth.user_id(), budget_id, payload, false, today)
        .await?;
    let view = repo.get_budget(auth.user_id(), budget_id, today).await?;
    Ok(Json(view))
}

/// DELETE `/budgets/{budget_id}` - Delete a budget that is not running.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(budget_id): PathParam<BudgetId>,
) -> Result<StatusCode, ApiError> {
    repository(&state)
        .delete(auth.user_id(), budget_id, today())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/budgets/current/future-expenses/{detail_id}/settle` - Turn a
/// planned expense of the current budget into a ledger expense.
///
/// The body is optional; an empty body settles today.
async fn settle_future_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(detail_id): PathParam<DetailId>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let request: SettleRequest = if body.is_empty() {
        SettleRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::MissingField(e.to_string()))?
    };

    let expense = repository(&state)
        .settle_future_expense(auth.user_id(), detail_id, request.date, today())
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}
