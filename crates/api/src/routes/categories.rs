//! Category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use walletify_core::category::{Category, CategoryInput};
use walletify_db::CategoryRepository;
use walletify_shared::types::CategoryId;

use crate::{ApiError, AppState, extractors::{JsonBody, PathParam}, middleware::AuthUser};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{category_id}",
            patch(update_category).delete(delete_category),
        )
}

fn repository(state: &AppState) -> CategoryRepository {
    CategoryRepository::new((*state.db).clone())
}

/// GET `/categories` - Static categories followed by the caller's own.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = repository(&state)
        .effective_categories(auth.user_id())
        .await?;
    Ok(Json(categories))
}

/// POST `/categories`
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = repository(&state).create(auth.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH `/categories/{category_id}`
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(category_id): PathParam<CategoryId>,
    JsonBody(payload): JsonBody<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    let category = repository(&state)
        .update(auth.user_id(), category_id, payload)
        .await?;
    Ok(Json(category))
}

/// DELETE `/categories/{category_id}`
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<StatusCode, ApiError> {
    repository(&state)
        .delete(auth.user_id(), category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
