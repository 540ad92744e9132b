//! Error to HTTP response mapping.
//!
//! Every handler returns `Result<_, ApiError>`. Rule violations become 400
//! responses carrying the domain error code; storage failures are logged and
//! answered with a generic 500, a lost write race with 409.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use walletify_core::{budget, category, expense, shared_expense};
use walletify_db::repositories::{
    BudgetError, CategoryError, ExpenseError, SharedExpenseError,
};
use walletify_shared::AppError;

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl std::fmt::Display) -> Self {
        Self {
            status,
            body: json!({ "error": code, "message": message.to_string() }),
        }
    }

    fn database(e: &sea_orm::DbErr) -> Self {
        tracing::error!(error = %e, "Database operation failed");
        AppError::Database(e.to_string()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self {
            status: StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: e.to_body(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MissingField(rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text()).into()
    }
}

impl From<budget::BudgetError> for ApiError {
    fn from(e: budget::BudgetError) -> Self {
        let status = match &e {
            budget::BudgetError::Forbidden => StatusCode::FORBIDDEN,
            budget::BudgetError::ConcurrentModification => StatusCode::CONFLICT,
            err if err.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), &e)
    }
}

impl From<category::CategoryError> for ApiError {
    fn from(e: category::CategoryError) -> Self {
        let status = match &e {
            category::CategoryError::Forbidden | category::CategoryError::StaticCategory => {
                StatusCode::FORBIDDEN
            }
            category::CategoryError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), &e)
    }
}

impl From<expense::ExpenseError> for ApiError {
    fn from(e: expense::ExpenseError) -> Self {
        let status = match &e {
            expense::ExpenseError::Forbidden => StatusCode::FORBIDDEN,
            expense::ExpenseError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), &e)
    }
}

impl From<shared_expense::SharedExpenseError> for ApiError {
    fn from(e: shared_expense::SharedExpenseError) -> Self {
        let status = match &e {
            shared_expense::SharedExpenseError::Forbidden => StatusCode::FORBIDDEN,
            shared_expense::SharedExpenseError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), &e)
    }
}

impl From<BudgetError> for ApiError {
    fn from(e: BudgetError) -> Self {
        match e {
            BudgetError::Domain(e) => e.into(),
            BudgetError::Database(e) => Self::database(&e),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::Domain(e) => e.into(),
            CategoryError::Database(e) => Self::database(&e),
        }
    }
}

impl From<ExpenseError> for ApiError {
    fn from(e: ExpenseError) -> Self {
        match e {
            ExpenseError::Domain(e) => e.into(),
            ExpenseError::Database(e) => Self::database(&e),
        }
    }
}

impl From<SharedExpenseError> for ApiError {
    fn from(e: SharedExpenseError) -> Self {
        match e {
            SharedExpenseError::Domain(e) => e.into(),
            SharedExpenseError::Database(e) => Self::database(&e),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(&e)
    }
}
