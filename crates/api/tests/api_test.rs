//! End-to-end tests driving the router over an in-memory database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use walletify_api::{AppState, create_router};
use walletify_db::migration::Migrator;
use walletify_db::repositories::DEFAULT_STATIC_CATEGORIES;
use walletify_db::CategoryRepository;
use walletify_shared::{JwtConfig, JwtService};

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
}

impl TestApp {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to connect to database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        CategoryRepository::new(db.clone())
            .seed_static(&DEFAULT_STATIC_CATEGORIES)
            .await
            .expect("Failed to seed categories");

        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_minutes: 15,
        }));
        let state = AppState {
            db: Arc::new(db),
            jwt_service: jwt.clone(),
        };

        Self {
            router: create_router(state),
            jwt,
        }
    }

    fn token(&self, user: Uuid) -> String {
        self.jwt
            .generate_access_token(user, Some(format!("{user}@example.com")))
            .expect("should generate token")
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"));
        if let Some(user) = user {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn first_category(&self, user: Uuid) -> String {
        let (_, categories) = self.call("GET", "/categories", Some(user), None).await;
        categories[0]["id"].as_str().unwrap().to_string()
    }
}

fn day(offset: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(offset)
}

// ============================================================================
// Auth and health
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/budgets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let request = Request::builder()
        .uri("/api/v1/budgets")
        .header(AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Budgets
// ============================================================================

#[tokio::test]
async fn test_budget_create_and_read() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;

    let (status, created) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({
                "initial_date": day(10),
                "final_date": day(40),
                "details": [{ "category_id": category, "limit": 1000 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, view) = app
        .call("GET", &format!("/budgets/{id}"), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total_limit"], json!(1000.0));
    assert_eq!(view["total_spent"], json!(0.0));
    assert_eq!(view["editable"], true);
    assert_eq!(view["details"][0]["kind"], "limit");
    assert_eq!(
        view["details"].as_array().unwrap().len(),
        DEFAULT_STATIC_CATEGORIES.len()
    );

    let (status, list) = app.call("GET", "/budgets", Some(user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, current) = app.call("GET", "/budgets/current", Some(user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current, Value::Null);

    // Another user sees a 403, an unknown id a 404
    let (status, body) = app
        .call("GET", &format!("/budgets/{id}"), Some(Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = app
        .call("GET", &format!("/budgets/{}", Uuid::new_v4()), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "budget_not_found");
}

#[tokio::test]
async fn test_budget_rule_violations_are_bad_requests() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;
    let limit = json!([{ "category_id": category, "limit": 100 }]);

    let (status, _) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({ "initial_date": day(1), "final_date": day(30), "details": limit })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({ "initial_date": day(30), "final_date": day(60), "details": limit })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "overlapping_budget");

    let (status, body) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({ "initial_date": day(100), "final_date": day(130), "details": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_budget");

    let (status, body) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({ "final_date": day(130), "details": limit })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_field");
}

#[tokio::test]
async fn test_zero_only_limits_are_rejected() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;

    let (status, body) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({
                "initial_date": day(1),
                "final_date": day(30),
                "details": [{ "category_id": category, "limit": 0 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_limit_detail");

    let (_, budgets) = app.call("GET", "/budgets", Some(user), None).await;
    assert_eq!(budgets, json!([]));
}

#[tokio::test]
async fn test_malformed_ids_answer_json_errors() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();

    for (method, uri) in [
        ("GET", "/budgets/not-a-uuid"),
        ("DELETE", "/budgets/42"),
        ("POST", "/budgets/current/future-expenses/nope/settle"),
        ("DELETE", "/categories/nope"),
        ("GET", "/expenses/nope"),
    ] {
        let (status, body) = app.call(method, uri, Some(user), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["error"], "validation_error", "{method} {uri}");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_update_and_delete_budget() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;

    let (_, created) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({
                "initial_date": day(10),
                "final_date": day(20),
                "details": [{ "category_id": category, "limit": 100 }]
            })),
        )
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, view) = app
        .call(
            "PUT",
            &format!("/budgets/{id}"),
            Some(user),
            Some(json!({
                "initial_date": day(10),
                "final_date": day(25),
                "details": [{ "category_id": category, "limit": 250.5 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total_limit"], json!(250.5));
    assert_eq!(view["final_date"], json!(day(25)));

    let (status, _) = app
        .call("DELETE", &format!("/budgets/{id}"), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .call("GET", &format!("/budgets/{id}"), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settle_future_expense() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;

    let (status, body) = app
        .call(
            "POST",
            &format!("/budgets/current/future-expenses/{}/settle", Uuid::new_v4()),
            Some(user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_current_budget");

    let (status, _) = app
        .call(
            "POST",
            "/budgets",
            Some(user),
            Some(json!({
                "initial_date": day(-5),
                "final_date": day(5),
                "details": [
                    { "category_id": category, "limit": 500 },
                    {
                        "category_id": category,
                        "value": 120.5,
                        "name": "insurance",
                        "expiration_date": day(3)
                    }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, current) = app.call("GET", "/budgets/current", Some(user), None).await;
    let detail = current["details"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["kind"] == "future_expense")
        .unwrap();
    assert_eq!(detail["expended"], false);
    let detail_id = detail["id"].as_str().unwrap().to_string();
    let uri = format!("/budgets/current/future-expenses/{detail_id}/settle");

    let (status, expense) = app.call("POST", &uri, Some(user), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["value"], json!(120.5));
    assert_eq!(expense["name"], "insurance");
    assert_eq!(expense["future_expense"], true);
    assert_eq!(expense["date"], json!(day(0)));

    let (status, body) = app.call("POST", &uri, Some(user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_settled");

    let (_, current) = app.call("GET", "/budgets/current", Some(user), None).await;
    assert_eq!(current["total_spent"], json!(120.5));
}

// ============================================================================
// Categories and expenses
// ============================================================================

#[tokio::test]
async fn test_category_routes() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();

    let (status, created) = app
        .call(
            "POST",
            "/categories",
            Some(user),
            Some(json!({ "name": "Mascotas", "icon": "Pets" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "mascotas");
    assert_eq!(created["static"], false);

    let (status, body) = app
        .call(
            "POST",
            "/categories",
            Some(user),
            Some(json!({ "name": "mascotas", "icon": "Pets" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_name");

    let static_id = app.first_category(user).await;
    let (status, body) = app
        .call(
            "PATCH",
            &format!("/categories/{static_id}"),
            Some(user),
            Some(json!({ "name": "mine", "icon": "Home" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "static_category");

    let id = created["id"].as_str().unwrap();
    let (status, _) = app
        .call("DELETE", &format!("/categories/{id}"), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_expense_routes() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let category = app.first_category(user).await;

    let (status, created) = app
        .call(
            "POST",
            "/expenses",
            Some(user),
            Some(json!({
                "category_id": category,
                "name": "groceries",
                "value": 42.5,
                "date": day(-1)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["future_expense"], false);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            "POST",
            "/expenses",
            Some(user),
            Some(json!({
                "category_id": category,
                "name": "later",
                "value": 1,
                "date": day(1)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "future_date");

    let (status, updated) = app
        .call(
            "PATCH",
            &format!("/expenses/{id}"),
            Some(user),
            Some(json!({
                "category_id": category,
                "name": "market",
                "value": 40,
                "date": day(-1)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "market");

    let (status, filtered) = app
        .call(
            "POST",
            "/expenses/filter",
            Some(user),
            Some(json!({ "from": day(-7), "to": day(0) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call("GET", &format!("/expenses/{id}"), Some(Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("DELETE", &format!("/expenses/{id}"), Some(user), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, list) = app.call("GET", "/expenses", Some(user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

// ============================================================================
// Shared expenses
// ============================================================================

#[tokio::test]
async fn test_shared_expense_routes() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let category = app.first_category(owner).await;
    // First authenticated request registers the recipient's email
    app.call("GET", "/shared-expenses", Some(recipient), None).await;

    let (status, body) = app
        .call(
            "POST",
            "/shared-expenses",
            Some(owner),
            Some(json!({
                "category_id": category,
                "name": "Dinner",
                "value": 2500,
                "date": day(-1),
                "share_with": "stranger@example.com",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_not_found");

    let (status, shared) = app
        .call(
            "POST",
            "/shared-expenses",
            Some(owner),
            Some(json!({
                "category_id": category,
                "name": "Dinner",
                "value": 2500,
                "date": day(-1),
                "share_with": format!("{recipient}@example.com"),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(shared["value"], json!(2500.0));
    assert_eq!(shared["accepted"], false);
    let id = shared["id"].as_str().unwrap().to_string();

    let (_, pending) = app
        .call("GET", "/shared-expenses/pending", Some(recipient), None)
        .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, body) = app
        .call("DELETE", &format!("/shared-expenses/{id}"), Some(owner), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, accepted) = app
        .call("POST", &format!("/shared-expenses/{id}/accept"), Some(recipient), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["accepted"], true);

    let (status, filtered) = app
        .call(
            "POST",
            "/shared-expenses/filter",
            Some(recipient),
            Some(json!({ "scope": "shared_with_me", "from": day(-1), "to": day(0) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call("DELETE", &format!("/shared-expenses/{id}"), Some(recipient), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .call("GET", &format!("/shared-expenses/{id}"), Some(owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "shared_expense_not_found");
}
