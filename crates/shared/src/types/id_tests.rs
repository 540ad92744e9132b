use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_budget_id_round_trips_through_uuid() {
    let uuid = Uuid::new_v4();
    let id = BudgetId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[test]
fn test_new_ids_are_time_ordered() {
    let first = DetailId::new();
    let second = DetailId::new();
    assert!(first.into_inner() <= second.into_inner());
}

#[test]
fn test_category_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = CategoryId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(CategoryId::from_str("not-a-uuid").is_err());
}

#[test]
fn test_ids_serialize_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&ExpenseId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));

    let parsed: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.into_inner(), uuid);
}
