use chrono::NaiveDate;
use serde_json::json;
use worker_core::{Employee, Project};

#[test]
fn employee_serializes_nullable_counters_as_null() {
    let employee = Employee::new("Test", "User");
    let value = serde_json::to_value(&employee).unwrap();

    assert_eq!(value["first_name"], json!("Test"));
    assert_eq!(value["completed_task_count"], json!(null));
    assert_eq!(value["assignments"], json!([]));
}

#[test]
fn project_deserializes_without_relation_collections() {
    let value = json!({
        "id": 1,
        "name": "Enterprise System",
        "start_date": "2024-01-01T00:00:00",
        "end_date": "2024-06-01T00:00:00",
        "delay_days": 5
    });
    let project: Project = serde_json::from_value(value).unwrap();

    assert_eq!(project.delay_days, Some(5));
    assert_eq!(
        project.end_date,
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    );
    assert!(project.assignments.is_empty());
    assert!(project.tasks.is_empty());
}
