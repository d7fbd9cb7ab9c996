use chrono::{Duration, NaiveDate, NaiveDateTime};
use worker_core::{
    DbContext, Employee, EmployeeService, Project, ProjectService, ServiceError, Task,
    TaskService, ValidationError,
};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, d)
        .and_then(|date| date.and_hms_opt(17, 0, 0))
        .unwrap()
}

fn seed(ctx: &mut DbContext) -> (i64, i64) {
    let project_id = ProjectService::new(ctx)
        .create(Project::new("Warehouse", day(1), day(31)))
        .unwrap()
        .id;
    let employee_id = EmployeeService::new(ctx)
        .create(Employee::new("Can", "Ozturk"))
        .unwrap()
        .id;
    (project_id, employee_id)
}

#[test]
fn create_and_list_by_owner() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (project_id, employee_id) = seed(&mut ctx);

    let mut service = TaskService::new(&mut ctx);
    let first = service
        .create(Task::new(project_id, employee_id, "Inventory", "Open", day(10)))
        .unwrap();
    let second = service
        .create(Task::new(project_id, employee_id, "Audit", "Open", day(20)))
        .unwrap();
    assert!(second.id > first.id);

    assert_eq!(service.get(first.id).unwrap(), Some(first.clone()));
    assert_eq!(service.list_for_project(project_id).unwrap().len(), 2);
    assert_eq!(
        service.list_for_employee(employee_id).unwrap(),
        vec![first, second]
    );
}

#[test]
fn create_rejects_blank_fields_and_unknown_owners() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (project_id, employee_id) = seed(&mut ctx);
    let mut service = TaskService::new(&mut ctx);

    let err = service
        .create(Task::new(project_id, employee_id, "", "Open", day(2)))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankTaskTitle)
    ));

    let err = service
        .create(Task::new(project_id + 9, employee_id, "Lost", "Open", day(2)))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "project",
            ..
        }
    ));

    let err = service
        .create(Task::new(project_id, employee_id + 9, "Lost", "Open", day(2)))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "employee",
            ..
        }
    ));
}

#[test]
fn set_status_updates_existing_task() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (project_id, employee_id) = seed(&mut ctx);
    let mut service = TaskService::new(&mut ctx);
    let task = service
        .create(Task::new(project_id, employee_id, "Ship", "Open", day(5)))
        .unwrap();

    let updated = service.set_status(task.id, "Completed").unwrap();
    assert!(updated.is_completed());
    assert!(service.get(task.id).unwrap().unwrap().is_completed());

    assert!(matches!(
        service.set_status(task.id, "  ").unwrap_err(),
        ServiceError::Validation(ValidationError::BlankTaskStatus)
    ));
    assert!(matches!(
        service.set_status(task.id + 1, "Open").unwrap_err(),
        ServiceError::NotFound { entity: "task", .. }
    ));
}

#[test]
fn delete_task_and_cascade_from_employee() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (project_id, employee_id) = seed(&mut ctx);
    let (kept, dropped) = {
        let mut service = TaskService::new(&mut ctx);
        let kept = service
            .create(Task::new(project_id, employee_id, "Keep", "Open", day(3)))
            .unwrap();
        let dropped = service
            .create(Task::new(project_id, employee_id, "Drop", "Open", day(4)))
            .unwrap();
        (kept, dropped)
    };

    let mut service = TaskService::new(&mut ctx);
    assert!(service.delete(dropped.id).unwrap());
    assert!(!service.delete(dropped.id).unwrap());

    assert!(EmployeeService::new(&mut ctx).delete(employee_id).unwrap());
    assert!(TaskService::new(&mut ctx).get(kept.id).unwrap().is_none());
}

#[test]
fn end_date_keeps_microseconds_through_the_store() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (project_id, employee_id) = seed(&mut ctx);
    let end = day(12) + Duration::microseconds(654_321);

    let mut service = TaskService::new(&mut ctx);
    let created = service
        .create(Task::new(project_id, employee_id, "Timestamped", "Open", end))
        .unwrap();

    let loaded = service.get(created.id).unwrap().unwrap();
    assert_eq!(loaded.end_date, end);
    assert_eq!(loaded, created);
}
