use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use worker_core::{
    DbContext, Employee, EmployeeService, FixedClock, Project, ProjectService, ServiceError, Task,
    TaskService, ValidationError, TASK_STATUS_COMPLETED,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .unwrap()
}

fn clock() -> FixedClock {
    FixedClock(at(2024, 6, 15, 12))
}

fn seed_project(ctx: &mut DbContext) -> i64 {
    ProjectService::new(ctx)
        .create(Project::new("Payroll", at(2024, 1, 1, 0), at(2024, 12, 31, 0)))
        .unwrap()
        .id
}

fn add_task(
    ctx: &mut DbContext,
    project_id: i64,
    employee_id: i64,
    status: &str,
    end: NaiveDateTime,
) {
    TaskService::new(ctx)
        .create(Task::new(project_id, employee_id, "work item", status, end))
        .unwrap();
}

#[test]
fn create_returns_supplied_fields_and_assigned_id() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let mut service = EmployeeService::new(&mut ctx);

    let mut input = Employee::new("Ali", "Veli");
    input.completed_task_count = Some(10);
    let created = service.create(input).unwrap();

    assert!(created.id > 0);
    assert_eq!(created.first_name, "Ali");
    assert_eq!(created.last_name, "Veli");
    assert_eq!(created.completed_task_count, Some(10));
    assert_eq!(created.overdue_task_count, None);

    let loaded = service.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_blank_names_before_touching_store() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    {
        let mut service = EmployeeService::new(&mut ctx);

        let err = service.create(Employee::new("   ", "Doe")).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::BlankFirstName)
        ));

        let err = service.create(Employee::new("John", "")).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::BlankLastName)
        ));

        assert!(service.list().unwrap().is_empty());
    }
    assert!(!ctx.has_changes());
}

#[test]
fn get_missing_employee_returns_none() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    assert!(EmployeeService::new(&mut ctx).get(12).unwrap().is_none());
}

#[test]
fn update_overwrites_names_and_counters_only() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let project_id = seed_project(&mut ctx);
    let created = EmployeeService::new(&mut ctx)
        .create(Employee::new("John", "Doe"))
        .unwrap();
    ProjectService::new(&mut ctx)
        .assign_employee(project_id, created.id)
        .unwrap();

    let mut service = EmployeeService::new(&mut ctx);
    let mut changes = Employee::new("Johnny", "Doe-Smith");
    changes.id = created.id;
    changes.completed_task_count = Some(3);
    changes.overdue_task_count = Some(0);
    let updated = service.update(&changes).unwrap();

    assert_eq!(updated.first_name, "Johnny");
    assert_eq!(updated.overdue_task_count, Some(0));

    let reloaded = service.get(created.id).unwrap().unwrap();
    assert_eq!(reloaded.last_name, "Doe-Smith");
    assert_eq!(reloaded.completed_task_count, Some(3));
    assert_eq!(reloaded.assignments.len(), 1);
}

#[test]
fn update_missing_employee_is_not_found() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let mut ghost = Employee::new("No", "Body");
    ghost.id = 77;

    let err = EmployeeService::new(&mut ctx).update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "employee",
            id: 77
        }
    ));
}

#[test]
fn delete_reports_presence_without_failing_on_missing_rows() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let mut service = EmployeeService::new(&mut ctx);
    let created = service.create(Employee::new("Temp", "Worker")).unwrap();

    assert!(service.delete(created.id).unwrap());
    assert!(!service.delete(created.id).unwrap());
    assert!(service.get(created.id).unwrap().is_none());
}

#[test]
fn list_populates_assignment_links() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let project_id = seed_project(&mut ctx);
    let first = EmployeeService::new(&mut ctx)
        .create(Employee::new("A", "One"))
        .unwrap();
    EmployeeService::new(&mut ctx)
        .create(Employee::new("B", "Two"))
        .unwrap();
    ProjectService::new(&mut ctx)
        .assign_employee(project_id, first.id)
        .unwrap();

    let employees = EmployeeService::new(&mut ctx).list().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].assignments.len(), 1);
    assert_eq!(employees[0].assignments[0].project_id, project_id);
    assert!(employees[1].assignments.is_empty());
}

#[test]
fn task_counts_use_exact_status_and_injected_clock() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let project_id = seed_project(&mut ctx);
    let employee_id = EmployeeService::new(&mut ctx)
        .create(Employee::new("Ayse", "Kaya"))
        .unwrap()
        .id;
    let other_id = EmployeeService::new(&mut ctx)
        .create(Employee::new("Other", "Person"))
        .unwrap()
        .id;

    add_task(&mut ctx, project_id, employee_id, TASK_STATUS_COMPLETED, at(2024, 6, 1, 0));
    add_task(&mut ctx, project_id, employee_id, "completed", at(2024, 6, 1, 0));
    add_task(&mut ctx, project_id, employee_id, "InProgress", at(2024, 6, 15, 11));
    add_task(&mut ctx, project_id, employee_id, "InProgress", at(2024, 6, 15, 13));
    add_task(&mut ctx, project_id, other_id, "InProgress", at(2024, 1, 1, 0));

    let service = EmployeeService::with_clock(&mut ctx, clock());
    assert_eq!(service.completed_task_count(employee_id).unwrap(), 1);
    // "completed" (wrong case) plus the task that ended an hour ago
    assert_eq!(service.overdue_task_count(employee_id).unwrap(), 2);
}

#[test]
fn performance_score_for_five_completed_and_two_overdue() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let project_id = seed_project(&mut ctx);
    let employee_id = EmployeeService::new(&mut ctx)
        .create(Employee::new("Mehmet", "Yilmaz"))
        .unwrap()
        .id;

    for _ in 0..5 {
        add_task(&mut ctx, project_id, employee_id, TASK_STATUS_COMPLETED, at(2024, 5, 1, 0));
    }
    for _ in 0..2 {
        add_task(&mut ctx, project_id, employee_id, "Open", at(2024, 5, 1, 0));
    }
    add_task(&mut ctx, project_id, employee_id, "Open", at(2024, 7, 1, 0));

    let service = EmployeeService::with_clock(&mut ctx, clock());
    let score = service.performance_score(employee_id).unwrap();
    assert_eq!(score.round_dp(2), Decimal::new(7143, 2));
    assert_eq!(
        score,
        Decimal::from(5) / Decimal::from(7) * Decimal::ONE_HUNDRED
    );
}

#[test]
fn performance_score_is_zero_without_counted_tasks() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let project_id = seed_project(&mut ctx);
    let employee_id = EmployeeService::new(&mut ctx)
        .create(Employee::new("New", "Hire"))
        .unwrap()
        .id;
    add_task(&mut ctx, project_id, employee_id, "Open", at(2025, 1, 1, 0));

    let service = EmployeeService::with_clock(&mut ctx, clock());
    assert_eq!(service.performance_score(employee_id).unwrap(), Decimal::ZERO);
    assert_eq!(service.performance_score(9999).unwrap(), Decimal::ZERO);
}
