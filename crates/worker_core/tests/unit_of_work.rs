use chrono::{NaiveDate, NaiveDateTime};
use worker_core::repo::assignment_repo::AssignmentRepository;
use worker_core::repo::employee_repo::EmployeeRepository;
use worker_core::repo::project_repo::{ProjectRepository, ProjectWindow};
use worker_core::repo::task_repo::TaskRepository;
use worker_core::{
    Assignment, DbContext, Employee, EmployeeIncludes, PendingChange, Project, ProjectIncludes,
    Task,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap()
}

fn seed_pair(ctx: &mut DbContext) -> (i64, i64) {
    ctx.add_employee(Employee::new("Jane", "Smith"));
    ctx.add_project(Project::new(
        "Important Project",
        date(2024, 1, 1),
        date(2024, 3, 1),
    ));
    let outcomes = ctx.save_changes().unwrap();
    (
        outcomes[0].inserted_id.unwrap(),
        outcomes[1].inserted_id.unwrap(),
    )
}

#[test]
fn added_employee_is_persisted_with_assigned_id() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let mut employee = Employee::new("John", "Doe");
    employee.completed_task_count = Some(5);
    employee.overdue_task_count = Some(2);
    ctx.add_employee(employee);

    let outcomes = ctx.save_changes().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(!ctx.has_changes());

    let id = outcomes[0].inserted_id.unwrap();
    let saved = ctx
        .employees()
        .get_employee(id, EmployeeIncludes::NONE)
        .unwrap()
        .unwrap();
    assert_eq!(saved.first_name, "John");
    assert_eq!(saved.last_name, "Doe");
    assert_eq!(saved.completed_task_count, Some(5));
    assert_eq!(saved.overdue_task_count, Some(2));
}

#[test]
fn nullable_fields_round_trip_as_none() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    ctx.add_project(Project::new("Test Project", date(2024, 1, 1), date(2024, 1, 31)));
    let id = ctx.save_changes().unwrap()[0].inserted_id.unwrap();

    let project = ctx
        .projects()
        .get_project(id, ProjectIncludes::NONE)
        .unwrap()
        .unwrap();
    assert_eq!(project.delay_days, None);
    assert_eq!(project.start_date, date(2024, 1, 1));
    assert_eq!(project.end_date, date(2024, 1, 31));
}

#[test]
fn assignment_links_appear_on_both_sides_when_included() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (employee_id, project_id) = seed_pair(&mut ctx);

    ctx.add_assignment(Assignment::new(project_id, employee_id));
    ctx.save_changes().unwrap();

    let employee = ctx
        .employees()
        .get_employee(employee_id, EmployeeIncludes::ALL)
        .unwrap()
        .unwrap();
    assert_eq!(
        employee.assignments,
        vec![Assignment::new(project_id, employee_id)]
    );

    let project = ctx
        .projects()
        .get_project(project_id, ProjectIncludes::ALL)
        .unwrap()
        .unwrap();
    assert_eq!(
        project.assignments,
        vec![Assignment::new(project_id, employee_id)]
    );

    let without_links = ctx
        .employees()
        .get_employee(employee_id, EmployeeIncludes::NONE)
        .unwrap()
        .unwrap();
    assert!(without_links.assignments.is_empty());
}

#[test]
fn failed_commit_rolls_back_and_keeps_pending_changes() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    ctx.add_employee(Employee::new("Orphan", "Link"));
    ctx.add_assignment(Assignment::new(404, 404));

    assert!(ctx.save_changes().is_err());

    assert_eq!(ctx.pending_changes().len(), 2);
    assert!(matches!(
        ctx.pending_changes()[1],
        PendingChange::AddAssignment(_)
    ));
    assert!(ctx
        .employees()
        .list_employees(EmployeeIncludes::NONE)
        .unwrap()
        .is_empty());
}

#[test]
fn pending_changes_can_be_corrected_and_retried() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (employee_id, _) = seed_pair(&mut ctx);

    ctx.add_assignment(Assignment::new(999, employee_id));
    assert!(ctx.save_changes().is_err());

    ctx.discard_changes();
    ctx.update_employee(Employee {
        id: employee_id,
        ..Employee::new("Janet", "Smith")
    });
    let outcomes = ctx.save_changes().unwrap();
    assert_eq!(outcomes[0].rows_affected, 1);
}

#[test]
fn removing_project_cascades_to_tasks_and_links() {
    let mut ctx = DbContext::open_in_memory().unwrap();
    let (employee_id, project_id) = seed_pair(&mut ctx);

    ctx.add_assignment(Assignment::new(project_id, employee_id));
    ctx.add_task(Task::new(
        project_id,
        employee_id,
        "Draft plan",
        "Open",
        date(2024, 2, 1),
    ));
    ctx.save_changes().unwrap();

    ctx.remove_project(project_id);
    let outcomes = ctx.save_changes().unwrap();
    assert_eq!(outcomes[0].rows_affected, 1);

    assert!(ctx
        .assignments()
        .list_for_employee(employee_id)
        .unwrap()
        .is_empty());
    assert!(ctx.tasks().get_task(1).unwrap().is_none());
    assert!(ctx
        .projects()
        .list_projects(ProjectWindow::All, ProjectIncludes::NONE)
        .unwrap()
        .is_empty());
}

#[test]
fn file_backed_context_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("worker.sqlite3");

    {
        let mut ctx = DbContext::open(&path).unwrap();
        ctx.add_employee(Employee::new("Ali", "Veli"));
        ctx.save_changes().unwrap();
    }

    let ctx = DbContext::open(&path).unwrap();
    let employees = ctx
        .employees()
        .list_employees(EmployeeIncludes::NONE)
        .unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].full_name(), "Ali Veli");
}
