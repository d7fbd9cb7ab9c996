//! Command-line report over the worker store.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the configured database.
//! - Print one line per employee and per project with the derived figures.

use log::error;
use std::process::ExitCode;
use worker_core::db::open_db_with_timeout;
use worker_core::{init_logging, AppConfig, DbContext, EmployeeService, ProjectService};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("worker_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    let log_dir = config
        .resolved_log_dir()
        .map_err(|err| format!("cannot resolve log directory: {err}"))?;
    init_logging(&config.log_level, &log_dir.to_string_lossy())?;

    let conn =
        open_db_with_timeout(&config.db_path, config.busy_timeout).map_err(|err| err.to_string())?;
    let mut ctx = DbContext::new(conn);

    println!("worker_core version={}", worker_core::core_version());
    println!("db_path={}", config.db_path.display());

    let employees = EmployeeService::new(&mut ctx);
    for employee in employees.list().map_err(|err| err.to_string())? {
        let score = employees
            .performance_score(employee.id)
            .map_err(|err| err.to_string())?;
        println!(
            "employee id={} name=\"{}\" projects={} score={}",
            employee.id,
            employee.full_name(),
            employee.assignments.len(),
            score.round_dp(2)
        );
    }

    let projects = ProjectService::new(&mut ctx);
    for project in projects.list().map_err(|err| err.to_string())? {
        let delay = projects
            .calculate_delay(project.id)
            .map_err(|err| err.to_string())?;
        let completion = projects
            .completion_percentage(project.id)
            .map_err(|err| err.to_string())?;
        println!(
            "project id={} name=\"{}\" tasks={} completion={} delay_days={}",
            project.id,
            project.name,
            project.tasks.len(),
            completion.round_dp(2),
            delay
        );
    }

    Ok(())
}
