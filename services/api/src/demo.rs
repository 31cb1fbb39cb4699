use crate::infra::InMemoryApplicationRepository;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use staffdesk::config::PaginationConfig;
use staffdesk::error::AppError;
use staffdesk::workflows::applications::{
    Application, ApplicationId, ApplicationService, ApplicationStatus, ApplicationType,
    EmployeeId, ListingQuery, NewApplication,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Statistics year. Defaults to the current year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Employee whose applications are listed and summarised.
    #[arg(long, default_value_t = 1)]
    pub(crate) employee: i64,
    /// Only list leave whose period starts on or after this time (YYYY-MM-DDTHH:MM).
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) from: Option<NaiveDateTime>,
    /// Only list leave whose period ends on or before this time (YYYY-MM-DDTHH:MM).
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) to: Option<NaiveDateTime>,
}

struct Seed {
    employee: i64,
    application_type: ApplicationType,
    status: ApplicationStatus,
    month: u32,
    day: u32,
    start_hour: u32,
    hours: i64,
}

#[rustfmt::skip]
const SEEDS: &[Seed] = &[
    Seed { employee: 1, application_type: ApplicationType::Leave, status: ApplicationStatus::Approved, month: 2, day: 12, start_hour: 0, hours: 48 },
    Seed { employee: 1, application_type: ApplicationType::Leave, status: ApplicationStatus::Approved, month: 6, day: 3, start_hour: 9, hours: 4 },
    Seed { employee: 1, application_type: ApplicationType::Leave, status: ApplicationStatus::Rejected, month: 8, day: 19, start_hour: 0, hours: 72 },
    Seed { employee: 1, application_type: ApplicationType::Overtime, status: ApplicationStatus::Requested, month: 3, day: 7, start_hour: 18, hours: 3 },
    Seed { employee: 2, application_type: ApplicationType::Overtime, status: ApplicationStatus::Approved, month: 3, day: 8, start_hour: 18, hours: 2 },
    Seed { employee: 1, application_type: ApplicationType::Overtime, status: ApplicationStatus::Requested, month: 9, day: 2, start_hour: 19, hours: 2 },
    Seed { employee: 1, application_type: ApplicationType::Remote, status: ApplicationStatus::Approved, month: 4, day: 15, start_hour: 0, hours: 24 },
    Seed { employee: 1, application_type: ApplicationType::Remote, status: ApplicationStatus::Requested, month: 10, day: 1, start_hour: 0, hours: 36 },
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        year,
        employee,
        from,
        to,
    } = args;

    let year = year.unwrap_or_else(|| Local::now().year());
    let employee_id = EmployeeId(employee);

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationService::new(repository.clone(), PaginationConfig::default());

    println!("Application desk demo for employee {employee} ({year})");
    let mut imported = Vec::new();
    for seed in SEEDS {
        let Some((record, created_date)) = seed_record(seed, year) else {
            println!(
                "  Seed skipped: {year}-{:02}-{:02} is out of range",
                seed.month, seed.day
            );
            continue;
        };
        match repository.import(record, created_date) {
            Ok(id) => imported.push(id),
            Err(err) => println!("  Seed skipped: {err}"),
        }
    }
    println!("- Imported {} historical applications", imported.len());

    let filed = service.create_application(NewApplication {
        title: "Team offsite".to_string(),
        employee_id,
        application_type: ApplicationType::Leave,
        start_date: Local::now().naive_local(),
        end_date: Local::now().naive_local() + chrono::Duration::days(1),
        note: "Filed during the demo".to_string(),
    });
    println!("- Filed a new leave application: {}", if filed { "ok" } else { "failed" });

    if let Some(id) = imported.first().copied() {
        report_transition(&service, id, ApplicationStatus::Requested);
        report_transition(&service, id, ApplicationStatus::Cancelled);
    }

    let mut query = ListingQuery::new(employee_id, ApplicationType::Leave);
    query.from = from;
    query.to = to;
    let listing = service.list_applications(&query)?;
    match serde_json::to_string_pretty(&listing) {
        Ok(json) => println!("\nLeave applications:\n{json}"),
        Err(err) => println!("\nLeave applications unavailable: {err}"),
    }

    let stats = service.yearly_statistics(employee_id, year)?;
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("\nYearly statistics:\n{json}"),
        Err(err) => println!("\nYearly statistics unavailable: {err}"),
    }

    Ok(())
}

fn report_transition(
    service: &ApplicationService<InMemoryApplicationRepository>,
    id: ApplicationId,
    requested: ApplicationStatus,
) {
    match service.update_application_status(id, requested) {
        Ok(()) => println!("- Application {id} moved to {requested}"),
        Err(err) => println!("- Application {id} stayed put: {err}"),
    }
}

fn seed_record(seed: &Seed, year: i32) -> Option<(Application, NaiveDateTime)> {
    let start = NaiveDate::from_ymd_opt(year, seed.month, seed.day)?
        .and_hms_opt(seed.start_hour, 0, 0)?;
    let end = start.checked_add_signed(chrono::Duration::hours(seed.hours))?;
    let record = Application {
        id: ApplicationId(0),
        employee_id: EmployeeId(seed.employee),
        application_type: seed.application_type,
        status: seed.status,
        name: format!("{} request", seed.application_type.label()),
        note: String::new(),
        start_date: start,
        end_date: end,
        created_date: start,
    };
    Some((record, start))
}
