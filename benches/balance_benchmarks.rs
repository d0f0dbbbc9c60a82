//! Performance benchmarks for the Jornada Engine.
//!
//! Measures the hour bag and vacation calculations over a year of confirmed
//! weekly records, and the annual report endpoint over growing staff sizes.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use jornada_engine::api::{AppState, create_router};
use jornada_engine::calculation::{calculate_employee_vacations, get_final_balances};
use jornada_engine::config::{ConfigLoader, HrConfig};
use jornada_engine::models::{
    DailyData, Employee, EmployeeWeek, EmploymentPeriod, Role, WeekId, WeeklyRecord, is_weekend,
};
use jornada_engine::store::Store;

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use tower::ServiceExt;

fn load_config() -> HrConfig {
    ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_config()
}

fn create_employee(id: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Empleado {}", id),
        email: format!("{}@bench.es", id),
        group_id: Some("tienda".to_string()),
        role: Role::Employee,
        employment_periods: vec![EmploymentPeriod {
            id: format!("{}_p1", id),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            contract_type: "full_time".to_string(),
            weekly_hours: Decimal::new(40, 0),
            opening_balances: Default::default(),
            scheduled_absences: vec![],
        }],
    }
}

/// Creates `weeks` confirmed weeks of 2025 with 8.5 hours on every workday.
fn create_records(employee_ids: &[String], weeks: u32) -> Vec<WeeklyRecord> {
    (1..=weeks)
        .filter_map(|week| WeekId::new(2025, week))
        .map(|week_id| {
            let mut record = WeeklyRecord::new(week_id);
            for employee_id in employee_ids {
                let mut week = EmployeeWeek {
                    confirmed: true,
                    ..EmployeeWeek::default()
                };
                for date in week_id.range().iter_days().filter(|d| !is_weekend(*d)) {
                    week.days.insert(
                        date,
                        DailyData {
                            worked_hours: Decimal::new(85, 1),
                            ..Default::default()
                        },
                    );
                }
                record.employees.insert(employee_id.clone(), week);
            }
            record
        })
        .collect()
}

/// Benchmark: Balances and vacations for one employee over a full year.
fn bench_single_employee_year(c: &mut Criterion) {
    let config = load_config();
    let employee = create_employee("e1");
    let records = create_records(&[employee.id.clone()], 52);

    c.bench_function("balances_full_year", |b| {
        b.iter(|| {
            black_box(get_final_balances(&employee, 2025, black_box(&records), &config).unwrap())
        })
    });

    c.bench_function("vacations_full_year", |b| {
        b.iter(|| {
            black_box(
                calculate_employee_vacations(&employee, 2025, black_box(&records), &config)
                    .unwrap(),
            )
        })
    });
}

/// Benchmark: Week counts to understand scaling behavior.
fn bench_week_scaling(c: &mut Criterion) {
    let config = load_config();
    let employee = create_employee("e1");

    let mut group = c.benchmark_group("week_scaling");
    for weeks in [1u32, 4, 13, 26, 52].iter() {
        let records = create_records(&[employee.id.clone()], *weeks);
        group.throughput(Throughput::Elements(*weeks as u64));
        group.bench_with_input(BenchmarkId::new("weeks", weeks), weeks, |b, _| {
            b.iter(|| black_box(get_final_balances(&employee, 2025, &records, &config).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark: Annual report endpoint across staff sizes.
fn bench_annual_report(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("annual_report");
    group.sample_size(10);

    for staff in [10usize, 50].iter() {
        let employees: Vec<Employee> = (0..*staff)
            .map(|i| create_employee(&format!("e{:03}", i)))
            .collect();
        let ids: Vec<String> = employees.iter().map(|e| e.id.clone()).collect();
        let records = create_records(&ids, 52);

        let store = Store::in_memory(load_config());
        rt.block_on(store.mutate(|data| {
            for employee in &employees {
                data.employees.insert(employee.id.clone(), employee.clone());
            }
            for record in &records {
                data.weekly_records.insert(record.week_id, record.clone());
            }
            Ok(())
        }))
        .unwrap();
        let router = create_router(AppState::new(store));

        group.throughput(Throughput::Elements(*staff as u64));
        group.bench_with_input(BenchmarkId::new("employees", staff), staff, |b, _| {
            b.to_async(&rt).iter(|| async {
                let router = router.clone();
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("GET")
                            .uri("/reports/balances/2025")
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_employee_year,
    bench_week_scaling,
    bench_annual_report,
);
criterion_main!(benches);
