use std::collections::BTreeMap;
use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};

use svs_rust::api::{
    ClientRule, DayWindow, ScheduleRequest, SupervisorConfig, TimeBlock, Weekday,
};
use svs_rust::scheduler::generate;

fn month_request(client_count: usize) -> ScheduleRequest {
    let weekdays = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    let clients = (0..client_count)
        .map(|i| {
            let day = weekdays[i % weekdays.len()];
            let other = weekdays[(i + 2) % weekdays.len()];
            ClientRule {
                id: format!("client-{}", i),
                monthly_hours: 4.0 + (i % 5) as f64,
                min_session_mins: Some(30 + (i % 3) as u32 * 15),
                windows: vec![
                    DayWindow {
                        day,
                        blocks: vec![TimeBlock { start: 540, end: 780 }],
                    },
                    DayWindow {
                        day: other,
                        blocks: vec![TimeBlock { start: 600, end: 900 }],
                    },
                ],
                max_sessions_per_week: Some(3),
                preferred_day_slots: vec![vec![day]],
            }
        })
        .collect();

    ScheduleRequest {
        start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        clients,
        supervisor: SupervisorConfig {
            active_days: weekdays.to_vec(),
            unavailable_days: vec![NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()],
            daily_avail: weekdays
                .iter()
                .map(|day| DayWindow {
                    day: *day,
                    blocks: vec![TimeBlock { start: 480, end: 1020 }],
                })
                .collect(),
            date_overrides: BTreeMap::from([(
                NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
                vec![TimeBlock { start: 480, end: 600 }],
            )]),
            rounding_minutes: 15,
            allow_sub_hour_if_unavoidable: true,
            max_sessions_per_week_per_client: None,
        },
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    let small = month_request(4);
    group.bench_function("month_4_clients", |b| {
        b.iter(|| generate(black_box(&small)));
    });

    let large = month_request(24);
    group.bench_function("month_24_clients", |b| {
        b.iter(|| generate(black_box(&large)));
    });

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
