use chrono::Local;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sensorlink::{
    web::models::NewReading, CancelFlag, Command, DeviceReply, IntervalSampler, ReadingStore,
    Report, RunConfig, Sample, ScriptedLink,
};
use std::time::Duration;

fn samples(count: u32) -> Vec<Sample> {
    let now = Local::now();
    (1..=count)
        .map(|sequence| Sample {
            sequence,
            value: 20.0 + f64::from(sequence % 7) * 0.25,
            elapsed: Duration::from_secs(u64::from(sequence) * 30),
            captured_at: now,
        })
        .collect()
}

/// Benchmark reply parsing
fn bench_reply_parsing(c: &mut Criterion) {
    c.bench_function("reply_value_numeric", |b| {
        b.iter(|| DeviceReply::from_line("23.75\r\n").value())
    });

    c.bench_function("reply_value_text", |b| {
        b.iter(|| DeviceReply::from_line("Sound meter ON\r\n").value())
    });

    c.bench_function("command_from_str", |b| {
        b.iter(|| "read-temperature".parse::<Command>().expect("Should parse"))
    });
}

/// Benchmark a full sampling run against a scripted device
fn bench_sampling_run(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("Should create tokio runtime");

    for iterations in [10u32, 100, 1000].iter() {
        c.bench_with_input(
            BenchmarkId::new("sampling_run", iterations),
            iterations,
            |b, &iterations| {
                b.to_async(&rt).iter(|| async move {
                    let replies = (0..iterations).map(|i| {
                        if i % 5 == 0 {
                            "ERR".to_string()
                        } else {
                            format!("{:.2}", 20.0 + f64::from(i % 10) * 0.1)
                        }
                    });
                    let mut link = ScriptedLink::new(replies);
                    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

                    IntervalSampler::new()
                        .run(&mut link, &RunConfig::new(iterations, 60), &tx, &CancelFlag::new())
                        .await
                        .expect("Should complete run")
                })
            },
        );
    }
}

/// Benchmark report export
fn bench_report_export(c: &mut Criterion) {
    for count in [10u32, 120, 1000].iter() {
        let report = Report::from_samples(&samples(*count), 21.0);

        c.bench_with_input(BenchmarkId::new("report_xlsx", count), &report, |b, report| {
            b.iter(|| report.to_xlsx().expect("Should build xlsx"))
        });

        c.bench_with_input(BenchmarkId::new("report_csv", count), &report, |b, report| {
            b.iter(|| report.to_csv().expect("Should build csv"))
        });
    }
}

/// Benchmark reading store inserts and aggregates
fn bench_reading_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    let store = ReadingStore::new();
    rt.block_on(async {
        for i in 0..1000 {
            store
                .insert(NewReading {
                    temperature: 18.0 + f64::from(i % 50) * 0.1,
                    co2: Some(400 + i % 300),
                    noise_db: None,
                    light_lux: Some(f64::from(i)),
                    timestamp: None,
                })
                .await;
        }
    });

    c.bench_function("store_stats_1000", |b| {
        b.to_async(&rt).iter(|| async { store.stats(Default::default()).await })
    });

    c.bench_function("store_insert", |b| {
        b.to_async(&rt).iter(|| async {
            store
                .insert(NewReading {
                    temperature: 21.0,
                    co2: None,
                    noise_db: Some(40.0),
                    light_lux: None,
                    timestamp: None,
                })
                .await
        })
    });
}

criterion_group!(
    benches,
    bench_reply_parsing,
    bench_sampling_run,
    bench_report_export,
    bench_reading_store
);

criterion_main!(benches);
