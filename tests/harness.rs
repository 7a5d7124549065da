use std::{
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
    time::{Duration, Instant},
};
use worker_harness::{run, Error, Harness, WorkerDescriptor};

fn ids(report: &worker_harness::HarnessReport) -> Vec<u64> {
    report.iter().map(|result| result.id).collect()
}

#[test]
fn three_workers_one_yielding() {
    let step_delay = Duration::from_millis(100);
    let descriptors = [
        WorkerDescriptor::new(1, 10, step_delay),
        WorkerDescriptor::new(2, 10, step_delay).yielding(),
        WorkerDescriptor::new(3, 10, step_delay),
    ];

    let report = run(&descriptors).unwrap();
    assert_eq!(ids(&report), [1, 2, 3]);

    for result in &report {
        assert!(result.completed);
        assert_eq!(result.steps, 10);
        assert!(result.elapsed >= Duration::from_millis(1000), "{:?}", result);
        assert!(result.elapsed < Duration::from_millis(2000), "{:?}", result);
    }
}

#[test]
fn elapsed_covers_every_sleep() {
    let descriptors = [
        WorkerDescriptor::new(1, 5, Duration::from_millis(20)),
        WorkerDescriptor::new(2, 2, Duration::from_millis(30)).yielding(),
    ];

    let report = run(&descriptors).unwrap();
    for (descriptor, result) in descriptors.iter().zip(&report) {
        let min = descriptor.min_duration();
        assert!(result.elapsed >= min, "{:?}", result);
        assert!(result.elapsed < min * 2 + Duration::from_millis(100), "{:?}", result);
    }
}

#[test]
fn zero_iterations_do_not_wait() {
    let descriptors = [
        WorkerDescriptor::new(1, 3, Duration::from_millis(50)),
        WorkerDescriptor::new(2, 0, Duration::from_millis(50)),
    ];

    let report = run(&descriptors).unwrap();
    let idle = report.find(2).unwrap();
    assert!(idle.completed);
    assert_eq!(idle.steps, 0);
    assert!(idle.elapsed < Duration::from_millis(50));

    let busy = report.find(1).unwrap();
    assert!(busy.completed);
    assert!(busy.elapsed >= Duration::from_millis(150));
}

#[test]
fn workers_run_in_parallel() {
    let step_delay = Duration::from_millis(100);
    let descriptors = (0..8)
        .map(|id| WorkerDescriptor::new(id, 1, step_delay))
        .collect::<Vec<_>>();

    let started = Instant::now();
    let report = run(&descriptors).unwrap();
    let total = started.elapsed();

    assert_eq!(report.len(), 8);
    assert!(total >= report.max_elapsed());
    assert!(total < step_delay * 5, "took {:?}", total);
}

#[test]
fn repeated_runs_share_structure() {
    let harness = Harness::default();
    let descriptors = [
        WorkerDescriptor::new(5, 2, Duration::from_millis(5)),
        WorkerDescriptor::new(6, 1, Duration::from_millis(5)).yielding(),
    ];

    let first = harness.run(&descriptors).unwrap();
    let second = harness.run(&descriptors).unwrap();
    assert_eq!(ids(&first), ids(&second));
    assert!(first.all_completed() && second.all_completed());
}

#[test]
fn failing_worker_does_not_affect_siblings() {
    let report = Harness::builder()
        .on_step(|id, step| {
            if id == 2 && step == 3 {
                panic!("injected fault in worker {}", id);
            }
        })
        .build()
        .run(&[
            WorkerDescriptor::new(1, 10, Duration::from_millis(20)),
            WorkerDescriptor::new(2, 10, Duration::from_millis(20)),
            WorkerDescriptor::new(3, 10, Duration::from_millis(20)).yielding(),
        ])
        .unwrap();

    assert_eq!(ids(&report), [1, 2, 3]);

    let failed = report.find(2).unwrap();
    assert!(!failed.completed);
    assert_eq!(failed.steps, 3);
    assert!(failed.elapsed >= Duration::from_millis(60));
    assert!(failed.elapsed < Duration::from_millis(200));

    for id in [1, 3] {
        let result = report.find(id).unwrap();
        assert!(result.completed);
        assert_eq!(result.steps, 10);
        assert!(result.elapsed >= Duration::from_millis(200));
    }
}

#[test]
fn panic_in_start_hook_is_timed_from_thread_entry() {
    let report = Harness::builder()
        .on_thread_start(|id| {
            if id == 2 {
                panic!("thread setup failed");
            }
        })
        .build()
        .run(&[
            WorkerDescriptor::new(1, 5, Duration::from_millis(50)),
            WorkerDescriptor::new(2, 5, Duration::from_millis(50)),
        ])
        .unwrap();

    let busy = report.find(1).unwrap();
    assert!(busy.completed);
    assert!(busy.elapsed >= Duration::from_millis(250));

    let failed = report.find(2).unwrap();
    assert!(!failed.completed);
    assert_eq!(failed.steps, 0);
    assert!(failed.elapsed < Duration::from_millis(50), "{:?}", failed);
}

#[test]
fn panic_in_stop_hook_keeps_loop_result() {
    let report = Harness::builder()
        .on_thread_stop(|_| panic!("thread teardown failed"))
        .build()
        .run(&[WorkerDescriptor::new(1, 3, Duration::from_millis(10))])
        .unwrap();

    let result = report.find(1).unwrap();
    assert!(result.completed);
    assert_eq!(result.steps, 3);
    assert!(result.elapsed >= Duration::from_millis(30));
}

#[test]
fn default_harness_has_no_thread_cap() {
    let descriptors = (0..601)
        .map(|id| WorkerDescriptor::new(id, 0, Duration::ZERO))
        .collect::<Vec<_>>();

    let report = Harness::builder()
        .stack_size(64 * 1024)
        .build()
        .run(&descriptors)
        .unwrap();
    assert_eq!(report.len(), 601);
    assert!(report.all_completed());
}

#[test]
fn duplicate_ids_spawn_nothing() {
    let started = Arc::new(AtomicUsize::new(0));
    let harness = {
        let started = started.clone();
        Harness::builder()
            .on_thread_start(move |_| {
                started.fetch_add(1, Ordering::SeqCst);
            })
            .build()
    };

    let result = harness.run(&[
        WorkerDescriptor::new(3, 1, Duration::ZERO),
        WorkerDescriptor::new(3, 1, Duration::ZERO),
    ]);

    assert!(matches!(result, Err(Error::DuplicateId(3))));
    assert_eq!(started.load(Ordering::SeqCst), 0);
}

#[test]
fn spawn_failure_joins_started_workers() {
    let started = Arc::new(AtomicUsize::new(0));
    let stopped = Arc::new(AtomicUsize::new(0));
    let steps = Arc::new(AtomicUsize::new(0));

    let harness = {
        let (started, stopped, steps) = (started.clone(), stopped.clone(), steps.clone());
        Harness::builder()
            .max_threads(2)
            .on_thread_start(move |_| {
                started.fetch_add(1, Ordering::SeqCst);
            })
            .on_thread_stop(move |_| {
                stopped.fetch_add(1, Ordering::SeqCst);
            })
            .on_step(move |_, _| {
                steps.fetch_add(1, Ordering::SeqCst);
            })
            .build()
    };

    let descriptors = (1..=3)
        .map(|id| WorkerDescriptor::new(id, 5, Duration::from_millis(10)))
        .collect::<Vec<_>>();

    match harness.run(&descriptors) {
        Err(err @ Error::ThreadLimit { id: 3, max_threads: 2 }) => assert!(err.is_spawn_failure()),
        other => panic!("expected thread limit error, got {:?}", other),
    }

    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(stopped.load(Ordering::SeqCst), 2);
    assert_eq!(steps.load(Ordering::SeqCst), 0);
}

#[test]
fn threads_are_named() {
    let names = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let harness = {
        let names = names.clone();
        Harness::builder()
            .thread_name(|id| format!("harness-{}", id))
            .on_thread_start(move |_| {
                let name = std::thread::current().name().map(String::from);
                names.lock().extend(name);
            })
            .build()
    };

    harness
        .run(&[WorkerDescriptor::new(8, 0, Duration::ZERO)])
        .unwrap();

    assert_eq!(*names.lock(), ["harness-8"]);
}
