//! Concurrency properties of the board, the renderer and the coordinator.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use algorace_core::board::{Completion, EntryState, ProgressBoard};
use algorace_core::dataset::Dataset;
use algorace_core::progress::CancellationToken;
use algorace_core::registry::{DefaultFactory, WorkloadFactory};
use algorace_core::state::RaceState;
use algorace_core::workload::{Pacing, WorkerContext, Workload, WorkloadKind, WorkloadOutput};
use algorace_core::RaceError;
use algorace_orchestration::coordinator::{RaceConfig, RaceCoordinator};
use algorace_orchestration::interfaces::{FrameSink, NullSink};
use algorace_orchestration::renderer::{render_loop, Frame, RenderExit, RendererConfig};

const WORKERS: usize = 50;
const UPDATES: usize = 100;

fn worker_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("worker-{i:02}")).collect()
}

#[test]
fn stress_many_workers_many_updates() {
    let names = worker_names(WORKERS);
    let board = Arc::new(ProgressBoard::new(names.clone()).unwrap());
    let all_complete = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = names
        .into_iter()
        .map(|name| {
            let board = Arc::clone(&board);
            let all_complete = Arc::clone(&all_complete);
            thread::spawn(move || {
                for step in 1..=UPDATES {
                    board.update(&name, step as f64).unwrap();
                }
                if board.mark_complete(&name).unwrap() == Completion::AllComplete {
                    all_complete.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = board.snapshot();
    assert_eq!(snapshot.entries.len(), WORKERS);
    assert_eq!(snapshot.finished_count(), WORKERS);
    for entry in &snapshot.entries {
        assert_eq!(entry.state, EntryState::Completed);
        assert!((entry.progress - 100.0).abs() < f64::EPSILON);
    }
    assert!(board.is_all_complete());
    assert_eq!(all_complete.load(Ordering::SeqCst), 1);
}

#[test]
fn snapshots_observe_monotonic_progress() {
    let names = worker_names(8);
    let board = Arc::new(ProgressBoard::new(names.clone()).unwrap());

    let reader = {
        let board = Arc::clone(&board);
        thread::spawn(move || {
            let mut last: HashMap<String, f64> = HashMap::new();
            let mut completed: HashSet<String> = HashSet::new();
            loop {
                let snapshot = board.snapshot();
                for entry in &snapshot.entries {
                    let prev = last.get(&entry.name).copied().unwrap_or(0.0);
                    assert!(entry.progress >= prev, "{} went backwards", entry.name);
                    if completed.contains(&entry.name) {
                        assert!((entry.progress - 100.0).abs() < f64::EPSILON);
                        assert!(entry.completed());
                    }
                    if entry.completed() {
                        assert!((entry.progress - 100.0).abs() < f64::EPSILON);
                        completed.insert(entry.name.clone());
                    } else {
                        assert!(entry.progress <= 99.9);
                    }
                    last.insert(entry.name.clone(), entry.progress);
                }
                if snapshot.all_finished() {
                    break;
                }
            }
        })
    };

    let writers: Vec<_> = names
        .into_iter()
        .map(|name| {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                for step in 0..=120 {
                    board.update(&name, f64::from(step)).unwrap();
                }
                board.mark_complete(&name).unwrap();
                // Late writes never reopen a finished entry.
                board.update(&name, 5.0).unwrap();
                assert_eq!(
                    board.mark_complete(&name).unwrap(),
                    Completion::AlreadyFinished
                );
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    reader.join().unwrap();
}

#[test]
fn all_complete_waiter_is_released_by_dnf() {
    let board = Arc::new(ProgressBoard::new(["a", "b"]).unwrap());
    let waiter = {
        let board = Arc::clone(&board);
        thread::spawn(move || board.wait_all_complete(Duration::from_secs(10)))
    };
    board.mark_complete("a").unwrap();
    assert_eq!(board.mark_dnf("b").unwrap(), Completion::AllComplete);
    assert!(waiter.join().unwrap());
}

#[derive(Default, Clone)]
struct Recorder {
    frames: Arc<Mutex<usize>>,
    announcements: Arc<Mutex<usize>>,
}

impl FrameSink for Recorder {
    fn draw(&mut self, _frame: &Frame) -> Result<(), RaceError> {
        *self.frames.lock() += 1;
        Ok(())
    }

    fn all_complete(&mut self, _frame: &Frame) -> Result<(), RaceError> {
        *self.announcements.lock() += 1;
        Ok(())
    }
}

#[test]
fn renderer_on_precompleted_board_stops_within_one_interval() {
    let names = worker_names(3);
    let state = RaceState::new(&names).unwrap();
    for name in &names {
        state.board().mark_complete(name).unwrap();
    }
    let interval = Duration::from_millis(200);
    let mut sink = Recorder::default();

    let started = Instant::now();
    let exit = render_loop(&state, &mut sink, &RendererConfig::new(interval, 50));

    assert_eq!(exit, RenderExit::AllComplete);
    assert!(started.elapsed() < interval);
    assert_eq!(*sink.announcements.lock(), 1);
    assert!(!state.is_active());
}

#[test]
fn renderer_stops_when_deactivated_externally() {
    let state = Arc::new(RaceState::new(&worker_names(2)).unwrap());
    let sink = Recorder::default();
    let renderer = {
        let state = Arc::clone(&state);
        let mut sink = sink.clone();
        thread::spawn(move || {
            render_loop(
                &state,
                &mut sink,
                &RendererConfig::new(Duration::from_millis(5), 10),
            )
        })
    };
    thread::sleep(Duration::from_millis(30));
    state.deactivate();

    assert_eq!(renderer.join().unwrap(), RenderExit::Stopped);
    assert!(*sink.frames.lock() >= 1);
    assert_eq!(*sink.announcements.lock(), 0);
}

/// Panics halfway through its run.
struct Exploding;

impl Workload for Exploding {
    fn name(&self) -> &str {
        "Exploding Sort"
    }

    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Sort
    }

    fn run(
        &self,
        ctx: &mut WorkerContext<'_>,
        _dataset: &Dataset,
    ) -> Result<WorkloadOutput, RaceError> {
        ctx.report(50.0)?;
        panic!("comparator exploded");
    }
}

fn unpaced() -> RaceConfig {
    RaceConfig {
        pacing: Pacing::disabled(),
        renderer: RendererConfig::new(Duration::from_millis(2), 20),
        timeout: Some(Duration::from_secs(60)),
    }
}

#[test]
fn panicking_worker_is_dnf_and_race_completes() {
    let factory = DefaultFactory::new();
    let mut workers: Vec<Arc<dyn Workload>> = factory
        .available()
        .into_iter()
        .map(|key| factory.get(key).unwrap())
        .collect();
    workers.push(Arc::new(Exploding));

    let mut coordinator = RaceCoordinator::new(unpaced());
    coordinator.register_workers(workers).unwrap();
    let sink = Recorder::default();
    let dataset = Dataset::generate(400, 1000, Some(11)).unwrap();

    let report = coordinator
        .run(&dataset, Box::new(sink.clone()), &CancellationToken::new())
        .unwrap();

    assert_eq!(report.dnf.len(), 1);
    assert_eq!(report.dnf[0].name, "Exploding Sort");
    assert!(report.dnf[0].reason.contains("comparator exploded"));
    assert_eq!(report.by_duration.len(), 5);
    assert!(report.mismatches.is_empty());
    assert_eq!(*sink.announcements.lock(), 1);
}

#[test]
fn rankings_hold_each_worker_exactly_once() {
    let factory = DefaultFactory::new();
    let workers: Vec<Arc<dyn Workload>> = factory
        .available()
        .into_iter()
        .map(|key| factory.get(key).unwrap())
        .collect();
    let mut coordinator = RaceCoordinator::new(unpaced());
    coordinator.register_workers(workers).unwrap();
    let registered: HashSet<String> = coordinator.names().into_iter().collect();

    let dataset = Dataset::generate(1000, 10_000, Some(5)).unwrap();
    let report = coordinator
        .run(&dataset, Box::new(NullSink), &CancellationToken::new())
        .unwrap();

    for ranking in [&report.by_duration, &report.by_memory, &report.by_finish] {
        let names: Vec<&str> = ranking.iter().map(|s| s.name.as_str()).collect();
        let unique: HashSet<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), registered.len());
        assert_eq!(unique, registered);
    }
    for pair in report.by_duration.windows(2) {
        assert!(pair[0].duration <= pair[1].duration);
    }
    for pair in report.by_finish.windows(2) {
        assert!(pair[0].finish_offset <= pair[1].finish_offset);
    }
    assert_eq!(report.winner().map(|w| &w.name), report.by_duration.first().map(|w| &w.name));
}

#[test]
fn cancelled_race_marks_every_worker_dnf() {
    let factory = DefaultFactory::new();
    let mut coordinator = RaceCoordinator::new(RaceConfig::default());
    coordinator
        .register_workers(vec![
            factory.get("bubble").unwrap(),
            factory.get("insertion").unwrap(),
        ])
        .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let dataset = Dataset::generate(2000, 100, Some(2)).unwrap();
    let report = coordinator
        .run(&dataset, Box::new(NullSink), &cancel)
        .unwrap();

    assert!(report.by_duration.is_empty());
    assert_eq!(report.dnf.len(), 2);
    assert!(report.dnf.iter().all(|d| d.reason == "race cancelled"));
}
