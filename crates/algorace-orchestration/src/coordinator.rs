//! Race coordinator: launches the renderer and the workers, waits for all
//! of them and turns the results store into a report.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use algorace_core::constants::{RENDERER_STOP_TIMEOUT, WORKER_STACK_SIZE};
use algorace_core::dataset::Dataset;
use algorace_core::progress::CancellationToken;
use algorace_core::state::RaceState;
use algorace_core::worker::{run_worker, WorkerOutcome};
use algorace_core::workload::{Pacing, Workload};
use algorace_core::RaceError;

use crate::interfaces::FrameSink;
use crate::renderer::{render_loop, RenderExit, RendererConfig};
use crate::report::RaceReport;

/// Settings of one race.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaceConfig {
    /// Renderer cadence and track length.
    pub renderer: RendererConfig,
    /// Visualization delays.
    pub pacing: Pacing,
    /// Watchdog deadline; unfinished workers are cancelled when it expires.
    pub timeout: Option<Duration>,
}

/// Runs a set of workloads as a race.
pub struct RaceCoordinator {
    config: RaceConfig,
    workers: Vec<Arc<dyn Workload>>,
}

impl RaceCoordinator {
    /// Create a coordinator with no workers.
    #[must_use]
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            workers: Vec::new(),
        }
    }

    /// Fix the worker set. Names must be unique; order is display order.
    pub fn register_workers(&mut self, workers: Vec<Arc<dyn Workload>>) -> Result<(), RaceError> {
        if workers.is_empty() {
            return Err(RaceError::NoWorkers);
        }
        for (i, worker) in workers.iter().enumerate() {
            if workers[..i].iter().any(|w| w.name() == worker.name()) {
                return Err(RaceError::DuplicateWorker(worker.name().to_string()));
            }
        }
        self.workers = workers;
        Ok(())
    }

    /// Registered worker names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.workers.iter().map(|w| w.name().to_string()).collect()
    }

    /// Run the race and return its report.
    ///
    /// Blocks until every worker has completed or been recorded as DNF.
    /// The renderer draws into `sink` on its own thread; it is given a
    /// bounded time to stop once the workers are done.
    pub fn run(
        &self,
        dataset: &Dataset,
        sink: Box<dyn FrameSink>,
        cancel: &CancellationToken,
    ) -> Result<RaceReport, RaceError> {
        let names = self.names();
        let state = Arc::new(RaceState::new(&names)?);
        let worker_count = names.len();
        info!(workers = worker_count, size = dataset.len(), "race started");

        let (exit_tx, exit_rx) = crossbeam_channel::bounded::<RenderExit>(1);
        let renderer = spawn_renderer(Arc::clone(&state), sink, self.config.renderer, exit_tx);
        let watchdog = self
            .config
            .timeout
            .and_then(|timeout| spawn_watchdog(Arc::clone(&state), cancel.clone(), timeout));

        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|i| format!("algorace-worker-{i}"))
            .build()
            .map_err(|e| RaceError::Config(format!("failed to create worker pool: {e}")))?;

        let outcomes: Mutex<Vec<WorkerOutcome>> = Mutex::new(Vec::with_capacity(worker_count));
        pool.scope(|scope| {
            for workload in &self.workers {
                let state = &state;
                let outcomes = &outcomes;
                let pacing = &self.config.pacing;
                scope.spawn(move |_| {
                    let outcome = run_worker(state, workload.as_ref(), dataset, cancel, pacing);
                    outcomes.lock().push(outcome);
                });
            }
        });
        debug!("all workers joined");

        state.deactivate();
        if let Some(handle) = renderer {
            match exit_rx.recv_timeout(RENDERER_STOP_TIMEOUT) {
                Ok(exit) => {
                    debug!(?exit, "renderer stopped");
                    if handle.join().is_err() {
                        warn!("renderer thread panicked");
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // The sender only drops without a message when the thread unwinds.
                    if handle.join().is_err() {
                        warn!("renderer thread panicked");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // The thread is left detached.
                    warn!(
                        timeout_ms = RENDERER_STOP_TIMEOUT.as_secs_f64() * 1000.0,
                        "renderer did not stop in time"
                    );
                }
            }
        }
        if let Some(handle) = watchdog {
            if handle.join().is_err() {
                warn!("watchdog thread panicked");
            }
        }

        let report = RaceReport::build(&state.results().records(), &outcomes.into_inner(), dataset);
        info!(
            finished = report.by_duration.len(),
            dnf = report.dnf.len(),
            elapsed_ms = state.elapsed().as_secs_f64() * 1000.0,
            "race finished"
        );
        Ok(report)
    }
}

fn spawn_renderer(
    state: Arc<RaceState>,
    mut sink: Box<dyn FrameSink>,
    config: RendererConfig,
    exit_tx: crossbeam_channel::Sender<RenderExit>,
) -> Option<thread::JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("algorace-renderer".into())
        .spawn(move || {
            let exit = render_loop(&state, sink.as_mut(), &config);
            let _ = exit_tx.send(exit);
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "could not start renderer; racing without live view");
            None
        }
    }
}

fn spawn_watchdog(
    state: Arc<RaceState>,
    cancel: CancellationToken,
    timeout: Duration,
) -> Option<thread::JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("algorace-watchdog".into())
        .spawn(move || {
            if !state.board().wait_all_complete(timeout) {
                warn!(
                    timeout_ms = timeout.as_secs_f64() * 1000.0,
                    "race deadline expired; cancelling unfinished workers"
                );
                cancel.cancel();
            }
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "could not start watchdog");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorace_core::registry::{DefaultFactory, WorkloadFactory};
    use algorace_core::workload::{WorkerContext, WorkloadKind, WorkloadOutput};

    use crate::interfaces::NullSink;
    use crate::renderer::Frame;

    fn coordinator(keys: &[&str]) -> RaceCoordinator {
        let factory = DefaultFactory::new();
        let workers = keys.iter().map(|k| factory.get(k).unwrap()).collect();
        let mut coordinator = RaceCoordinator::new(RaceConfig {
            pacing: Pacing::disabled(),
            ..RaceConfig::default()
        });
        coordinator.register_workers(workers).unwrap();
        coordinator
    }

    /// Spins on progress checkpoints until cancelled.
    struct Stuck;

    impl Workload for Stuck {
        fn name(&self) -> &str {
            "Stuck"
        }

        fn kind(&self) -> WorkloadKind {
            WorkloadKind::Search
        }

        fn run(
            &self,
            ctx: &mut WorkerContext<'_>,
            _dataset: &Dataset,
        ) -> Result<WorkloadOutput, RaceError> {
            loop {
                ctx.report(1.0)?;
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    #[derive(Clone, Default)]
    struct CountingSink {
        announcements: Arc<Mutex<usize>>,
    }

    impl FrameSink for CountingSink {
        fn draw(&mut self, _frame: &Frame) -> Result<(), RaceError> {
            Ok(())
        }

        fn all_complete(&mut self, _frame: &Frame) -> Result<(), RaceError> {
            *self.announcements.lock() += 1;
            Ok(())
        }
    }

    #[test]
    fn register_rejects_empty_and_duplicates() {
        let mut c = RaceCoordinator::new(RaceConfig::default());
        assert!(matches!(c.register_workers(Vec::new()), Err(RaceError::NoWorkers)));

        let factory = DefaultFactory::new();
        let dup = vec![factory.get("quick").unwrap(), factory.get("quicksort").unwrap()];
        assert!(matches!(
            c.register_workers(dup),
            Err(RaceError::DuplicateWorker(_))
        ));
    }

    #[test]
    fn full_race_ranks_every_worker() {
        let c = coordinator(&["linear", "binary", "bubble", "quick", "insertion"]);
        let dataset = Dataset::generate(300, 1000, Some(7)).unwrap();
        let report = c
            .run(&dataset, Box::new(NullSink), &CancellationToken::new())
            .unwrap();

        assert_eq!(report.by_duration.len(), 5);
        assert_eq!(report.by_memory.len(), 5);
        assert_eq!(report.by_finish.len(), 5);
        assert!(report.dnf.is_empty());
        assert!(report.mismatches.is_empty());
        for pair in report.by_duration.windows(2) {
            assert!(pair[0].duration <= pair[1].duration);
        }
        for pair in report.by_finish.windows(2) {
            assert!(pair[0].finish_offset <= pair[1].finish_offset);
        }
        assert_eq!(report.seed, Some(7));
    }

    #[test]
    fn renderer_announces_completion_once() {
        let c = coordinator(&["linear", "quick"]);
        let sink = CountingSink::default();
        let dataset = Dataset::generate(50, 100, Some(1)).unwrap();
        c.run(&dataset, Box::new(sink.clone()), &CancellationToken::new())
            .unwrap();
        assert_eq!(*sink.announcements.lock(), 1);
    }

    /// Panics when asked to announce completion, killing the renderer thread.
    struct PanickingSink;

    impl FrameSink for PanickingSink {
        fn draw(&mut self, _frame: &Frame) -> Result<(), RaceError> {
            Ok(())
        }

        fn all_complete(&mut self, _frame: &Frame) -> Result<(), RaceError> {
            panic!("terminal exploded");
        }
    }

    #[test]
    fn panicked_renderer_is_joined_without_waiting_for_timeout() {
        let c = coordinator(&["linear", "binary"]);
        let dataset = Dataset::generate(50, 100, Some(4)).unwrap();

        let started = std::time::Instant::now();
        let report = c
            .run(&dataset, Box::new(PanickingSink), &CancellationToken::new())
            .unwrap();

        assert!(started.elapsed() < RENDERER_STOP_TIMEOUT);
        assert_eq!(report.by_duration.len(), 2);
    }

    #[test]
    fn watchdog_turns_stuck_worker_into_dnf() {
        let factory = DefaultFactory::new();
        let mut c = RaceCoordinator::new(RaceConfig {
            pacing: Pacing::disabled(),
            timeout: Some(Duration::from_millis(50)),
            ..RaceConfig::default()
        });
        c.register_workers(vec![factory.get("linear").unwrap(), Arc::new(Stuck)])
            .unwrap();

        let dataset = Dataset::generate(20, 10, Some(3)).unwrap();
        let cancel = CancellationToken::new();
        let report = c.run(&dataset, Box::new(NullSink), &cancel).unwrap();

        assert!(cancel.is_cancelled());
        assert_eq!(report.dnf.len(), 1);
        assert_eq!(report.dnf[0].name, "Stuck");
        assert_eq!(report.by_duration.len(), 1);
    }
}
