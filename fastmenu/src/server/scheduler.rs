use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Duration,
};

use fastmenu_config::SchedulerConfig;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::MenuError;

pub type Task = Box<dyn FnOnce() + Send>;
pub type RepeatingTask = Arc<dyn Fn() + Send + Sync>;

/// The single logical thread every menu mutation and every call into a
/// [`Viewer`](crate::Viewer) happens on.
pub trait MainThread: Send + Sync + 'static {
    /// Queue `task`. Tasks run one at a time, in submission order.
    fn execute(&self, task: Task);

    /// Run `task` after `delay` ticks, then every `period` ticks until the
    /// returned handle is cancelled.
    fn run_task_timer(&self, delay: u64, period: u64, task: RepeatingTask) -> TaskHandle;
}

/// Cancels a repeating task. Cloning shares the same task.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Run `f` on the main thread and wait for its result without blocking.
pub async fn run_on_main<F, R>(main: &dyn MainThread, f: F) -> Result<R, MenuError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    main.execute(Box::new(move || {
        // The waiter may be gone already, nothing to report then
        let _ = sender.send(f());
    }));
    receiver.await.map_err(|_| MenuError::MainThreadClosed)
}

const MIN_TICK: Duration = Duration::from_millis(1);
const MAX_TICK: Duration = Duration::from_secs(60);
// Stands in for timer starts too far away to represent
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Wall time of one tick at `tps` ticks per second, kept within
/// `MIN_TICK..=MAX_TICK`.
fn tick_length(tps: f32) -> Duration {
    // NaN and negative rates become 0, a zero rate saturates
    let tick = Duration::from_millis((1000.0 / tps) as u64).clamp(MIN_TICK, MAX_TICK);
    if !(tps > 0.0 && tps <= 1000.0) {
        log::warn!("Unusable tick rate {tps}, using ticks of {tick:?}");
    }
    tick
}

/// A [`MainThread`] for hosts without their own scheduler: a tokio task that
/// drains a queue of tasks one by one. Ticks only matter for timers.
pub struct TickScheduler {
    sender: mpsc::UnboundedSender<Task>,
    tick: Duration,
    runtime: Handle,
    shutdown: CancellationToken,
}

impl TickScheduler {
    /// Must be called from within a tokio runtime.
    pub fn start(config: &SchedulerConfig) -> Arc<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let runtime = Handle::current();
        runtime.spawn(Self::run(receiver, shutdown.clone()));

        Arc::new(Self {
            sender,
            tick: tick_length(config.tps),
            runtime,
            shutdown,
        })
    }

    async fn run(mut receiver: mpsc::UnboundedReceiver<Task>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                task = receiver.recv() => match task {
                    Some(task) => {
                        if catch_unwind(AssertUnwindSafe(task)).is_err() {
                            log::error!("A main thread task panicked");
                        }
                    }
                    None => break,
                },
            }
        }
        log::debug!("Main thread scheduler stopped");
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    fn ticks(&self, ticks: u64) -> Duration {
        self.tick
            .saturating_mul(u32::try_from(ticks).unwrap_or(u32::MAX))
    }

    /// Stop running tasks. Queued and later tasks are dropped.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl MainThread for TickScheduler {
    fn execute(&self, task: Task) {
        if self.shutdown.is_cancelled() || self.sender.send(task).is_err() {
            log::warn!("Dropping a main thread task, the scheduler is stopped");
        }
    }

    fn run_task_timer(&self, delay: u64, period: u64, task: RepeatingTask) -> TaskHandle {
        let handle = TaskHandle::new();
        let token = handle.token.clone();
        let shutdown = self.shutdown.clone();
        let sender = self.sender.clone();
        let now = Instant::now();
        let start = now
            .checked_add(self.ticks(delay))
            .unwrap_or(now + FAR_FUTURE);
        let mut interval = tokio::time::interval_at(start, self.ticks(period.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    () = shutdown.cancelled() => break,
                    _ = interval.tick() => {}
                }
                let task = task.clone();
                let token = token.clone();
                let run: Task = Box::new(move || {
                    if !token.is_cancelled() {
                        task();
                    }
                });
                if sender.send(run).is_err() {
                    break;
                }
            }
        });
        handle
    }
}
