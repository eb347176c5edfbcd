use crate::adapters::clock::SystemClock;
use crate::core::target::parse_target;
use crate::domain::model::{NaiveZone, RemainingDuration, SessionState, SessionStatus, TargetInstant};
use crate::domain::ports::Clock;
use crate::utils::error::{CountdownError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Starts countdown sessions that publish the remaining time once per second.
///
/// Every session re-reads `clock` on each tick, so timer jitter never
/// accumulates into the displayed value. Sessions are independent of each
/// other and of the scheduler; the scheduler can be dropped while they run.
#[derive(Debug, Clone)]
pub struct CountdownScheduler<C: Clock = SystemClock> {
    clock: C,
}

impl CountdownScheduler<SystemClock> {
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock + Clone + 'static> CountdownScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// The clock sessions read; hosts can use it to place targets relative
    /// to the same notion of "now".
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Parses `input` and starts a session for it.
    ///
    /// An unparseable target fails here, before any tick or timer exists.
    pub fn start_countdown<F>(
        &self,
        input: &str,
        zone: NaiveZone,
        on_tick: F,
    ) -> Result<CountdownHandle>
    where
        F: FnMut(RemainingDuration) + Send + 'static,
    {
        let target = parse_target(input, zone)?;
        self.start(target, on_tick)
    }

    /// Starts a session counting down to `target`.
    ///
    /// `on_tick` is called once before this returns with the value for the
    /// current instant, then once per second from a task on the current
    /// tokio runtime. A target already in the past yields one zero tick and
    /// an already-expired handle.
    ///
    /// # Errors
    ///
    /// [`CountdownError::TimerUnavailable`] when called outside a tokio
    /// runtime; no tick is delivered in that case.
    pub fn start<F>(&self, target: TargetInstant, mut on_tick: F) -> Result<CountdownHandle>
    where
        F: FnMut(RemainingDuration) + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            CountdownError::TimerUnavailable {
                reason: e.to_string(),
            }
        })?;

        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let span = tracing::info_span!("countdown", session = id, event = %target);
        let session = Arc::new(Session::new());

        let state = {
            let _entered = span.enter();
            let state = SessionState::observe(&target, self.clock.now());
            tracing::info!(
                seconds_remaining = state.seconds_remaining,
                "⏳ Countdown session started"
            );
            on_tick(state.remaining());
            state
        };

        if state.is_expired {
            session.finish(SessionStatus::Expired);
            span.in_scope(|| tracing::info!("🏁 Target already reached"));
            return Ok(CountdownHandle {
                session,
                task: None,
            });
        }

        let task = runtime.spawn(
            run_session(self.clock.clone(), target, on_tick, Arc::clone(&session)).instrument(span),
        );

        Ok(CountdownHandle {
            session,
            task: Some(task),
        })
    }
}

#[derive(Debug)]
struct Session {
    status: Mutex<SessionStatus>,
    // tick 在持有此鎖時檢查狀態並呼叫 on_tick；cancel 會等待它釋放
    delivery: Mutex<()>,
    delivering_on: Mutex<Option<ThreadId>>,
    cancelled: Notify,
}

impl Session {
    fn new() -> Self {
        Self {
            status: Mutex::new(SessionStatus::Running),
            delivery: Mutex::new(()),
            delivering_on: Mutex::new(None),
            cancelled: Notify::new(),
        }
    }

    fn status(&self) -> SessionStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves a running session into `to`; terminal states never change.
    fn finish(&self, to: SessionStatus) -> bool {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        if status.is_terminal() {
            return false;
        }
        *status = to;
        true
    }

    fn set_delivering(&self, thread: Option<ThreadId>) {
        *self
            .delivering_on
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = thread;
    }

    fn is_delivering_on_current_thread(&self) -> bool {
        *self
            .delivering_on
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }

    /// Blocks until an in-flight tick has returned from its callback.
    ///
    /// A callback that cancels its own session skips the wait.
    fn wait_for_delivery(&self) {
        if self.is_delivering_on_current_thread() {
            return;
        }
        drop(self.delivery.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Stop,
}

/// Checks the session status and delivers one tick under the delivery lock.
fn deliver_tick<C, F>(
    clock: &C,
    target: &TargetInstant,
    on_tick: &mut F,
    session: &Session,
    tick: u64,
) -> TickOutcome
where
    C: Clock,
    F: FnMut(RemainingDuration),
{
    let _delivery = session
        .delivery
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    // 取消後可能仍有已排程的 tick
    if session.status().is_terminal() {
        return TickOutcome::Stop;
    }

    let state = SessionState::observe(target, clock.now());
    if state.is_expired && !session.finish(SessionStatus::Expired) {
        return TickOutcome::Stop;
    }

    let remaining = state.remaining();
    tracing::debug!(tick, %remaining, "tick");

    session.set_delivering(Some(thread::current().id()));
    on_tick(remaining);
    session.set_delivering(None);

    if state.is_expired {
        tracing::info!(ticks = tick, "🏁 Countdown reached target");
        TickOutcome::Stop
    } else {
        TickOutcome::Continue
    }
}

async fn run_session<C, F>(
    clock: C,
    target: TargetInstant,
    mut on_tick: F,
    session: Arc<Session>,
) -> SessionStatus
where
    C: Clock,
    F: FnMut(RemainingDuration) + Send,
{
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = session.cancelled.notified() => break,
            _ = interval.tick() => {
                ticks += 1;
                if deliver_tick(&clock, &target, &mut on_tick, &session, ticks) == TickOutcome::Stop {
                    break;
                }
            }
        }
    }

    session.status()
}

/// Handle to one running countdown session.
///
/// Dropping the handle disposes of the session the same way [`cancel`] does.
///
/// [`cancel`]: CountdownHandle::cancel
#[derive(Debug)]
#[must_use = "dropping the handle cancels the countdown"]
pub struct CountdownHandle {
    session: Arc<Session>,
    task: Option<JoinHandle<SessionStatus>>,
}

impl CountdownHandle {
    /// Stops the session. Once this returns no further tick is delivered;
    /// a tick whose callback is running on another thread is waited for.
    /// Calling it again, or after expiry, does nothing.
    pub fn cancel(&self) {
        if self.session.finish(SessionStatus::Cancelled) {
            tracing::info!("🛑 Countdown cancelled");
            self.session.cancelled.notify_one();
            self.session.wait_for_delivery();
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }

    /// Waits until the session expires or is cancelled.
    pub async fn wait(mut self) -> Result<SessionStatus> {
        match self.task.take() {
            Some(task) => task.await.map_err(|e| CountdownError::SessionFailed {
                reason: e.to_string(),
            }),
            None => Ok(self.status()),
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::TokioClock;
    use chrono::{Duration as ChronoDuration, Utc};

    type Ticks = Arc<Mutex<Vec<RemainingDuration>>>;

    fn recorder() -> (Ticks, impl FnMut(RemainingDuration) + Send + 'static) {
        let ticks: Ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        (ticks, move |remaining| sink.lock().unwrap().push(remaining))
    }

    fn scheduler() -> CountdownScheduler<TokioClock> {
        CountdownScheduler::new(TokioClock::anchored_at(Utc::now()))
    }

    fn target_in(scheduler: &CountdownScheduler<TokioClock>, secs: i64) -> TargetInstant {
        TargetInstant::new(scheduler.clock().now() + ChronoDuration::seconds(secs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_tick_is_immediate() {
        let scheduler = scheduler();
        let (ticks, on_tick) = recorder();

        let handle = scheduler.start(target_in(&scheduler, 125), on_tick).unwrap();

        assert_eq!(
            ticks.lock().unwrap().as_slice(),
            &[RemainingDuration {
                days: 0,
                hours: 0,
                minutes: 2,
                seconds: 5
            }]
        );
        assert_eq!(handle.status(), SessionStatus::Running);
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_and_stops() {
        let scheduler = scheduler();
        let (ticks, on_tick) = recorder();

        let handle = scheduler.start(target_in(&scheduler, 3), on_tick).unwrap();
        let status = handle.wait().await.unwrap();

        assert_eq!(status, SessionStatus::Expired);
        let seconds: Vec<u8> = ticks.lock().unwrap().iter().map(|t| t.seconds).collect();
        assert_eq!(seconds, vec![3, 2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let scheduler = scheduler();
        let (ticks, on_tick) = recorder();

        let handle = scheduler.start(target_in(&scheduler, 60), on_tick).unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        handle.cancel();
        handle.cancel();
        assert_eq!(handle.status(), SessionStatus::Cancelled);

        let delivered = ticks.lock().unwrap().len();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.lock().unwrap().len(), delivered);
        assert_eq!(delivered, 3);

        assert_eq!(handle.wait().await.unwrap(), SessionStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_expiry_keeps_expired() {
        let scheduler = scheduler();
        let (_ticks, on_tick) = recorder();

        let handle = scheduler.start(target_in(&scheduler, -5), on_tick).unwrap();
        assert!(handle.is_finished());
        handle.cancel();
        assert_eq!(handle.status(), SessionStatus::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_cancel_its_own_session() {
        let scheduler = scheduler();
        let (ticks, mut record) = recorder();
        let slot: Arc<Mutex<Option<CountdownHandle>>> = Arc::new(Mutex::new(None));
        let slot_in_tick = Arc::clone(&slot);

        let handle = scheduler
            .start(target_in(&scheduler, 60), move |remaining| {
                record(remaining);
                if remaining.seconds == 58 {
                    if let Some(handle) = slot_in_tick.lock().unwrap().as_ref() {
                        handle.cancel();
                    }
                }
            })
            .unwrap();
        *slot.lock().unwrap() = Some(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;

        let handle = slot.lock().unwrap().take().unwrap();
        assert_eq!(handle.status(), SessionStatus::Cancelled);
        assert_eq!(ticks.lock().unwrap().len(), 3);
        assert_eq!(handle.wait().await.unwrap(), SessionStatus::Cancelled);
    }

    #[test]
    fn test_start_outside_runtime_fails_without_ticking() {
        let scheduler = CountdownScheduler::with_system_clock();
        let (ticks, on_tick) = recorder();
        let target = TargetInstant::new(Utc::now() + ChronoDuration::seconds(30));

        let err = scheduler.start(target, on_tick).unwrap_err();

        assert!(matches!(err, CountdownError::TimerUnavailable { .. }));
        assert!(ticks.lock().unwrap().is_empty());
    }
}
