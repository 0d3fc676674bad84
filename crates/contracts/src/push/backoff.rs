//! Bounded polling and retry loops. Sleeping is injected so the loops run
//! on browser timers in the app and instantly in tests.

use futures::future::LocalBoxFuture;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Sleep for the given number of milliseconds
pub type Sleep = Rc<dyn Fn(u32) -> LocalBoxFuture<'static, ()>>;

/// Shared stop flag for a polling loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// `max_attempts` tries, waiting `initial_delay_ms` after the first and
/// `factor` times longer after each following one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u32,
    pub factor: f64,
}

impl BackoffPolicy {
    pub const FACTOR: f64 = 1.5;

    pub fn new(max_attempts: u32, initial_delay_ms: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            factor: Self::FACTOR,
        }
    }

    /// Pauses between consecutive attempts (`max_attempts - 1` of them)
    pub fn delays(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(move |i| {
            let delay = f64::from(self.initial_delay_ms) * self.factor.powi(i as i32);
            delay.round().min(f64::from(u32::MAX)) as u32
        })
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(5, 1000)
    }
}

/// Call `attempt` until it yields `Some`, at most `policy.max_attempts`
/// times, sleeping per the policy in between. `attempt` receives the
/// 1-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    sleep: &Sleep,
    mut attempt: F,
) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let mut delays = policy.delays();
    for n in 1..=policy.max_attempts {
        if let Some(value) = attempt(n).await {
            return Some(value);
        }
        match delays.next() {
            Some(delay) => {
                log::debug!("Attempt {} of {} came back empty, next in {} ms", n, policy.max_attempts, delay);
                sleep(delay).await;
            }
            None => break,
        }
    }
    None
}

/// Check `condition` every `interval_ms`, up to `max_polls` times. Returns
/// `false` when the polls run out or `cancel` fires first.
pub async fn poll_until<F>(
    max_polls: u32,
    interval_ms: u32,
    sleep: &Sleep,
    cancel: &CancelToken,
    mut condition: F,
) -> bool
where
    F: FnMut() -> bool,
{
    for n in 0..max_polls {
        if cancel.is_cancelled() {
            return false;
        }
        if condition() {
            return true;
        }
        if n + 1 < max_polls {
            sleep(interval_ms).await;
        }
    }
    false
}


#[cfg(test)]
mod tests {
    use super::test_support::recording_sleep;
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_delays_grow_by_factor() {
        let delays: Vec<u32> = BackoffPolicy::new(5, 1000).delays().collect();
        assert_eq!(delays, vec![1000, 1500, 2250, 3375]);
        assert_eq!(BackoffPolicy::new(1, 1000).delays().count(), 0);
        assert_eq!(BackoffPolicy::new(0, 1000).delays().count(), 0);
    }

    #[test]
    fn test_retry_stops_on_first_value() {
        let (sleep, slept) = recording_sleep();
        let result = block_on(retry_with_backoff(&BackoffPolicy::new(5, 100), &sleep, |n| async move {
            (n == 3).then(|| "player-1".to_string())
        }));
        assert_eq!(result.as_deref(), Some("player-1"));
        assert_eq!(*slept.borrow(), vec![100, 150]);
    }

    #[test]
    fn test_retry_gives_up_after_max_attempts() {
        let (sleep, slept) = recording_sleep();
        let calls = Cell::new(0);
        let result: Option<String> = block_on(retry_with_backoff(&BackoffPolicy::new(3, 200), &sleep, |_| {
            calls.set(calls.get() + 1);
            async { None }
        }));
        assert_eq!(result, None);
        assert_eq!(calls.get(), 3);
        assert_eq!(*slept.borrow(), vec![200, 300]);
    }

    #[test]
    fn test_poll_until_ready() {
        let (sleep, slept) = recording_sleep();
        let polls = Cell::new(0);
        let ready = block_on(poll_until(10, 100, &sleep, &CancelToken::new(), || {
            polls.set(polls.get() + 1);
            polls.get() == 4
        }));
        assert!(ready);
        assert_eq!(slept.borrow().len(), 3);
    }

    #[test]
    fn test_poll_until_exhausted_or_cancelled() {
        let (sleep, _) = recording_sleep();
        assert!(!block_on(poll_until(3, 100, &sleep, &CancelToken::new(), || false)));

        let cancel = CancelToken::new();
        let watcher = cancel.clone();
        let ready = block_on(poll_until(100, 100, &sleep, &cancel, || {
            watcher.cancel();
            false
        }));
        assert!(!ready);
        assert!(cancel.is_cancelled());
    }
}
