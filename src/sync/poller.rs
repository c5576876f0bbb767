//! Interval polling with subscription lifetimes
//!
//! A [`Poller`] fetches once on subscribe, then again every interval until
//! its [`Subscription`] is dropped. Each result replaces the previous one
//! wholesale. Only the first fetch is "loud": it flips the loading flag and
//! reports failures; later failures are logged and swallowed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};
use crate::utils::errors::{Result, TransferError};
use crate::utils::logging::log_poll_failure;

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;
type UpdateFn<T> = Arc<dyn Fn(T) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&TransferError) + Send + Sync>;

/// Foreground/background signal for pollers that pause while hidden
#[derive(Debug, Clone)]
pub struct Visibility {
    sender: Arc<watch::Sender<bool>>,
}

impl Visibility {
    pub fn new(visible: bool) -> Self {
        let (sender, _) = watch::channel(visible);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn set_visible(&self, visible: bool) {
        self.sender.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    pub fn is_visible(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new(true)
    }
}

pub struct Poller<T> {
    resource: String,
    interval: Duration,
    periodic: bool,
    fetch: Fetcher<T>,
    visibility: Option<watch::Receiver<bool>>,
    on_initial_error: Option<ErrorFn>,
}

impl<T: Send + 'static> Poller<T> {
    pub fn new<F, Fut>(resource: impl Into<String>, interval: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            resource: resource.into(),
            interval,
            periodic: true,
            fetch: Arc::new(move || fetch().boxed()),
            visibility: None,
            on_initial_error: None,
        }
    }

    /// Skip ticks while hidden and refetch as soon as the view comes back
    pub fn gated_by(mut self, visibility: &Visibility) -> Self {
        self.visibility = Some(visibility.subscribe());
        self
    }

    /// Fetch on subscribe and on manual refresh only
    pub fn periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    pub fn on_initial_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransferError) + Send + Sync + 'static,
    {
        self.on_initial_error = Some(Arc::new(callback));
        self
    }

    /// Start polling; every successful fetch is handed to `on_update`
    pub fn subscribe<F>(self, on_update: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let on_update: UpdateFn<T> = Arc::new(on_update);
        let refresh = Arc::new(Notify::new());
        let (loading_tx, loading_rx) = watch::channel(true);

        let handle = tokio::spawn(run(self, on_update, refresh.clone(), loading_tx));

        Subscription {
            handle,
            refresh,
            loading: loading_rx,
        }
    }
}

async fn run<T: Send + 'static>(
    poller: Poller<T>,
    on_update: UpdateFn<T>,
    refresh: Arc<Notify>,
    loading: watch::Sender<bool>,
) {
    let Poller {
        resource,
        interval,
        periodic,
        fetch,
        mut visibility,
        on_initial_error,
    } = poller;

    debug!(resource = %resource, interval_ms = interval.as_millis() as u64, "Polling started");

    match fetch().await {
        Ok(data) => on_update(data),
        Err(e) => {
            warn!(resource = %resource, error = %e, "Initial fetch failed");
            if let Some(callback) = &on_initial_error {
                callback(&e);
            }
        }
    }
    let _ = loading.send(false);

    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut visible = visibility.as_ref().map(|rx| *rx.borrow()).unwrap_or(true);

    loop {
        tokio::select! {
            _ = ticker.tick(), if periodic => {
                if !visible {
                    trace!(resource = %resource, "Hidden, skipping tick");
                    continue;
                }
            }
            _ = refresh.notified() => {
                ticker.reset();
            }
            change = visibility_change(&mut visibility) => {
                match change {
                    Some(now_visible) => {
                        let became_visible = now_visible && !visible;
                        visible = now_visible;
                        if !became_visible {
                            continue;
                        }
                        debug!(resource = %resource, "Became visible, refreshing");
                        ticker.reset();
                    }
                    None => {
                        // Visibility source went away; keep polling unconditionally
                        visibility = None;
                        visible = true;
                        continue;
                    }
                }
            }
        }

        match fetch().await {
            Ok(data) => on_update(data),
            Err(e) => log_poll_failure(&resource, &e),
        }
    }
}

async fn visibility_change(receiver: &mut Option<watch::Receiver<bool>>) -> Option<bool> {
    match receiver {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(*rx.borrow_and_update()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

/// Handle for a running poller; dropping it stops the polling task
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
    refresh: Arc<Notify>,
    loading: watch::Receiver<bool>,
}

impl Subscription {
    /// Fetch now instead of waiting for the next tick
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// True until the first fetch has finished
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Wait for the first fetch to finish, successfully or not
    pub async fn loaded(&mut self) {
        let _ = self.loading.wait_for(|loading| !*loading).await;
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop polling; a fetch already in flight is abandoned
    pub fn unsubscribe(self) {
        self.handle.abort();
        debug!("Polling stopped");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const INTERVAL: Duration = Duration::from_millis(5000);

    fn counting_poller(calls: Arc<AtomicUsize>) -> Poller<usize> {
        Poller::new("test", INTERVAL, move || {
            let calls = calls.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }
        })
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_on_subscribe_and_every_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut sub = counting_poller(calls.clone()).subscribe(move |n| sink.lock().unwrap().push(n));
        sub.loaded().await;
        assert!(!sub.is_loading());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sub = counting_poller(calls.clone()).subscribe(|_| {});
        sub.loaded().await;
        drop(sub);

        tokio::time::sleep(INTERVAL * 3).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_stops_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sub = counting_poller(calls.clone()).subscribe(|_| {});
        sub.loaded().await;
        sub.unsubscribe();

        tokio::time::sleep(INTERVAL * 3).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_initial_failure_is_reported() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reported = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let reports = reported.clone();

        let mut sub = Poller::<()>::new("failing", INTERVAL, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(TransferError::api(500, None)) }
        })
        .on_initial_error(move |_| {
            reports.fetch_add(1, Ordering::SeqCst);
        })
        .subscribe(|_| {});
        sub.loaded().await;

        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert!(sub.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_skips_ticks_and_refocus_refetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let visibility = Visibility::new(true);
        let mut sub = counting_poller(calls.clone())
            .gated_by(&visibility)
            .subscribe(|_| {});
        sub.loaded().await;

        visibility.set_visible(false);
        tokio::time::sleep(INTERVAL * 3).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        visibility.set_visible(true);
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_without_ticks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sub = counting_poller(calls.clone()).periodic(false).subscribe(|_| {});
        sub.loaded().await;

        tokio::time::sleep(INTERVAL * 2).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        sub.refresh();
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
