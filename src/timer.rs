use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cancellable single-shot timer. Scheduling again aborts the pending run,
/// so repeated triggers inside the delay collapse into the last one.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Runs `task` once the delay has elapsed without another schedule or
    /// cancel. Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A flag that lowers itself a fixed time after being raised, such as the
/// "just saved" acknowledgement.
pub struct Flash {
    raised: Arc<watch::Sender<bool>>,
    reset: Debouncer,
}

impl Flash {
    pub fn new(hold: Duration) -> Self {
        let (raised, _) = watch::channel(false);
        Self {
            raised: Arc::new(raised),
            reset: Debouncer::new(hold),
        }
    }

    pub fn raise(&mut self) {
        self.raised.send_replace(true);
        let raised = self.raised.clone();
        self.reset.schedule(async move {
            raised.send_replace(false);
        });
    }

    pub fn lower(&mut self) {
        self.reset.cancel();
        self.raised.send_replace(false);
    }

    pub fn is_raised(&self) -> bool {
        *self.raised.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.raised.subscribe()
    }
}
