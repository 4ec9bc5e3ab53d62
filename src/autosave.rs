use crate::storage::{AutoSaveRepository, StorageResult};
use crate::timer::Debouncer;
use crate::types::{AutoSaveStatus, AutoSavedDesign};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_millis(2500);
pub const AUTOSAVE_STATUS_HOLD: Duration = Duration::from_secs(2);

/// Debounced writer for the single autosave slot.
///
/// Every tracked change either restarts the quiet period with the newest
/// snapshot, or, when there is nothing worth saving, drops the pending
/// write. Status moves `Saving -> Saved -> Idle` and is published on a
/// watch channel for the front end.
///
/// Aborting the window cannot stop a write that is already running on
/// another worker, so writes and clears are serialized on `epoch`. A write
/// only lands if no `stop` or `discard` happened since it was scheduled.
pub struct Autosaver {
    slot: AutoSaveRepository,
    status: Arc<watch::Sender<AutoSaveStatus>>,
    window: Debouncer,
    status_hold: Duration,
    epoch: Arc<Mutex<u64>>,
}

fn lock_epoch(epoch: &Mutex<u64>) -> MutexGuard<'_, u64> {
    epoch.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Autosaver {
    pub fn new(slot: AutoSaveRepository, quiet_period: Duration, status_hold: Duration) -> Self {
        let (status, _) = watch::channel(AutoSaveStatus::Idle);
        Self {
            slot,
            status: Arc::new(status),
            window: Debouncer::new(quiet_period),
            status_hold,
            epoch: Arc::new(Mutex::new(0)),
        }
    }

    pub fn status(&self) -> AutoSaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutoSaveStatus> {
        self.status.subscribe()
    }

    pub fn restore(&self) -> Option<AutoSavedDesign> {
        self.slot.load()
    }

    /// Reacts to a change of the tracked session fields.
    pub fn track(&mut self, snapshot: Option<AutoSavedDesign>) {
        let Some(snapshot) = snapshot else {
            self.stop();
            return;
        };

        self.status.send_replace(AutoSaveStatus::Saving);
        let slot = self.slot.clone();
        let status = self.status.clone();
        let hold = self.status_hold;
        let epoch = self.epoch.clone();
        let scheduled = *lock_epoch(&self.epoch);
        self.window.schedule(async move {
            {
                let current = lock_epoch(&epoch);
                if *current != scheduled {
                    return;
                }
                if let Err(err) = slot.store(&snapshot) {
                    tracing::warn!(error = %err, "autosave write failed");
                    status.send_replace(AutoSaveStatus::Idle);
                    return;
                }
                tracing::debug!(messages = snapshot.chat_history.len(), "session autosaved");
                status.send_replace(AutoSaveStatus::Saved);
            }
            tokio::time::sleep(hold).await;
            status.send_replace(AutoSaveStatus::Idle);
        });
    }

    /// Drops any pending write. The stored snapshot is left alone.
    pub fn stop(&mut self) {
        self.window.cancel();
        *lock_epoch(&self.epoch) += 1;
        self.status.send_replace(AutoSaveStatus::Idle);
    }

    /// Drops any pending write and empties the slot. Waits for a write that
    /// is already in progress, then clears after it.
    pub fn discard(&mut self) -> StorageResult<()> {
        self.window.cancel();
        let mut epoch = lock_epoch(&self.epoch);
        *epoch += 1;
        let cleared = self.slot.clear();
        drop(epoch);
        self.status.send_replace(AutoSaveStatus::Idle);
        cleared
    }
}
