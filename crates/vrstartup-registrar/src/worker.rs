//! Background execution of registrations.
//!
//! A registration blocks on runtime calls and on the install wait, so it
//! runs on Tokio's blocking pool. Progress lines and the final outcome come
//! back over an unbounded channel in the order they were produced.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use vrstartup_manifest::{AppKey, ApplicationRecord, ManifestBuilder};
use vrstartup_runtime::VrRuntime;

use crate::outcome::{FailureStage, RegistrationOutcome, RegistrationState};
use crate::pause::{Pause, ThreadSleep};
use crate::progress::{ProgressLine, ProgressSink};
use crate::registrar::ApplicationRegistrar;

/// Errors from [`RegistrationWorker::dispatch`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// A registration is already running.
    #[error("a registration is already in progress")]
    Busy,

    /// `dispatch` was called outside a Tokio runtime.
    #[error("no Tokio runtime is available to run the registration")]
    NoRuntime,
}

/// Whether the worker can accept a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Ready.
    Idle,
    /// A registration is running.
    Busy,
}

/// Something a running registration reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationEvent {
    /// A progress line.
    Progress(ProgressLine),
    /// The registration ended. Always the last event.
    Finished(RegistrationOutcome),
}

impl ProgressSink for mpsc::UnboundedSender<RegistrationEvent> {
    fn emit(&mut self, line: ProgressLine) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(RegistrationEvent::Progress(line));
    }
}

/// Runs one registration at a time off the caller's thread.
pub struct RegistrationWorker<R: VrRuntime, P: Pause = ThreadSleep> {
    registrar: Arc<Mutex<ApplicationRegistrar<R, P>>>,
    busy: Arc<AtomicBool>,
}

impl<R, P> RegistrationWorker<R, P>
where
    R: VrRuntime + Send + 'static,
    P: Pause + Send + 'static,
{
    /// Wrap a registrar.
    pub fn new(registrar: ApplicationRegistrar<R, P>) -> Self {
        Self {
            registrar: Arc::new(Mutex::new(registrar)),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        if self.busy.load(Ordering::Acquire) {
            WorkerState::Busy
        } else {
            WorkerState::Idle
        }
    }

    /// Start registering `record` in the background.
    ///
    /// The worker is busy until the registration ends, whether it succeeds,
    /// fails or panics.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Busy`] while another registration is running,
    /// or [`WorkerError::NoRuntime`] when called outside a Tokio runtime.
    pub fn dispatch(&self, record: ApplicationRecord) -> Result<RegistrationTask, WorkerError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| WorkerError::NoRuntime)?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(app_key = %record.app_key(), "registration refused, worker busy");
            return Err(WorkerError::Busy);
        }
        let guard = BusyGuard {
            busy: Arc::clone(&self.busy),
        };

        let prepared = ManifestBuilder::prepare(&record);
        let app_key = prepared.app_key;
        let manifest_path = prepared.path;

        let (tx, rx) = mpsc::unbounded_channel();
        let registrar = Arc::clone(&self.registrar);
        let fallback = (app_key.clone(), manifest_path.clone());

        let join = handle.spawn_blocking(move || {
            let mut sink = tx.clone();
            let (caught, reached) = {
                let mut registrar = registrar.lock().unwrap_or_else(PoisonError::into_inner);
                let caught =
                    catch_unwind(AssertUnwindSafe(|| registrar.register(&record, &mut sink)));
                (caught, registrar.last_reached())
            };
            let outcome = caught.unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                error!(app_key = %fallback.0, ?reached, %message, "registration panicked");
                RegistrationOutcome::failed(
                    fallback.0,
                    fallback.1,
                    reached,
                    FailureStage::Unexpected,
                    message,
                )
            });
            // Clear busy before announcing completion so a caller reacting
            // to `Finished` can dispatch again immediately.
            drop(guard);
            let _ = tx.send(RegistrationEvent::Finished(outcome.clone()));
            outcome
        });

        Ok(RegistrationTask {
            events: rx,
            join,
            app_key,
            manifest_path,
        })
    }
}

impl<R: VrRuntime, P: Pause> std::fmt::Debug for RegistrationWorker<R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationWorker")
            .field("busy", &self.busy.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Handle to a dispatched registration.
#[derive(Debug)]
pub struct RegistrationTask {
    events: mpsc::UnboundedReceiver<RegistrationEvent>,
    join: JoinHandle<RegistrationOutcome>,
    app_key: AppKey,
    manifest_path: PathBuf,
}

impl RegistrationTask {
    /// Key being registered.
    #[must_use]
    pub fn app_key(&self) -> &AppKey {
        &self.app_key
    }

    /// Next event, or `None` once the registration has ended and every
    /// event has been received.
    pub async fn next_event(&mut self) -> Option<RegistrationEvent> {
        self.events.recv().await
    }

    /// Wait for the registration to end, discarding unread events.
    pub async fn outcome(self) -> RegistrationOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => RegistrationOutcome::failed(
                self.app_key,
                self.manifest_path,
                RegistrationState::Idle,
                FailureStage::Unexpected,
                e.to_string(),
            ),
        }
    }
}

struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "registration panicked".to_owned()
    }
}
