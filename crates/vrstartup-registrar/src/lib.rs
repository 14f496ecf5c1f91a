//! vrstartup Registrar - register an executable with the VR runtime and
//! enable auto-launch for it.
//!
//! [`ApplicationRegistrar::register`] runs the whole workflow synchronously:
//!
//! 1. build the manifest for the record
//! 2. write it next to the executable
//! 3. open a [`RuntimeSession`](vrstartup_runtime::RuntimeSession)
//! 4. submit the manifest as a permanent catalog entry
//! 5. check the key is installed, waiting once for
//!    [`INSTALL_CONFIRMATION_WAIT`] if it is not
//! 6. enable auto-launch
//!
//! Each step can end the attempt; the outcome names the step that did. The
//! session, once opened, is released on every path.
//!
//! [`RegistrationWorker`] runs registrations on a blocking worker thread and
//! streams progress lines and the outcome back over a channel, refusing a
//! second dispatch while one is in flight.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod outcome;
mod pause;
mod progress;
mod registrar;
mod worker;

pub use error::RegistrationError;
pub use outcome::{FailureStage, RegistrationOutcome, RegistrationState, RegistrationStatus};
pub use pause::{INSTALL_CONFIRMATION_WAIT, Pause, ThreadSleep};
pub use progress::{NullSink, ProgressLevel, ProgressLine, ProgressSink};
pub use registrar::ApplicationRegistrar;
pub use worker::{RegistrationEvent, RegistrationTask, RegistrationWorker, WorkerError, WorkerState};
