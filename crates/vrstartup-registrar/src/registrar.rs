//! The registration workflow.

use tracing::{debug, info_span};
use vrstartup_manifest::{ApplicationRecord, ManifestBuilder, PreparedManifest};
use vrstartup_runtime::{ApplicationCatalog, ApplicationType, RuntimeSession, VrRuntime};

use crate::error::RegistrationError;
use crate::outcome::{RegistrationOutcome, RegistrationState};
use crate::pause::{INSTALL_CONFIRMATION_WAIT, Pause, ThreadSleep};
use crate::progress::{ProgressSink, Reporter};

/// Registers applications with a VR runtime.
///
/// Owns the runtime handle; each [`register`](Self::register) call opens its
/// own session on it and releases that session before returning.
#[derive(Debug)]
pub struct ApplicationRegistrar<R: VrRuntime, P: Pause = ThreadSleep> {
    runtime: R,
    pause: P,
    application_type: ApplicationType,
    reached: RegistrationState,
}

impl<R: VrRuntime> ApplicationRegistrar<R> {
    /// Create a registrar that sleeps the thread for the install wait.
    pub fn new(runtime: R) -> Self {
        Self::with_pause(runtime, ThreadSleep)
    }
}

impl<R: VrRuntime, P: Pause> ApplicationRegistrar<R, P> {
    /// Create a registrar with a custom [`Pause`].
    pub fn with_pause(runtime: R, pause: P) -> Self {
        Self {
            runtime,
            pause,
            application_type: ApplicationType::default(),
            reached: RegistrationState::Idle,
        }
    }

    /// Connect to the runtime as `application_type` instead of
    /// [`ApplicationType::Utility`].
    #[must_use]
    pub fn with_application_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = application_type;
        self
    }

    /// The application type sessions are opened with.
    #[must_use]
    pub fn application_type(&self) -> ApplicationType {
        self.application_type
    }

    /// Last state reached by the most recent [`register`](Self::register)
    /// call, including one that panicked.
    #[must_use]
    pub fn last_reached(&self) -> RegistrationState {
        self.reached
    }

    /// The runtime handle.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Consume the registrar and return the runtime handle.
    pub fn into_runtime(self) -> R {
        self.runtime
    }

    /// Register `record` with the runtime and enable auto-launch for it.
    ///
    /// Progress lines are delivered to `progress` in order. Failures never
    /// escape as errors; they are reported in the returned outcome together
    /// with the last state reached.
    pub fn register(
        &mut self,
        record: &ApplicationRecord,
        progress: &mut dyn ProgressSink,
    ) -> RegistrationOutcome {
        let span = info_span!("register", app_key = %record.app_key());
        let _enter = span.enter();

        let mut reporter = Reporter::new(progress);
        let prepared = ManifestBuilder::prepare(record);
        self.reached = RegistrationState::Idle;

        let result = self.run(record, &prepared, &mut reporter);
        let state = self.reached;
        debug!(reached = ?state, ok = result.is_ok(), "registration finished");

        let PreparedManifest { app_key, path, .. } = prepared;
        match result {
            Ok(()) => {
                reporter.success(format!("Registered {app_key} with auto-launch enabled."));
                reporter.info("Restart the VR runtime for the change to take effect.");
                RegistrationOutcome::success(app_key, path)
            },
            Err(e) => {
                let stage = e.stage();
                reporter.error(format!("{stage} failed: {e}"));
                RegistrationOutcome::failed(app_key, path, state, stage, e.to_string())
            },
        }
    }

    fn run(
        &mut self,
        record: &ApplicationRecord,
        prepared: &PreparedManifest,
        reporter: &mut Reporter<'_>,
    ) -> Result<(), RegistrationError> {
        reporter.info(format!("Target: {}", record.binary_path().display()));
        reporter.info(format!("Key: {}", prepared.app_key));

        prepared
            .document
            .write_to(&prepared.path)
            .map_err(RegistrationError::ManifestWrite)?;
        self.reached = RegistrationState::ManifestWritten;
        reporter.info(format!("Manifest written to {}", prepared.path.display()));

        reporter.info("Connecting to the VR runtime...");
        let mut session = RuntimeSession::acquire(&mut self.runtime, self.application_type)
            .map_err(RegistrationError::SessionInit)?;
        self.reached = RegistrationState::SessionOpen;

        let result = register_in_session(
            &mut session,
            prepared,
            &self.pause,
            &mut self.reached,
            reporter,
        );
        session.release();
        result
    }
}

fn register_in_session<R: VrRuntime, P: Pause>(
    session: &mut RuntimeSession<'_, R>,
    prepared: &PreparedManifest,
    pause: &P,
    state: &mut RegistrationState,
    reporter: &mut Reporter<'_>,
) -> Result<(), RegistrationError> {
    let app_key = prepared.app_key.as_str();

    reporter.info("Registering manifest...");
    let code = session
        .catalog()?
        .add_application_manifest(&prepared.path, false)?;
    if !code.is_success() {
        let name = session.translator()?.name_of(code);
        return Err(RegistrationError::Catalog { name, code });
    }
    *state = RegistrationState::ManifestRegistered;

    if session.catalog()?.is_application_installed(app_key)? {
        *state = RegistrationState::InstallConfirmed;
    } else {
        reporter.warn("The runtime does not list the application yet; waiting briefly...");
        pause.pause(INSTALL_CONFIRMATION_WAIT);
        *state = RegistrationState::InstallAssumedAfterWait;
    }

    reporter.info("Enabling auto-launch...");
    let code = session
        .catalog()?
        .set_application_auto_launch(app_key, true)?;
    if !code.is_success() {
        let name = session.translator()?.name_of(code);
        return Err(RegistrationError::AutoLaunch { name, code });
    }
    *state = RegistrationState::AutoLaunchSet;

    Ok(())
}
