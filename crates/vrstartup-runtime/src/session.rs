//! Scoped runtime connection.

use tracing::{debug, info};

use crate::error::{RuntimeError, RuntimeResult};
use crate::traits::VrRuntime;
use crate::translate::ErrorTranslator;
use crate::types::ApplicationType;

/// A live connection to the runtime and its application catalog.
///
/// Holds the runtime mutably for its whole lifetime, so a runtime can carry
/// at most one session at a time. Release is idempotent and also runs on
/// drop: whichever happens first shuts the runtime down, exactly once.
pub struct RuntimeSession<'r, R: VrRuntime> {
    runtime: &'r mut R,
    catalog: Option<R::Catalog>,
    application_type: ApplicationType,
    released: bool,
}

impl<'r, R: VrRuntime> RuntimeSession<'r, R> {
    /// Connect to the runtime and open its application catalog.
    ///
    /// If the connection succeeds but the catalog cannot be obtained, the
    /// connection is shut down before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unreachable`] if the runtime cannot be
    /// reached, or the catalog error if the interface is unavailable.
    pub fn acquire(runtime: &'r mut R, application_type: ApplicationType) -> RuntimeResult<Self> {
        runtime.init(application_type)?;
        debug!(%application_type, "runtime connection established");

        let mut session = Self {
            runtime,
            catalog: None,
            application_type,
            released: false,
        };
        // On failure `session` drops here and shuts the connection down.
        let catalog = session.runtime.application_catalog()?;
        session.catalog = Some(catalog);

        info!(%application_type, "runtime session opened");
        Ok(session)
    }

    /// The application catalog of this session.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::SessionClosed`] after [`release`](Self::release).
    pub fn catalog(&mut self) -> RuntimeResult<&mut R::Catalog> {
        self.catalog.as_mut().ok_or(RuntimeError::SessionClosed)
    }

    /// A translator backed by this session's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::SessionClosed`] after [`release`](Self::release).
    pub fn translator(&self) -> RuntimeResult<ErrorTranslator<'_, R::Catalog>> {
        self.catalog
            .as_ref()
            .map(ErrorTranslator::new)
            .ok_or(RuntimeError::SessionClosed)
    }

    /// The application type the session connected as.
    #[must_use]
    pub fn application_type(&self) -> ApplicationType {
        self.application_type
    }

    /// Whether the session is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.released
    }

    /// Close the catalog and shut the runtime connection down.
    ///
    /// Subsequent calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.catalog = None;
        self.runtime.shutdown();
        info!(application_type = %self.application_type, "runtime session released");
    }
}

impl<R: VrRuntime> Drop for RuntimeSession<'_, R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: VrRuntime> std::fmt::Debug for RuntimeSession<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeSession")
            .field("application_type", &self.application_type)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
