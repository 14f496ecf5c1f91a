//! Result code to name translation.

use tracing::debug;

use crate::traits::ApplicationCatalog;
use crate::types::ApplicationErrorCode;

/// Name reported when the runtime cannot name a code.
pub const UNKNOWN_ERROR_NAME: &str = "unknown error";

/// Turns catalog result codes into the runtime's own names for them.
#[derive(Debug)]
pub struct ErrorTranslator<'c, C: ApplicationCatalog + ?Sized> {
    catalog: &'c C,
}

impl<'c, C: ApplicationCatalog + ?Sized> ErrorTranslator<'c, C> {
    /// Create a translator backed by `catalog`.
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// The runtime's name for `code`, or [`UNKNOWN_ERROR_NAME`] if the
    /// lookup fails or comes back empty.
    #[must_use]
    pub fn name_of(&self, code: ApplicationErrorCode) -> String {
        match self.catalog.error_name_from_code(code) {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => {
                debug!(code = code.raw(), "runtime returned an empty error name");
                UNKNOWN_ERROR_NAME.to_owned()
            },
            Err(e) => {
                debug!(code = code.raw(), error = %e, "error name lookup failed");
                UNKNOWN_ERROR_NAME.to_owned()
            },
        }
    }
}
