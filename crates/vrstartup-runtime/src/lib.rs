//! vrstartup Runtime - scoped access to the VR runtime's application catalog.
//!
//! The runtime itself is an external collaborator, reached through two
//! traits:
//! - [`VrRuntime`] connects to and disconnects from the runtime process
//! - [`ApplicationCatalog`] is the application-management interface a live
//!   connection hands out
//!
//! [`RuntimeSession`] ties the two together so that a connection, once made,
//! is shut down exactly once when the session leaves scope. Catalog result
//! codes are turned into readable names by [`ErrorTranslator`].
//!
//! With the `openvr` feature (on by default) [`OpenVrRuntime`] provides the
//! native implementation on top of the runtime's `openvr_api` library.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod session;
mod traits;
mod translate;
mod types;

#[cfg(feature = "openvr")]
mod openvr;

pub use error::{RuntimeError, RuntimeResult};
pub use session::RuntimeSession;
pub use traits::{ApplicationCatalog, VrRuntime};
pub use translate::{ErrorTranslator, UNKNOWN_ERROR_NAME};
pub use types::{ApplicationErrorCode, ApplicationType};

#[cfg(feature = "openvr")]
pub use openvr::{OpenVrCatalog, OpenVrRuntime};
