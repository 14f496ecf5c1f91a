//! vrstartup Test - Shared test utilities.
//!
//! Provides a scriptable in-memory VR runtime and filesystem fixtures for use
//! as a dev-dependency.
//!
//! ```rust,ignore
//! use vrstartup_registrar::ApplicationRegistrar;
//! use vrstartup_test::{MockRuntime, RecordingPause, TargetFixture};
//!
//! let fixture = TargetFixture::new("MyOverlay.exe");
//! let runtime = MockRuntime::new();
//! let mut registrar = ApplicationRegistrar::with_pause(runtime.clone(), RecordingPause::new());
//! let outcome = registrar.register(&fixture.record("My Overlay", true), &mut Vec::new());
//!
//! assert!(outcome.is_success());
//! assert_eq!(runtime.shutdown_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
