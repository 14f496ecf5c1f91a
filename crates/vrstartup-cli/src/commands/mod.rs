//! CLI commands.

pub(crate) mod config;
pub(crate) mod doctor;
pub(crate) mod kill_runtime;
pub(crate) mod manifest;
pub(crate) mod register;
