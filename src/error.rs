//! Top-level error type for the whole pipeline (`std`-only).
//!
//! The core modules (`geometry`, `config`, `canvas`, `placement`) keep
//! plain, dependency-free error enums so they stay usable without `std`;
//! this is the `thiserror`-derived adapter a caller that actually has a
//! [`crate::resizer::Resizer`] sees from [`crate::conform`].

use crate::canvas::CanvasError;
use crate::config::ConfigError;

/// Any of the three fatal error kinds from spec §7. Nothing is retried or
/// swallowed — all three are fatal for the current call.
#[derive(Debug, thiserror::Error)]
pub enum Error<E: core::fmt::Debug + core::fmt::Display> {
    /// Configuration failed validation before the calculator ever ran.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),

    /// The calculator could not satisfy the declared constraints.
    #[error("invalid canvas: {0}")]
    CanvasInvalid(#[from] CanvasError),

    /// Propagated verbatim from the external `Resizer`. This crate
    /// contributes nothing to its content.
    #[error("renderer error: {0}")]
    Renderer(E),
}
