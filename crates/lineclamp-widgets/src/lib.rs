#![forbid(unsafe_code)]

//! Host-side line clamping.
//!
//! - [`Ellipsis`] - a clamped block that refits on mount, content, row and
//!   size changes and renders the accepted truncation
//! - [`EllipsisConfig`] - rows, glyphs and labels, from code or environment
//! - [`NativeClamp`] - renderer capabilities that make measurement unnecessary
//! - [`RefitTrigger`] - latest-wins next-frame refit scheduling
//!
//! # Feature Flags
//!
//! - `tracing`: spans and events around refits. Fit-level spans from
//!   `lineclamp-fit` are always emitted.

pub mod config;
pub mod ellipsis;
pub mod native;
pub mod refit;

pub use config::EllipsisConfig;
pub use ellipsis::{ClampState, Ellipsis};
pub use native::NativeClamp;
pub use refit::{RefitReason, RefitStats, RefitTrigger};
