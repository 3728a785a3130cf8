//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` - config, report, export, transcript and saved-session structs.
//! - `constants.rs` - answer vocabulary and stable defaults.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and saved sessions.
//! Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
