//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` - catalog inspection commands.
//! - `runtime.rs` - run/start/answer/status/questions/refine/tokens.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::handle_catalog_commands;
pub use runtime::handle_runtime_commands;

use crate::catalog::{Catalog, CatalogLoadError};
use crate::domain::models::ConfigFile;
use crate::services::confusion::ConfusionMap;
use std::path::PathBuf;

/// Resolved settings shared by every command.
pub struct Context {
    pub json: bool,
    pub config: ConfigFile,
    pub catalog_path: PathBuf,
    pub confusion_path: Option<PathBuf>,
}

impl Context {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        Catalog::load(&self.catalog_path)
    }

    pub fn load_confusion(&self) -> anyhow::Result<Option<ConfusionMap>> {
        self.confusion_path
            .as_deref()
            .map(ConfusionMap::load)
            .transpose()
    }
}
