//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `tokenizer.rs` - report and keyword tokenization.
//! - `engine.rs` - resumable multi-pass inference over the catalog.
//! - `provider.rs` - answer provider trait, terminal/scripted providers, blocking driver.
//! - `reporter.rs` - report assembly, export and re-import of decisions.
//! - `confusion.rs` - optional "often confused with" decoration.
//! - `questions.rs` - stateless keyword/upstream question lists and code lookup.
//! - `storage.rs` - saved sessions + audit log.
//! - `config.rs` - config file loading and flag precedence.
//! - `output.rs` - JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod confusion;
pub mod engine;
pub mod output;
pub mod provider;
pub mod questions;
pub mod reporter;
pub mod storage;
pub mod tokenizer;
