use crate::services::engine::{AnswerMode, Continuation, Question};
use crate::services::tokenizer::ReportTokens;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_passes() -> u32 {
    super::constants::DEFAULT_PASSES
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonError {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Bad user-supplied input that is not a catalog or session problem.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct InvalidInput(pub String);

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_passes")]
    pub passes: u32,
    #[serde(default)]
    pub until_stable: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            until_stable: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
    pub confusion: Option<PathBuf>,
}

/// One prompt/answer exchange, in the order it happened.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub pass: u32,
    pub code: String,
    pub question: String,
    pub mode: AnswerMode,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HazardEntry {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub often_confused_with: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassificationReport {
    pub complete: bool,
    pub passes: u32,
    pub confirmed: Vec<HazardEntry>,
    pub rejected: Vec<HazardEntry>,
    pub transcript: Vec<TranscriptEntry>,
}

/// The part of a report that can seed a later run.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExportedClassification {
    #[serde(default)]
    pub confirmed: Vec<HazardEntry>,
    #[serde(default)]
    pub rejected: Vec<HazardEntry>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct QuestionItem {
    pub code: String,
    pub question: String,
    pub trigger: String,
}

#[derive(Serialize)]
pub struct CatalogIssue {
    pub code: String,
    pub status: String,
    pub detail: String,
}

#[derive(Serialize)]
pub struct CatalogReport {
    pub overall: String,
    pub hazards: usize,
    pub digest: String,
    pub issues: Vec<CatalogIssue>,
}

/// Everything needed to continue a classification in a later process.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: String,
    pub catalog_path: PathBuf,
    pub catalog_digest: String,
    #[serde(default)]
    pub confusion_path: Option<PathBuf>,
    pub tokens: ReportTokens,
    pub continuation: Continuation,
}

#[derive(Serialize)]
pub struct SessionView {
    pub session: String,
    pub question: Option<Question>,
    pub report: Option<ClassificationReport>,
}
