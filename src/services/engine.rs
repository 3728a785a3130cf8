//! Inference engine.
//!
//! Each pass walks the catalog in order. An undetermined hazard is asked about when one of its
//! upstream hazards is confirmed, otherwise when one of its keywords occurs in the report; the
//! first matching cue wins and at most one question is asked per hazard per pass. Confirmed and
//! rejected are terminal for the run.
//!
//! The engine never blocks. [`Session::submit`] takes one raw answer and returns the next
//! [`Step`], and [`Session::continuation`] captures everything needed to pick the run up again
//! in another process.

use crate::catalog::{Catalog, HazardDefinition};
use crate::domain::constants::{AFFIRMATIVE, DEFINE, NEGATIVE, REASON};
use crate::domain::models::TranscriptEntry;
use crate::services::tokenizer::ReportTokens;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// yes / no / define / reason
    Extended,
    /// yes / no
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Define,
    Reason,
    Unrecognized,
}

impl Answer {
    pub fn parse(raw: &str, mode: AnswerMode) -> Self {
        let a = raw.trim().to_lowercase();
        let a = a.as_str();
        if AFFIRMATIVE.contains(&a) {
            Answer::Yes
        } else if NEGATIVE.contains(&a) {
            Answer::No
        } else if mode == AnswerMode::Extended && DEFINE.contains(&a) {
            Answer::Define
        } else if mode == AnswerMode::Extended && REASON.contains(&a) {
            Answer::Reason
        } else {
            Answer::Unrecognized
        }
    }
}

/// What caused a hazard to be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Trigger {
    Upstream(String),
    Keyword(String),
}

impl Trigger {
    pub fn cue(&self) -> &str {
        match self {
            Trigger::Upstream(code) => code,
            Trigger::Keyword(word) => word,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Upstream(code) => write!(f, "upstream:{}", code),
            Trigger::Keyword(word) => write!(f, "keyword:{}", word),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUp {
    Define,
    Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub trigger: Trigger,
    #[serde(default)]
    pub follow_up: Option<FollowUp>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Question {
    pub code: String,
    pub name: String,
    pub text: String,
    pub mode: AnswerMode,
    pub trigger: Trigger,
    /// 1-based.
    pub pass: u32,
    /// Description (define) or triggering cue (reason) shown before a follow-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Ask(Question),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "passes", rename_all = "snake_case")]
pub enum PassPolicy {
    /// Exactly this many sweeps over the catalog.
    Fixed(u32),
    /// Sweep until a full pass confirms or rejects nothing.
    UntilStable,
}

impl Default for PassPolicy {
    fn default() -> Self {
        PassPolicy::Fixed(crate::domain::constants::DEFAULT_PASSES)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("catalog changed since session {0} started")]
    CatalogChanged(String),
    #[error("no question is pending")]
    NoPendingQuestion,
    #[error("corrupt session: {0}")]
    Corrupt(String),
}

/// Confirmed and rejected codes. A code is never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationState {
    confirmed: BTreeSet<String>,
    rejected: BTreeSet<String>,
}

impl ClassificationState {
    pub fn seeded<I, J>(confirmed: I, rejected: J) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let confirmed: BTreeSet<String> = confirmed.into_iter().collect();
        let rejected: BTreeSet<String> = rejected.into_iter().collect();
        if let Some(code) = confirmed.intersection(&rejected).next() {
            return Err(format!("{} is both confirmed and rejected", code));
        }
        Ok(Self {
            confirmed,
            rejected,
        })
    }

    pub fn confirmed(&self) -> &BTreeSet<String> {
        &self.confirmed
    }

    pub fn rejected(&self) -> &BTreeSet<String> {
        &self.rejected
    }

    pub fn is_confirmed(&self, code: &str) -> bool {
        self.confirmed.contains(code)
    }

    pub fn is_rejected(&self, code: &str) -> bool {
        self.rejected.contains(code)
    }

    pub fn is_decided(&self, code: &str) -> bool {
        self.is_confirmed(code) || self.is_rejected(code)
    }

    /// Returns false if the code was already decided.
    pub fn confirm(&mut self, code: &str) -> bool {
        !self.is_decided(code) && self.confirmed.insert(code.to_string())
    }

    /// Returns false if the code was already decided.
    pub fn reject(&mut self, code: &str) -> bool {
        !self.is_decided(code) && self.rejected.insert(code.to_string())
    }
}

/// Serializable snapshot of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub policy: PassPolicy,
    /// Completed passes.
    pub pass: u32,
    pub position: usize,
    pub progressed: bool,
    pub finished: bool,
    pub pending: Option<Pending>,
    pub state: ClassificationState,
    pub transcript: Vec<TranscriptEntry>,
}

pub struct Session<'a> {
    catalog: &'a Catalog,
    tokens: &'a ReportTokens,
    policy: PassPolicy,
    pass: u32,
    position: usize,
    progressed: bool,
    finished: bool,
    pending: Option<Pending>,
    state: ClassificationState,
    transcript: Vec<TranscriptEntry>,
}

impl<'a> Session<'a> {
    pub fn start(
        catalog: &'a Catalog,
        tokens: &'a ReportTokens,
        state: ClassificationState,
        policy: PassPolicy,
    ) -> (Self, Step) {
        let mut session = Self {
            catalog,
            tokens,
            policy,
            pass: 0,
            position: 0,
            progressed: false,
            finished: false,
            pending: None,
            state,
            transcript: Vec::new(),
        };
        let step = session.advance();
        (session, step)
    }

    pub fn resume(
        catalog: &'a Catalog,
        tokens: &'a ReportTokens,
        c: Continuation,
    ) -> Result<Self, SessionError> {
        if c.position > catalog.len() {
            return Err(SessionError::Corrupt(format!(
                "position {} beyond catalog of {} hazards",
                c.position,
                catalog.len()
            )));
        }
        if c.pending.is_some() && (c.finished || c.position >= catalog.len()) {
            return Err(SessionError::Corrupt(
                "pending question without a hazard".to_string(),
            ));
        }
        Ok(Self {
            catalog,
            tokens,
            policy: c.policy,
            pass: c.pass,
            position: c.position,
            progressed: c.progressed,
            finished: c.finished,
            pending: c.pending,
            state: c.state,
            transcript: c.transcript,
        })
    }

    pub fn continuation(&self) -> Continuation {
        Continuation {
            policy: self.policy,
            pass: self.pass,
            position: self.position,
            progressed: self.progressed,
            finished: self.finished,
            pending: self.pending.clone(),
            state: self.state.clone(),
            transcript: self.transcript.clone(),
        }
    }

    /// The pending question, or `Done`. Does not move the run forward.
    pub fn current(&self) -> Step {
        match &self.pending {
            Some(p) => Step::Ask(self.question(p)),
            None => Step::Done,
        }
    }

    pub fn state(&self) -> &ClassificationState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn passes(&self) -> u32 {
        self.pass
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_parts(self) -> (ClassificationState, Vec<TranscriptEntry>) {
        (self.state, self.transcript)
    }

    pub fn submit(&mut self, raw: &str) -> Result<Step, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPendingQuestion)?;
        let catalog = self.catalog;
        let hazard = &catalog.hazards()[self.position];
        let mode = if pending.follow_up.is_some() {
            AnswerMode::Binary
        } else {
            AnswerMode::Extended
        };
        self.transcript.push(TranscriptEntry {
            pass: self.pass + 1,
            code: hazard.code.clone(),
            question: hazard.question.clone(),
            mode,
            answer: raw.to_string(),
        });

        let answer = Answer::parse(raw, mode);
        match (pending.follow_up, answer) {
            (_, Answer::Yes) => {
                self.progressed |= self.state.confirm(&hazard.code);
                tracing::debug!(code = %hazard.code, "confirmed");
            }
            (None, Answer::No) => {
                self.progressed |= self.state.reject(&hazard.code);
                tracing::debug!(code = %hazard.code, "rejected");
            }
            (None, Answer::Define) => {
                self.pending = Some(Pending {
                    follow_up: Some(FollowUp::Define),
                    ..pending
                });
                return Ok(self.current());
            }
            (None, Answer::Reason) => {
                self.pending = Some(Pending {
                    follow_up: Some(FollowUp::Reason),
                    ..pending
                });
                return Ok(self.current());
            }
            // A follow-up only confirms; a negative one leaves the hazard open.
            _ => {
                tracing::debug!(code = %hazard.code, answer = raw, "no transition");
            }
        }
        self.position += 1;
        Ok(self.advance())
    }

    fn advance(&mut self) -> Step {
        let catalog = self.catalog;
        loop {
            if self.finished {
                return Step::Done;
            }
            if let PassPolicy::Fixed(n) = self.policy {
                if self.pass >= n {
                    self.finish();
                    continue;
                }
            }
            if self.position >= catalog.len() {
                self.pass += 1;
                self.position = 0;
                let stable = !std::mem::take(&mut self.progressed);
                tracing::debug!(pass = self.pass, stable, "pass complete");
                if self.policy == PassPolicy::UntilStable && stable {
                    self.finish();
                }
                continue;
            }

            let hazard = &catalog.hazards()[self.position];
            if self.state.is_decided(&hazard.code) {
                self.position += 1;
                continue;
            }
            match self.trigger_for(hazard) {
                Some(trigger) => {
                    tracing::debug!(code = %hazard.code, %trigger, pass = self.pass + 1, "asking");
                    let pending = Pending {
                        trigger,
                        follow_up: None,
                    };
                    let question = self.question(&pending);
                    self.pending = Some(pending);
                    return Step::Ask(question);
                }
                None => self.position += 1,
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        tracing::info!(
            passes = self.pass,
            confirmed = self.state.confirmed().len(),
            rejected = self.state.rejected().len(),
            "classification finished"
        );
    }

    /// Upstream confirmation takes priority over keyword hits.
    fn trigger_for(&self, hazard: &HazardDefinition) -> Option<Trigger> {
        hazard
            .upstream_hazards
            .iter()
            .find(|u| self.state.is_confirmed(u) && !self.state.is_rejected(u))
            .map(|u| Trigger::Upstream(u.clone()))
            .or_else(|| {
                hazard
                    .keywords
                    .iter()
                    .find(|k| self.tokens.contains(k))
                    .map(|k| Trigger::Keyword(k.clone()))
            })
    }

    fn question(&self, pending: &Pending) -> Question {
        let hazard = &self.catalog.hazards()[self.position];
        let (mode, detail) = match pending.follow_up {
            None => (AnswerMode::Extended, None),
            Some(FollowUp::Define) => (AnswerMode::Binary, Some(hazard.description.clone())),
            Some(FollowUp::Reason) => (AnswerMode::Binary, Some(pending.trigger.cue().to_string())),
        };
        Question {
            code: hazard.code.clone(),
            name: hazard.name.clone(),
            text: hazard.question.clone(),
            mode,
            trigger: pending.trigger.clone(),
            pass: self.pass + 1,
            detail,
        }
    }
}
