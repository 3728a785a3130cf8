use crate::domain::constants::ANSWER_HELP;
use crate::services::engine::{AnswerMode, Question, Session, Step, Trigger};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Source of evaluator answers for a blocking run.
pub trait AnswerProvider {
    /// `Ok(None)` means no further answers will come and the run should stop.
    fn ask(&mut self, question: &Question) -> anyhow::Result<Option<String>>;
}

/// Prompts on `output`, reads one line of `input` per question.
pub struct TerminalProvider<R: BufRead, W: Write> {
    input: R,
    output: W,
    greeted: bool,
}

impl<R: BufRead, W: Write> TerminalProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            greeted: false,
        }
    }
}

impl<R: BufRead, W: Write> AnswerProvider for TerminalProvider<R, W> {
    fn ask(&mut self, q: &Question) -> anyhow::Result<Option<String>> {
        if !self.greeted {
            writeln!(self.output, "{}\n", ANSWER_HELP)?;
            self.greeted = true;
        }
        match q.mode {
            AnswerMode::Extended => {
                match &q.trigger {
                    Trigger::Upstream(code) => {
                        writeln!(self.output, "Upstream hazard {} already identified", code)?
                    }
                    Trigger::Keyword(word) => writeln!(self.output, "{}", word)?,
                }
                writeln!(self.output, "{} - {}", q.text, q.name)?;
                write!(self.output, "(y/n/d/r): ")?;
            }
            AnswerMode::Binary => {
                if let Some(detail) = &q.detail {
                    writeln!(self.output, "{}", detail)?;
                }
                write!(self.output, "(y/n): ")?;
            }
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Replays a fixed list of answers, e.g. from `--answers`.
pub struct ScriptedProvider {
    answers: VecDeque<String>,
    asked: Vec<Question>,
}

impl ScriptedProvider {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[Question] {
        &self.asked
    }
}

impl AnswerProvider for ScriptedProvider {
    fn ask(&mut self, q: &Question) -> anyhow::Result<Option<String>> {
        self.asked.push(q.clone());
        Ok(self.answers.pop_front())
    }
}

/// Drives `session` from `step` until it is done or the provider runs dry.
/// Returns whether the run completed.
pub fn drive(
    session: &mut Session<'_>,
    mut step: Step,
    provider: &mut dyn AnswerProvider,
) -> anyhow::Result<bool> {
    loop {
        let question = match step {
            Step::Done => return Ok(true),
            Step::Ask(q) => q,
        };
        match provider.ask(&question)? {
            Some(answer) => step = session.submit(&answer)?,
            None => {
                tracing::warn!(code = %question.code, "answers exhausted, run abandoned");
                return Ok(false);
            }
        }
    }
}
