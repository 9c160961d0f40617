use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::ui::cli::drivers::PromptDriver;

/// One scripted wizard answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Bool(bool),
    Text(String),
    U64(u64),
    F64(f64),
    /// Index into the presented select items.
    Select(usize),
}

/// Prompt driver that replays a fixed list of answers, failing loudly when
/// the wizard asks for a different kind (or more) than the script holds.
pub struct ScriptedPrompts {
    answers: RefCell<VecDeque<Answer>>,
}

impl ScriptedPrompts {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
        }
    }

    fn next(&self, asked: &str, title: &str) -> Result<Answer> {
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("script exhausted at {asked} prompt {title:?}"),
        }
    }
}

impl PromptDriver for ScriptedPrompts {
    fn prompt_bool(&self, title: &str, _help: &str, _default: bool) -> Result<bool> {
        match self.next("bool", title)? {
            Answer::Bool(value) => Ok(value),
            other => bail!("script mismatch at bool prompt {title:?}: {other:?}"),
        }
    }

    fn prompt_text(&self, title: &str, _help: &str, _default: &str) -> Result<String> {
        match self.next("text", title)? {
            Answer::Text(value) => Ok(value),
            other => bail!("script mismatch at text prompt {title:?}: {other:?}"),
        }
    }

    fn prompt_u64(
        &self,
        title: &str,
        _help: &str,
        _default: u64,
        _min: Option<u64>,
        _max: Option<u64>,
    ) -> Result<u64> {
        match self.next("u64", title)? {
            Answer::U64(value) => Ok(value),
            other => bail!("script mismatch at u64 prompt {title:?}: {other:?}"),
        }
    }

    fn prompt_f64(
        &self,
        title: &str,
        _help: &str,
        _default: f64,
        _min: Option<f64>,
        _max: Option<f64>,
    ) -> Result<f64> {
        match self.next("f64", title)? {
            Answer::F64(value) => Ok(value),
            other => bail!("script mismatch at f64 prompt {title:?}: {other:?}"),
        }
    }

    fn prompt_select(&self, title: &str, _items: Vec<String>) -> Result<usize> {
        match self.next("select", title)? {
            Answer::Select(index) => Ok(index),
            other => bail!("script mismatch at select prompt {title:?}: {other:?}"),
        }
    }
}
