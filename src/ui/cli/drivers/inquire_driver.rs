use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text, validator::Validation};

pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn prompt_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn prompt_text(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn prompt_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        let mut q = CustomType::<u64>::new(title)
            .with_default(default)
            .with_help_message(help);

        if min.is_some() || max.is_some() {
            q = q.with_validator(move |x: &u64| {
                if let Some(lo) = min {
                    if *x < lo {
                        return Ok(Validation::Invalid(format!("Must be ≥ {lo}").into()));
                    }
                }
                if let Some(hi) = max {
                    if *x > hi {
                        return Ok(Validation::Invalid(format!("Must be ≤ {hi}").into()));
                    }
                }
                Ok(Validation::Valid)
            });
        }

        Ok(q.prompt()?)
    }

    fn prompt_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        let mut q = CustomType::<f64>::new(title)
            .with_default(default)
            .with_help_message(help);

        if min.is_some() || max.is_some() {
            q = q.with_validator(move |x: &f64| {
                if let Some(lo) = min {
                    if *x < lo {
                        return Ok(Validation::Invalid(format!("Must be ≥ {lo}").into()));
                    }
                }
                if let Some(hi) = max {
                    if *x > hi {
                        return Ok(Validation::Invalid(format!("Must be ≤ {hi}").into()));
                    }
                }
                Ok(Validation::Valid)
            });
        }

        Ok(q.prompt()?)
    }

    fn prompt_select(&self, title: &str, items: Vec<String>) -> Result<usize> {
        Ok(Select::new(title, items).raw_prompt()?.index)
    }
}
