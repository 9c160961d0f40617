use anyhow::Result;

/// Prompt seam of the interactive wizard.
///
/// Production code talks to the terminal through [`InquireDriver`]; tests
/// drive the wizard with scripted answers instead.
///
/// [`InquireDriver`]: super::InquireDriver
pub trait PromptDriver {
    fn prompt_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;

    /// Free-form line input; `default` pre-fills the buffer.
    fn prompt_text(&self, title: &str, help: &str, default: &str) -> Result<String>;

    /// Bounds are inclusive; a `None` side is unchecked.
    fn prompt_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64>;

    fn prompt_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64>;

    /// Presents the rendered `items` and returns the index of the one picked.
    fn prompt_select(&self, title: &str, items: Vec<String>) -> Result<usize>;
}
