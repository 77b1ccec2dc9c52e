//! Plain-text rendering of the form and its result.

use std::fmt;

use glyco_core::fields::{schema, PLACEHOLDER};
use glyco_core::form::FormValues;
use glyco_core::interpret::DisplayModel;

pub const SUBMIT_LABEL: &str = "Generate Risk Assessment";
pub const BUSY_LABEL: &str = "Processing Analysis...";
pub const GAUGE_WIDTH: usize = 20;

/// The field list with a `>` marker on the focused field, followed by the
/// submit trigger (disabled while `busy`).
pub fn render_form(form: &FormValues, busy: bool) -> String {
    FormView { form, busy }.to_string()
}

/// A bar of [`GAUGE_WIDTH`] cells, `#` for filled and `.` for empty.
pub fn gauge(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

pub fn render_display(display: &DisplayModel) -> String {
    ResultCard(display).to_string()
}

struct FormView<'a> {
    form: &'a FormValues,
    busy: bool,
}

impl fmt::Display for FormView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = schema().iter().map(|s| s.label.chars().count()).max().unwrap_or(0);

        writeln!(f, "Patient Information")?;
        for spec in schema() {
            let marker = if self.form.is_focused(spec.name) { '>' } else { ' ' };
            let text = self.form.value(spec.name);
            let shown = if text.is_empty() { PLACEHOLDER } else { text };
            writeln!(f, "{marker} {:<width$}  {shown}", spec.label)?;
        }
        let trigger = if self.busy { BUSY_LABEL } else { SUBMIT_LABEL };
        writeln!(f, "\n[ {trigger} ]")
    }
}

struct ResultCard<'a>(&'a DisplayModel);

impl fmt::Display for ResultCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            DisplayModel::Error { title, message } => {
                writeln!(f, "{title}")?;
                writeln!(f, "  {message}")
            }
            DisplayModel::Assessment {
                headline,
                classification,
                percentage,
                recommendation,
                ..
            } => {
                let fraction = self.0.gauge_fraction().unwrap_or_default();
                writeln!(f, "{headline}")?;
                writeln!(f, "Risk Classification: {classification}\n")?;
                writeln!(f, "Probability Analysis  {percentage}")?;
                writeln!(f, "{}\n", gauge(fraction))?;
                writeln!(f, "Clinical Recommendation")?;
                writeln!(f, "  {recommendation}")
            }
        }
    }
}
