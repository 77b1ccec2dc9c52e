use std::io::{self, BufRead, Write};

use clap::Parser;
use glyco_client::config::ClientConfig;
use glyco_client::error::ClientError;
use glyco_core::error::CoreError;
use glyco_core::fields::FieldName;

use crate::render::render_form;
use crate::session::IntakeSession;

#[derive(Parser, Debug)]
#[command(
    name = "glyco-intake",
    about = "Collect clinical measurements and request a diabetes risk assessment."
)]
pub struct Args {
    /// Field values as `Name=value`, e.g. `Glucose=148 BMI=33.6`.
    #[arg(value_name = "FIELD=VALUE")]
    pub values: Vec<String>,

    /// Prediction service base URL. Defaults to $GLYCO_API_URL, then
    /// http://localhost:8000.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Refuse to submit when a field is not numeric.
    #[arg(long)]
    pub strict: bool,

    /// Submit blank fields as-is instead of prompting for them.
    #[arg(long)]
    pub no_prompt: bool,

    /// Probe the service root before submitting.
    #[arg(long)]
    pub health: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

/// Split `Name=value`. The name is matched case-insensitively and the
/// value is kept verbatim, including empty or non-numeric text.
pub fn parse_assignment(arg: &str) -> Result<(FieldName, String), CoreError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| CoreError::MalformedAssignment(arg.to_string()))?;
    Ok((name.parse()?, value.to_string()))
}

/// `--api-url` when given, otherwise the environment value, otherwise the
/// default service address.
pub fn resolve_config(
    api_url: Option<&str>,
    env_value: Option<&str>,
) -> Result<ClientConfig, ClientError> {
    match api_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env_value(env_value),
    }
}

/// Prompt on `output` for every blank field, reading answers from `input`.
///
/// Each prompted field holds focus while it is asked for. Stops quietly at
/// end of input, leaving the remaining fields blank.
pub fn prompt_missing(
    session: &mut IntakeSession,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    for field in session.form().blank_fields() {
        session.set_focus(Some(field));
        write!(output, "{}", render_form(session.form(), false))?;
        write!(output, "{}: ", field.label())?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        session.set_focus(None);
        if read == 0 {
            break;
        }
        session.set_value(field, line.trim_end_matches(['\r', '\n']));
    }
    Ok(())
}
