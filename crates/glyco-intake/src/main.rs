use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use glyco_client::config::API_URL_ENV;
use glyco_client::controller::SubmissionController;
use glyco_client::health::check_health;
use glyco_client::transport::UreqTransport;
use glyco_core::interpret::DisplayModel;
use glyco_core::payload::StrictBuilder;
use glyco_intake::cli::{parse_assignment, prompt_missing, resolve_config, Args};
use glyco_intake::render::{render_display, render_form};
use glyco_intake::session::IntakeSession;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let env_url = env::var(API_URL_ENV).ok();
    let config = resolve_config(args.api_url.as_deref(), env_url.as_deref())?;
    tracing::info!(api = %config.api_base_url, "using prediction service");

    let transport = Arc::new(UreqTransport::new());
    if args.health {
        let health = check_health(transport.as_ref(), &config).await;
        println!("Service health: {}", health.status);
    }

    let controller = SubmissionController::new(transport, config);
    let mut session = IntakeSession::new(controller);
    if args.strict {
        session = session.with_builder(Box::new(StrictBuilder));
    }

    for arg in &args.values {
        let (field, value) = parse_assignment(arg)?;
        session.set_value(field, value);
    }

    if !args.no_prompt {
        let stdin = io::stdin();
        prompt_missing(&mut session, &mut stdin.lock(), &mut io::stdout())?;
    }

    println!("{}", render_form(session.form(), session.is_busy().await));
    let display = session.submit().await;
    println!("{}", render_display(&display));

    Ok(match display {
        DisplayModel::Assessment { .. } => ExitCode::SUCCESS,
        DisplayModel::Error { .. } => ExitCode::FAILURE,
    })
}
