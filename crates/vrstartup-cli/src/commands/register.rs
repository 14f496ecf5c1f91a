//! Register command.

use anyhow::{Context, Result};
use vrstartup_config::Config;
use vrstartup_manifest::{ApplicationRecord, suggest_display_name};
use vrstartup_registrar::{ApplicationRegistrar, RegistrationEvent, RegistrationWorker};

use crate::TargetArgs;
use crate::config_bridge;
use crate::theme::Theme;

/// Turn command-line target arguments into a record.
///
/// Relative paths are made absolute against the working directory, since
/// the runtime launches the executable from elsewhere.
pub(crate) fn resolve_record(config: &Config, target: &TargetArgs) -> Result<ApplicationRecord> {
    let executable = std::path::absolute(&target.executable)
        .with_context(|| format!("cannot resolve {}", target.executable.display()))?;

    let display_name = target
        .name
        .clone()
        .or_else(|| suggest_display_name(&executable))
        .unwrap_or_default();

    let record = ApplicationRecord::new(
        executable,
        display_name,
        target.is_overlay(config.registration.overlay),
    )?;
    Ok(record)
}

/// Register the target and stream progress. Returns whether it succeeded.
pub(crate) async fn run_register(config: &Config, target: &TargetArgs) -> Result<bool> {
    let record = resolve_record(config, target)?;
    if !record.binary_path().is_file() {
        println!(
            "{}",
            Theme::warning(&format!(
                "{} does not exist yet; registering anyway",
                record.binary_path().display()
            ))
        );
    }

    let registrar = ApplicationRegistrar::new(config_bridge::open_runtime(config))
        .with_application_type(config_bridge::application_type(config)?);
    let worker = RegistrationWorker::new(registrar);

    println!("{}", Theme::header("Registering application"));
    println!("{}", Theme::separator());

    let mut task = worker.dispatch(record)?;
    let mut outcome = None;
    while let Some(event) = task.next_event().await {
        match event {
            RegistrationEvent::Progress(line) => println!("  {}", Theme::progress(&line)),
            RegistrationEvent::Finished(finished) => outcome = Some(finished),
        }
    }
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => task.outcome().await,
    };

    println!("{}", Theme::separator());
    println!("{}", Theme::kv("Key", outcome.app_key.as_str()));
    println!(
        "{}",
        Theme::kv("Manifest", &outcome.manifest_path.display().to_string())
    );
    match outcome.failure_stage() {
        None => println!("{}", Theme::success("Registered")),
        Some(stage) => {
            tracing::debug!(reached = ?outcome.reached, %stage, "registration ended early");
            println!("{}", Theme::error(&format!("Failed during {stage}")));
        },
    }

    Ok(outcome.is_success())
}
