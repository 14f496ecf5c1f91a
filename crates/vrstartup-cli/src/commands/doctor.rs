//! Doctor command for health checks.

use colored::Colorize;
use vrstartup_config::{ConfigResult, ResolvedConfig};

use crate::config_bridge;

/// Check configuration, the runtime client library and the runtime install.
pub(crate) fn run_doctor(loaded: ConfigResult<ResolvedConfig>) {
    println!("{}", "vrstartup Doctor - Environment Check".cyan().bold());
    println!();

    print!("  Checking configuration... ");
    let config = match loaded {
        Ok(resolved) => {
            println!("{}", "OK".green());
            if resolved.loaded_files.is_empty() {
                println!("    {}", "No config files, using defaults".dimmed());
            }
            for path in &resolved.loaded_files {
                println!("    Loaded: {path}");
            }
            println!("    Application type: {}", resolved.config.runtime.application_type);
            resolved.config
        },
        Err(e) => {
            println!("{}", "FAIL".red());
            println!("    {e}");
            println!("    Continuing with defaults");
            vrstartup_config::Config::default()
        },
    };

    let mut runtime = config_bridge::open_runtime(&config);

    print!("  Checking runtime client library... ");
    if let Err(e) = runtime.load() {
        println!("{}", "FAIL".red());
        println!("    {}", runtime.library_location().display());
        println!("    {e}");
        return;
    }
    println!("{}", "OK".green());
    println!("    {}", runtime.library_location().display());

    print!("  Checking runtime installation... ");
    match runtime.is_runtime_installed() {
        Ok(true) => println!("{}", "OK".green()),
        Ok(false) => {
            println!("{}", "WARN".yellow());
            println!("    No VR runtime is installed on this machine");
        },
        Err(e) => {
            println!("{}", "FAIL".red());
            println!("    {e}");
        },
    }
}
