//! Manifest preview command.

use anyhow::Result;
use vrstartup_config::Config;
use vrstartup_manifest::ManifestBuilder;

use crate::TargetArgs;
use crate::commands::register::resolve_record;
use crate::theme::Theme;

/// Print the manifest for a target, optionally writing it to disk.
pub(crate) fn run_manifest(config: &Config, target: &TargetArgs, write: bool) -> Result<()> {
    let record = resolve_record(config, target)?;
    let prepared = ManifestBuilder::prepare(&record);

    println!("{}", Theme::kv("Key", prepared.app_key.as_str()));
    println!(
        "{}",
        Theme::kv("Path", &prepared.path.display().to_string())
    );
    println!();
    println!("{}", prepared.document.to_json()?);

    if write {
        prepared.document.write_to(&prepared.path)?;
        println!();
        println!(
            "{}",
            Theme::success(&format!("Wrote {}", prepared.path.display()))
        );
    } else {
        println!();
        println!("{}", Theme::dimmed("Use --write to save it next to the executable."));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use vrstartup_manifest::ManifestDocument;

    use super::*;

    #[test]
    fn test_write_places_manifest_next_to_executable() {
        let dir = tempfile::tempdir().unwrap();
        let executable = dir.path().join("tracker.exe");
        std::fs::write(&executable, b"").unwrap();

        let target = TargetArgs {
            executable,
            name: Some("Tracker Bridge".to_owned()),
            overlay: false,
            no_overlay: true,
        };
        run_manifest(&Config::default(), &target, true).unwrap();

        let written = std::fs::read_to_string(dir.path().join("trackerbridge.vrmanifest")).unwrap();
        let document = ManifestDocument::from_json(&written).unwrap();
        assert_eq!(document.applications.len(), 1);
        assert_eq!(document.applications[0].app_key, "user.generated.trackerbridge");
        assert!(!document.applications[0].is_dashboard_overlay);
    }

    #[test]
    fn test_preview_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetArgs {
            executable: dir.path().join("tool.exe"),
            name: None,
            overlay: false,
            no_overlay: false,
        };
        run_manifest(&Config::default(), &target, false).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
