//! Headless replay: run a recorded event script and export the drawing.
//!
//!   sketchpad --script events.json --output drawing.png
//!   sketchpad --state-dir ./state --output latest.png      (export what was saved)
//!
//! The canvas persists in the state directory between runs, like the browser
//! keeps it in `localStorage`.

use crate::app::AppConfig;
use crate::error::{SketchError, SketchResult};
use crate::script::parse_script;
use crate::shortcuts::ShortcutRegistry;
use crate::sketchpad::Sketchpad;
use clap::Parser;
use sketchpad_core::storage::FileStorage;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Sketchpad headless replay.
#[derive(Parser, Debug)]
#[command(
    name = "sketchpad",
    about = "Replay recorded sketchpad events and export the drawing as PNG"
)]
pub struct CliArgs {
    /// JSON array of input events and toolbox actions to replay.
    #[arg(short, long, value_name = "EVENTS.json")]
    pub script: Option<PathBuf>,

    /// Where to write the flattened PNG.
    #[arg(short, long, value_name = "FILE", default_value = "drawing.png")]
    pub output: PathBuf,

    /// Directory holding the persisted canvas. Defaults to the platform data dir.
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, value_name = "CONFIG.json")]
    pub config: Option<PathBuf>,

    /// Canvas width, overriding the config.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height, overriding the config.
    #[arg(long)]
    pub height: Option<u32>,

    /// Clear the persisted canvas before replaying.
    #[arg(long)]
    pub fresh: bool,

    /// Print keyboard shortcuts and exit.
    #[arg(long)]
    pub shortcuts: bool,
}

impl CliArgs {
    /// Effective configuration: file (or defaults) with flag overrides.
    pub fn resolve_config(&self) -> SketchResult<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(dir) = &self.state_dir {
            config.storage_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Parse arguments and run.
pub fn run() -> ExitCode {
    let args = CliArgs::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn execute(args: &CliArgs) -> SketchResult<()> {
    if args.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let config = args.resolve_config()?;
    let storage = match &config.storage_dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    log::info!("Canvas state in {}", storage.base_path().display());

    let mut sketchpad = Sketchpad::new(&config, Arc::new(storage))?;
    if args.fresh {
        sketchpad.clear()?;
    }

    if let Some(path) = &args.script {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SketchError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let steps = parse_script(&json)?;
        log::info!("Replaying {} step(s) from {}", steps.len(), path.display());
        sketchpad.run_script(&steps)?;
    }

    let download = sketchpad.download()?;
    std::fs::write(&args.output, &download.bytes).map_err(|e| {
        SketchError::Io(format!("Failed to write {}: {}", args.output.display(), e))
    })?;
    log::info!(
        "Wrote {} ({} bytes, {} snapshot(s) in history)",
        args.output.display(),
        download.bytes.len(),
        sketchpad.history().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::storage::{CANVAS_STATE_KEY, Storage};
    use tempfile::tempdir;

    fn args(dir: &std::path::Path, script: Option<PathBuf>) -> CliArgs {
        CliArgs::parse_from([
            "sketchpad",
            "--state-dir",
            dir.join("state").to_str().unwrap(),
            "--output",
            dir.join("out.png").to_str().unwrap(),
            "--width",
            "64",
            "--height",
            "48",
        ])
        .with_script(script)
    }

    impl CliArgs {
        fn with_script(mut self, script: Option<PathBuf>) -> Self {
            self.script = script;
            self
        }
    }

    #[test]
    fn test_flag_overrides() {
        let dir = tempdir().unwrap();
        let config = args(dir.path(), None).resolve_config().unwrap();
        assert_eq!((config.width, config.height), (64, 48));
        assert_eq!(config.storage_dir, Some(dir.path().join("state")));
    }

    #[test]
    fn test_replay_persists_and_exports() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("events.json");
        std::fs::write(
            &script,
            r#"[
                {"action": "setTool", "tool": "line"},
                {"type": "pointerDown", "x": 30, "y": 90},
                {"type": "pointerMove", "x": 80, "y": 120},
                {"type": "pointerUp", "x": 80, "y": 120}
            ]"#,
        )
        .unwrap();

        execute(&args(dir.path(), Some(script))).unwrap();

        let png = std::fs::read(dir.path().join("out.png")).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let storage = FileStorage::new(dir.path().join("state")).unwrap();
        assert!(storage.contains(CANVAS_STATE_KEY).unwrap());
    }

    #[test]
    fn test_missing_script_is_an_error() {
        let dir = tempdir().unwrap();
        let result = execute(&args(dir.path(), Some(dir.path().join("nope.json"))));
        assert!(matches!(result, Err(SketchError::Io(_))));
    }
}
