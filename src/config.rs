use anyhow::{Context, Result};
use ripple::{BrushParams, EngineParams};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::Args;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) brush: BrushParams,
    pub(crate) engine: EngineParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            brush: BrushParams::default(),
            engine: EngineParams::default(),
        }
    }
}

impl Settings {
    /// File values first, then whatever the command line says explicitly.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let mut s = match &args.config {
            Some(path) => load_settings(path),
            None => Settings::default(),
        };
        if let Some(fps) = args.fps {
            s.fps_cap = fps;
        }
        if let Some(n) = args.substeps {
            s.engine.substeps = n;
        }
        if let Some(g) = args.gamma_shift {
            s.engine.gamma_shift = g;
        }
        if args.parallel {
            s.engine.parallel = true;
        }
        s.fps_cap = s.fps_cap.clamp(1, 240);
        s.engine
            .validate()
            .context("engine settings rejected")?;
        s.brush.validate().context("brush settings rejected")?;
        Ok(s)
    }
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ripple-{}-{name}", std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        assert_eq!(
            load_settings(Path::new("/definitely/not/here.json")),
            Settings::default()
        );
        let path = temp_file("broken.json", "{ not json");
        assert_eq!(load_settings(&path), Settings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let path = temp_file(
            "partial.json",
            r#"{ "fps_cap": 24, "engine": { "gamma_shift": 10 } }"#,
        );
        let s = load_settings(&path);
        assert_eq!(s.fps_cap, 24);
        assert_eq!(s.engine.gamma_shift, 10);
        assert_eq!(s.engine.substeps, 4);
        assert_eq!(s.brush, BrushParams::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn command_line_overrides_file() {
        let path = temp_file("cli.json", r#"{ "fps_cap": 24 }"#);
        let args = Args::parse_from([
            "ripple",
            "--config",
            path.to_str().unwrap(),
            "--fps",
            "90",
            "--substeps",
            "2",
            "--parallel",
        ]);
        let s = Settings::resolve(&args).unwrap();
        assert_eq!(s.fps_cap, 90);
        assert_eq!(s.engine.substeps, 2);
        assert!(s.engine.parallel);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_engine_settings_are_an_error() {
        let args = Args::parse_from(["ripple", "--gamma-shift", "40"]);
        assert!(Settings::resolve(&args).is_err());
    }

    #[test]
    fn oversized_brush_in_file_is_an_error() {
        let path = temp_file("brush.json", r#"{ "brush": { "radius": 50000 } }"#);
        assert_eq!(load_settings(&path).brush.radius, 50_000);
        let args = Args::parse_from(["ripple", "--config", path.to_str().unwrap()]);
        let err = Settings::resolve(&args).unwrap_err();
        assert_eq!(err.to_string(), "brush settings rejected");
        let _ = fs::remove_file(path);
    }
}
