use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use carousel_core::{BreakpointThresholds, RotationSettings};
use serde::Deserialize;
use shared::{catalog::parse_catalog, domain::Item};
use tracing::{info, warn};

const BUNDLED_CATALOG: &str = include_str!("../assets/stats.toml");
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rotation: RotationSettings,
    pub viewport_width: u32,
    pub items_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rotation: RotationSettings {
                autoplay_on_mount: true,
                ..RotationSettings::default()
            },
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            items_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    interval_ms: Option<u64>,
    autoplay: Option<bool>,
    viewport_width: Option<u32>,
    items_path: Option<PathBuf>,
    breakpoints: Option<BreakpointThresholds>,
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub items_path: Option<PathBuf>,
    pub viewport_width: Option<u32>,
    pub interval_ms: Option<u64>,
    pub no_autoplay: bool,
}

/// Defaults, then the settings file if it exists, then `CAROUSEL__*`
/// environment variables, then command-line flags. Validated once, after
/// every layer has been applied.
pub fn resolve_settings(path: &Path, cli: &CliOverrides) -> anyhow::Result<Settings> {
    resolve_settings_with(path, cli, |key| std::env::var(key).ok())
}

fn resolve_settings_with(
    path: &Path,
    cli: &CliOverrides,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = load_settings_with(path, lookup)?;
    apply_cli_overrides(&mut settings, cli);
    validate(&settings)?;
    Ok(settings)
}

fn load_settings_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file_config(&mut settings, file_cfg);
            info!(path = %path.display(), "loaded settings file");
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, lookup);
    Ok(settings)
}

fn apply_cli_overrides(settings: &mut Settings, cli: &CliOverrides) {
    if let Some(path) = &cli.items_path {
        settings.items_path = Some(path.clone());
    }
    if let Some(width) = cli.viewport_width {
        settings.viewport_width = width;
    }
    if let Some(interval_ms) = cli.interval_ms {
        settings.rotation.interval_ms = interval_ms;
    }
    if cli.no_autoplay {
        settings.rotation.autoplay_on_mount = false;
    }
}

fn apply_file_config(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.interval_ms {
        settings.rotation.interval_ms = v;
    }
    if let Some(v) = file_cfg.autoplay {
        settings.rotation.autoplay_on_mount = v;
    }
    if let Some(v) = file_cfg.viewport_width {
        settings.viewport_width = v;
    }
    if let Some(v) = file_cfg.items_path {
        settings.items_path = Some(v);
    }
    if let Some(v) = file_cfg.breakpoints {
        settings.rotation.breakpoints = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CAROUSEL__INTERVAL_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.rotation.interval_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid CAROUSEL__INTERVAL_MS"),
        }
    }

    if let Some(v) = lookup("CAROUSEL__AUTOPLAY") {
        match parse_flag(&v) {
            Some(parsed) => settings.rotation.autoplay_on_mount = parsed,
            None => warn!(value = %v, "ignoring invalid CAROUSEL__AUTOPLAY"),
        }
    }

    if let Some(v) = lookup("CAROUSEL__VIEWPORT_WIDTH") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.viewport_width = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid CAROUSEL__VIEWPORT_WIDTH"),
        }
    }

    if let Some(v) = lookup("CAROUSEL__ITEMS_PATH") {
        if !v.trim().is_empty() {
            settings.items_path = Some(PathBuf::from(v));
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.rotation.interval_ms == 0 {
        bail!("interval_ms must be greater than zero");
    }
    let thresholds = settings.rotation.breakpoints;
    if thresholds.medium_min_width >= thresholds.wide_min_width {
        bail!(
            "breakpoints.medium_min_width ({}) must be below breakpoints.wide_min_width ({})",
            thresholds.medium_min_width,
            thresholds.wide_min_width
        );
    }
    Ok(())
}

/// Reads the catalog at `path`, or the bundled one when no path is set.
pub fn load_items(path: Option<&Path>) -> anyhow::Result<Vec<Item>> {
    let Some(path) = path else {
        return parse_catalog(BUNDLED_CATALOG).context("bundled catalog is invalid");
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read item catalog '{}'", path.display()))?;
    let items = parse_catalog(&raw)
        .with_context(|| format!("invalid item catalog '{}'", path.display()))?;
    info!(path = %path.display(), count = items.len(), "loaded item catalog");
    Ok(items)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
