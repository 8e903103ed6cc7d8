use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use drivetree_lib::{NameOrder, OrganizerConfig, MAX_PAGE_SIZE};
use log::debug;
use serde::Deserialize;

use crate::{Cli, Command};

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: OrganizerConfig,
    pub token: Option<String>,
}

/// Merges built-in defaults, the global config file, an explicit `--config`
/// file and CLI flags, in increasing precedence.
pub fn build_run_settings(cli: &Cli) -> Result<RunSettings> {
    let mut config = OrganizerConfig::default();

    if !cli.no_config {
        if let Some(base_dirs) = BaseDirs::new() {
            let global_config_path = base_dirs.config_dir().join("drivetree").join("config.toml");
            apply_config_file(&global_config_path, &mut config)?;
        } else {
            debug!("No base directories available; skipping global config search");
        }

        if let Some(explicit_path) = cli.config_path.as_ref() {
            if !explicit_path.exists() {
                bail!("Config file {:?} does not exist", explicit_path);
            }
            apply_config_file(explicit_path, &mut config)?;
        }
    } else if let Some(explicit_path) = cli.config_path.as_ref() {
        debug!(
            "--no-config specified; skipping explicitly requested config file {:?}",
            explicit_path
        );
    }

    // CLI overrides (highest precedence)
    if let Some(api_base) = cli.api_base.as_ref() {
        config.api_base = api_base.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = checked_page_size(page_size, "--page-size")?;
    }
    match &cli.command {
        Command::List {
            name_width,
            ignore_case,
            ..
        } => {
            if let Some(width) = *name_width {
                config.render.name_width = checked_name_width(width, "--name-width")?;
            }
            if *ignore_case {
                config.render.name_order = NameOrder::CaseInsensitive;
            }
        }
        Command::Archive {
            folder: Some(folder),
        } => {
            config.archive_folder = checked_folder_name(folder, "--folder")?;
        }
        _ => {}
    }

    let token = cli
        .token
        .as_ref()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    debug!("Effective configuration: {:?}", config);
    Ok(RunSettings { config, token })
}

fn checked_page_size(value: u32, origin: &str) -> Result<u32> {
    if value == 0 || value > MAX_PAGE_SIZE {
        bail!("{} must be between 1 and {}", origin, MAX_PAGE_SIZE);
    }
    Ok(value)
}

fn checked_name_width(value: usize, origin: &str) -> Result<usize> {
    if value == 0 {
        bail!("{} must be greater than 0", origin);
    }
    Ok(value)
}

fn checked_folder_name(value: &str, origin: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{} must not be empty", origin);
    }
    Ok(trimmed.to_string())
}

fn apply_config_file(path: &Path, config: &mut OrganizerConfig) -> Result<()> {
    if !path.exists() {
        debug!("Config file {:?} not found; skipping", path);
        return Ok(());
    }

    debug!("Loading config from {:?}", path);
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;

    let parsed: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

    if let Some(section) = parsed.drivetree {
        apply_drivetree_section(section, config)?;
    }

    Ok(())
}

fn apply_drivetree_section(section: DrivetreeSection, config: &mut OrganizerConfig) -> Result<()> {
    if let Some(value) = section.api_base {
        config.api_base = value;
    }
    if let Some(value) = section.upload_base {
        config.upload_base = value;
    }
    if let Some(value) = section.page_size {
        config.page_size = checked_page_size(value, "drivetree.page_size")?;
    }
    if let Some(value) = section.archive_folder {
        config.archive_folder = checked_folder_name(&value, "drivetree.archive_folder")?;
    }
    if let Some(value) = section.name_width {
        config.render.name_width = checked_name_width(value, "drivetree.name_width")?;
    }
    if let Some(value) = section.name_order {
        config.render.name_order = match value {
            NameOrderSetting::CodePoint => NameOrder::CodePoint,
            NameOrderSetting::CaseInsensitive => NameOrder::CaseInsensitive,
        };
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    drivetree: Option<DrivetreeSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DrivetreeSection {
    api_base: Option<String>,
    upload_base: Option<String>,
    page_size: Option<u32>,
    archive_folder: Option<String>,
    name_width: Option<usize>,
    name_order: Option<NameOrderSetting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum NameOrderSetting {
    CodePoint,
    CaseInsensitive,
}
