//! `apismith config`: read and write configuration values by dotted key.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `config_file` is the `--config` path; `set` edits that file when given.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(config_file);
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config)
                .with_cli_context(|| "Failed to serialise config")?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::config(format!("Unknown config key: '{key}'"))
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut value = table.get(parts.next()?)?;
    for part in parts {
        value = value.as_table()?.get(part)?;
    }
    Some(value)
}

fn as_table(config: &AppConfig) -> CliResult<Table> {
    match Value::try_from(config).with_cli_context(|| "Failed to serialise config")? {
        Value::Table(table) => Ok(table),
        _ => Err(CliError::config("configuration is not a table")),
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let table = as_table(config)?;
    match lookup(&table, key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Table(_)) | None => Err(unknown_key(key)),
        Some(other) => Ok(other.to_string()),
    }
}

/// Parse a command-line value into the most specific TOML scalar.
fn parse_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        Value::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else {
        Value::String(raw.to_string())
    }
}

/// Set `key` in the file at `path`, creating the file if needed.
///
/// Only leaf keys of [`AppConfig`] are accepted, and the edited file must
/// still deserialize, so a typo never reaches disk.
fn set_config_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    match lookup(&as_table(&AppConfig::default())?, key) {
        Some(Value::Table(_)) | None => return Err(unknown_key(key)),
        Some(_) => {}
    }

    let mut table: Table = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&text).with_cli_context(|| format!("Failed to parse '{}'", path.display()))?
    } else {
        Table::new()
    };

    let (sections, leaf) = key.rsplit_once('.').map_or((None, key), |(s, l)| (Some(s), l));
    let mut target = &mut table;
    for section in sections.into_iter().flat_map(|s| s.split('.')) {
        let entry = target
            .entry(section.to_string())
            .or_insert(Value::Table(Table::new()));
        target = entry
            .as_table_mut()
            .ok_or_else(|| CliError::config(format!("'{section}' is not a table")))?;
    }
    target.insert(leaf.to_string(), parse_scalar(raw));

    Value::Table(table.clone())
        .try_into::<AppConfig>()
        .with_cli_context(|| format!("Invalid value '{raw}' for '{key}'"))?;

    let text = toml::to_string_pretty(&table).with_cli_context(|| "Failed to serialise config")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use apismith_core::domain::{PythonVersion, Structure};
    use tempfile::TempDir;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.structure").unwrap(), "layered");
        assert_eq!(get_config_value(&cfg, "defaults.python_version").unwrap(), "3.12");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "sweep.jobs").unwrap(), "0");
    }

    #[test]
    fn get_unknown_or_section_key_is_error() {
        let cfg = AppConfig::default();
        for key in ["does.not.exist", "defaults", ""] {
            assert!(matches!(
                get_config_value(&cfg, key),
                Err(CliError::ConfigError { .. })
            ));
        }
    }

    #[test]
    fn set_creates_file_and_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set_config_value(&path, "defaults.structure", "flat").unwrap();
        set_config_value(&path, "defaults.python_version", "3.11").unwrap();
        set_config_value(&path, "sweep.jobs", "2").unwrap();
        set_config_value(&path, "output.progress", "false").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.structure, Structure::Flat);
        assert_eq!(cfg.defaults.python_version, PythonVersion::Py311);
        assert_eq!(cfg.sweep.jobs, 2);
        assert!(!cfg.output.progress);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        assert!(set_config_value(&path, "defaults.colour", "red").is_err());
        assert!(set_config_value(&path, "defaults.database", "oracle").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn scalars_prefer_bool_then_integer() {
        assert_eq!(parse_scalar("true"), Value::Boolean(true));
        assert_eq!(parse_scalar("8"), Value::Integer(8));
        assert_eq!(parse_scalar("3.12"), Value::String("3.12".into()));
    }
}
