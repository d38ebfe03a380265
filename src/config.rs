//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>`
//! 2. `$APARTINT_CONFIG` environment variable
//! 3. `<config dir>/apartint/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use apartint::printer::DEFAULT_PRECISION;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    /// Integrals run by `apartint examples` after the built-in ones.
    pub examples: Vec<ExampleConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Significant digits of printed coefficients.
    pub precision: usize,
    /// Marker for the constant of integration.
    pub constant: String,
    /// Print result records as JSON.
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExampleConfig {
    pub name: String,
    pub numerator: String,
    pub denominator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            constant: "C".into(),
            json: false,
        }
    }
}

/// Load the config. A path given on the command line must exist, an
/// implicit one falls back to the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }

    match config_path(None) {
        Some(p) if p.exists() => read_config(&p),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the config file path.
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    if let Ok(p) = std::env::var("APARTINT_CONFIG") {
        return Some(PathBuf::from(p));
    }

    directories::BaseDirs::new().map(|d| d.config_dir().join("apartint").join("config.toml"))
}

/// Show the active config path (for `apartint config`).
pub fn show_config_path(explicit: Option<&Path>) -> String {
    match config_path(explicit) {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.precision, 4);
        assert_eq!(config.output.constant, "C");
        assert!(!config.output.json);
        assert!(config.examples.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[output]
precision = 6
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.precision, 6);
        // Other fields should be defaults
        assert_eq!(config.output.constant, "C");
        assert!(config.examples.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[output]
precision = 3
constant = "K"
json = true

[[examples]]
name = "partial arctan"
numerator = "x+3"
denominator = "x^2+4x+13"

[[examples]]
name = "double root"
numerator = "1"
denominator = "(x-1)^2"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.precision, 3);
        assert_eq!(config.output.constant, "K");
        assert!(config.output.json);
        assert_eq!(config.examples.len(), 2);
        assert_eq!(config.examples[1].denominator, "(x-1)^2");
    }

    #[test]
    fn test_example_needs_all_fields() {
        let toml_str = r#"
[[examples]]
name = "incomplete"
numerator = "1"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let path = std::env::temp_dir().join(format!("apartint-{}.toml", std::process::id()));
        std::fs::write(&path, "[output]\nconstant = \"K\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output.constant, "K");
        assert_eq!(config.output.precision, 4);
        assert!(show_config_path(Some(&path)).ends_with("(loaded)"));

        std::fs::remove_file(&path).unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(show_config_path(Some(&path)).ends_with("(not found, using defaults)"));
    }
}
