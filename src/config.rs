use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_FILE: &str = "tracker.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    pub shell: ShellConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mysql://localhost/hackbright".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "HBA Database> ".to_owned(),
        }
    }
}

impl Config {
    /// Load the given file, or `tracker.toml` if it exists, or fall back
    /// to defaults.
    pub fn load(file_name: Option<&Path>) -> Result<Config> {
        match file_name {
            Some(file_name) => Self::from_file(file_name),
            None if Path::new(DEFAULT_FILE).exists() => Self::from_file(Path::new(DEFAULT_FILE)),
            None => Ok(Config::default()),
        }
    }

    fn from_file(file_name: &Path) -> Result<Config> {
        let content = fs::read_to_string(file_name).wrap_err_with(|| {
            format!("cannot load configuration file {}", file_name.display())
        })?;
        toml::from_str(&content).wrap_err_with(|| {
            format!("cannot parse configuration file {}", file_name.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.url, "mysql://localhost/hackbright");
        assert_eq!(config.shell.prompt, "HBA Database> ");
    }

    #[test]
    fn test_partial() {
        let config: Config = toml::from_str(
            r#"
            [database]
            url = "sqlite://grades.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "sqlite://grades.db");
        assert_eq!(config.shell.prompt, "HBA Database> ");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(toml::from_str::<Config>("[database]\nuri = \"x\"\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let e = Config::load(Some(Path::new("/nonexistent/tracker.toml"))).unwrap_err();
        assert!(e.to_string().contains("cannot load configuration file"));
    }

    #[test]
    fn test_unparsable_file() {
        let file_name =
            std::env::temp_dir().join(format!("tracker-{}.toml", std::process::id()));
        fs::write(&file_name, "[database\nurl = 3\n").unwrap();
        let result = Config::load(Some(&file_name));
        fs::remove_file(&file_name).unwrap();
        let e = result.unwrap_err();
        assert!(e.to_string().starts_with("cannot parse configuration file"));
    }
}
