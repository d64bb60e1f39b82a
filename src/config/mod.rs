use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Conversion rate used when the user never saved one (1 KWD → INR).
pub const DEFAULT_CONVERSION_RATE: f64 = 285.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_conversion_rate")]
    pub default_conversion_rate: f64,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    /// Location name → group label used when building timesheets.
    #[serde(default)]
    pub location_groups: BTreeMap<String, String>,
    #[serde(default = "default_fare_signatories")]
    pub fare_signatories: Vec<String>,
    #[serde(default = "default_timesheet_signatories")]
    pub timesheet_signatories: Vec<String>,
}

fn default_conversion_rate() -> f64 {
    DEFAULT_CONVERSION_RATE
}
fn default_report_dir() -> String {
    Config::config_dir()
        .join("reports")
        .to_string_lossy()
        .to_string()
}
fn default_fare_signatories() -> Vec<String> {
    ["P/B", "HRM", "FM", "COO"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_timesheet_signatories() -> Vec<String> {
    vec!["PREPARED BY".to_string(), "MANAGER".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            default_conversion_rate: default_conversion_rate(),
            report_dir: default_report_dir(),
            location_groups: BTreeMap::new(),
            fare_signatories: default_fare_signatories(),
            timesheet_signatories: default_timesheet_signatories(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("faresheet")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".faresheet")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("faresheet.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("faresheet.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Map a location name onto its timesheet group (identity when unmapped).
    pub fn location_group(&self, location_name: &str) -> String {
        self.location_groups
            .get(location_name)
            .cloned()
            .unwrap_or_else(|| location_name.to_string())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
