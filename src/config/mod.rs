use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

pub const BANKS_FILE: &str = "banks.csv";
pub const FACILITIES_FILE: &str = "facilities.csv";
pub const COVENANTS_FILE: &str = "covenants.csv";
pub const LOANS_FILE: &str = "loans.csv";
pub const ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const YIELDS_FILE: &str = "yields.csv";

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for an allocation run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("ALLOCATOR_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let input_dir = env::var("ALLOCATOR_INPUT_DIR").unwrap_or_else(|_| ".".to_string());
        let output_dir = env::var("ALLOCATOR_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());
        if input_dir.trim().is_empty() || output_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDirectory);
        }

        let log_level = env::var("ALLOCATOR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                input_dir: PathBuf::from(input_dir),
                output_dir: PathBuf::from(output_dir),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Directories holding the fixed-name input and output files.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl DataConfig {
    pub fn input_paths(&self) -> Result<InputPaths, ConfigError> {
        ensure_dir(&self.input_dir)?;
        Ok(InputPaths::in_dir(&self.input_dir))
    }

    pub fn output_paths(&self) -> Result<OutputPaths, ConfigError> {
        ensure_dir(&self.output_dir)?;
        Ok(OutputPaths::in_dir(&self.output_dir))
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory(path.to_path_buf()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub banks: PathBuf,
    pub facilities: PathBuf,
    pub covenants: PathBuf,
    pub loans: PathBuf,
}

impl InputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            banks: dir.join(BANKS_FILE),
            facilities: dir.join(FACILITIES_FILE),
            covenants: dir.join(COVENANTS_FILE),
            loans: dir.join(LOANS_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub assignments: PathBuf,
    pub yields: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            assignments: dir.join(ASSIGNMENTS_FILE),
            yields: dir.join(YIELDS_FILE),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDirectory,
    MissingDirectory(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDirectory => write!(
                f,
                "ALLOCATOR_INPUT_DIR and ALLOCATOR_OUTPUT_DIR must not be empty"
            ),
            ConfigError::MissingDirectory(path) => {
                write!(f, "{} is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("ALLOCATOR_ENV");
        env::remove_var("ALLOCATOR_INPUT_DIR");
        env::remove_var("ALLOCATOR_OUTPUT_DIR");
        env::remove_var("ALLOCATOR_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.data.input_dir, PathBuf::from("."));
        assert_eq!(config.data.output_dir, PathBuf::from("."));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_directories_and_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOCATOR_ENV", "prod");
        env::set_var("ALLOCATOR_INPUT_DIR", "/srv/loans/in");
        env::set_var("ALLOCATOR_OUTPUT_DIR", "/srv/loans/out");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            InputPaths::in_dir(&config.data.input_dir).loans,
            PathBuf::from("/srv/loans/in/loans.csv")
        );
        assert_eq!(
            OutputPaths::in_dir(&config.data.output_dir).yields,
            PathBuf::from("/srv/loans/out/yields.csv")
        );
    }

    #[test]
    fn rejects_blank_directory() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOCATOR_OUTPUT_DIR", "  ");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(result, Err(ConfigError::EmptyDirectory)));
    }

    #[test]
    fn missing_input_directory_is_reported() {
        let data = DataConfig {
            input_dir: PathBuf::from("/definitely/not/here"),
            output_dir: PathBuf::from("."),
        };
        let err = data.input_paths().expect_err("missing dir");
        assert_eq!(err.to_string(), "/definitely/not/here is not a directory");
    }
}
