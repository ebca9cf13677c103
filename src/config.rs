use std::path::PathBuf;

pub const DEFAULT_DAY_CSV: &str = "data/day.csv";
pub const DEFAULT_HOUR_CSV: &str = "data/hour.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "dashboard";

/// Where the dashboard reads its tables and writes its artifacts.
///
/// Resolved from the environment (a `.env` file is honoured by the binary):
///
/// | Variable        | Default         |
/// |-----------------|-----------------|
/// | `DAY_CSV_PATH`  | `data/day.csv`  |
/// | `HOUR_CSV_PATH` | `data/hour.csv` |
/// | `OUTPUT_DIR`    | `dashboard`     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub day_csv: PathBuf,
    pub hour_csv: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            day_csv: DEFAULT_DAY_CSV.into(),
            hour_csv: DEFAULT_HOUR_CSV.into(),
            output_dir: DEFAULT_OUTPUT_DIR.into(),
        }
    }
}

impl DashboardConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; unset or empty
    /// keys fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Self {
            day_csv: get("DAY_CSV_PATH", defaults.day_csv),
            hour_csv: get("HOUR_CSV_PATH", defaults.hour_csv),
            output_dir: get("OUTPUT_DIR", defaults.output_dir),
        }
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        day_csv: Option<PathBuf>,
        hour_csv: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = day_csv {
            self.day_csv = p;
        }
        if let Some(p) = hour_csv {
            self.hour_csv = p;
        }
        if let Some(p) = output_dir {
            self.output_dir = p;
        }
        self
    }
}
