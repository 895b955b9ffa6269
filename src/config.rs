//! Environment-backed settings.
//!
//! Values come from the process environment, after loading `.env` if present.
//! CLI flags take precedence over anything resolved here.

use std::path::PathBuf;

use crate::error::AppError;

/// Root under which `data/output/` is created.
pub const OUTPUT_ROOT_VAR: &str = "ENERGY_OUTPUT_ROOT";

/// `tracing` filter directive (same syntax as `RUST_LOG`).
pub const LOG_FILTER_VAR: &str = "ENERGY_LOG";

pub const DEFAULT_LOG_FILTER: &str = "energy_compiler=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_root: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// Load `.env` and resolve settings from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let output_root = match lookup(OUTPUT_ROOT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().map_err(|e| {
                AppError::new(4, format!("Failed to resolve the current directory: {e}"))
            })?,
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            output_root,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let s = Settings::resolve(lookup(&[
            (OUTPUT_ROOT_VAR, "/srv/energy"),
            (LOG_FILTER_VAR, "energy_compiler=debug"),
        ]))
        .unwrap();
        assert_eq!(s.output_root, PathBuf::from("/srv/energy"));
        assert_eq!(s.log_filter, "energy_compiler=debug");
    }

    #[test]
    fn defaults_to_cwd_and_info() {
        let s = Settings::resolve(lookup(&[(OUTPUT_ROOT_VAR, "  ")])).unwrap();
        assert_eq!(s.output_root, std::env::current_dir().unwrap());
        assert_eq!(s.log_filter, DEFAULT_LOG_FILTER);
    }
}
