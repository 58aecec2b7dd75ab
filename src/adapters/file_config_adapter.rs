//! INI file configuration adapter.
//!
//! Backtest runs read a `[backtest]` section: `capital`, `strategy`,
//! `period`, and `param.<name> = <value>` entries for per-strategy
//! parameter overrides.

use std::path::Path;

use configparser::ini::Ini;

use crate::ports::config_port::ConfigPort;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// All `param.<name>` entries in a section that parse as numbers.
    pub fn param_overrides(&self, section: &str) -> Vec<(String, f64)> {
        let Some(map) = self.config.get_map_ref().get(&section.to_lowercase()) else {
            return Vec::new();
        };

        let mut params: Vec<(String, f64)> = map
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix("param.")?;
                let value: f64 = value.as_deref()?.parse().ok()?;
                Some((name.to_string(), value))
            })
            .collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        params
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[backtest]
capital = 25000
strategy = sma-cross
period = weekly
param.short = 4
param.long = 18
report = out.csv
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "strategy"),
            Some("sma-cross".to_string())
        );
        assert_eq!(adapter.get_double("backtest", "capital", 0.0), 25000.0);
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "strategy"), None);
        assert_eq!(adapter.get_int("backtest", "capital", 42), 42);
        assert!(adapter.get_bool("backtest", "defaults", true));
    }

    #[test]
    fn param_overrides_strip_prefix() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        let params = adapter.param_overrides("backtest");
        assert_eq!(
            params,
            vec![("long".to_string(), 18.0), ("short".to_string(), 4.0)]
        );
    }

    #[test]
    fn param_overrides_missing_section() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert!(adapter.param_overrides("tuning").is_empty());
    }

    #[test]
    fn bool_parsing_variants() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\na = yes\nb = 0\nc = maybe\n").unwrap();
        assert!(adapter.get_bool("backtest", "a", false));
        assert!(!adapter.get_bool("backtest", "b", true));
        assert!(adapter.get_bool("backtest", "c", true));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/backtest.ini").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
    }

    #[test]
    fn from_file_reads_ini() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "period"),
            Some("weekly".to_string())
        );
    }
}
