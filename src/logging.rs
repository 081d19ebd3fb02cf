use chrono::Local;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

const LEVEL_VAR: &str = "EPCQR_LOG_LEVEL";
const DIR_VAR: &str = "EPCQR_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: log::LevelFilter,
    /// `None` disables the file sink.
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup(LEVEL_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|value| value.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info);

        let dir = match lookup(DIR_VAR).as_deref().map(str::trim) {
            Some("off") | Some("none") | Some("") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        };

        Self { level, dir }
    }
}

pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name, &LogSettings::from_env()) {
            init_result = Err(err);
        }
    });
    init_result
}

fn init_logging_inner(app_name: &str, settings: &LogSettings) -> Result<(), String> {
    let mut dispatch = fern::Dispatch::new()
        .level(settings.level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    if let Some(dir) = &settings.dir {
        std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
        let date = Local::now().format("%Y_%m_%d");
        let file_path = dir.join(format!("{app_name}-{date}.log"));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        LogSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_info_and_logs_dir() {
        let settings = lookup_settings(&[]);
        assert_eq!(settings.level, log::LevelFilter::Info);
        assert_eq!(settings.dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn own_level_wins_over_rust_log() {
        let settings = lookup_settings(&[("EPCQR_LOG_LEVEL", "debug"), ("RUST_LOG", "warn")]);
        assert_eq!(settings.level, log::LevelFilter::Debug);

        let settings = lookup_settings(&[("RUST_LOG", "warn")]);
        assert_eq!(settings.level, log::LevelFilter::Warn);

        let settings = lookup_settings(&[("EPCQR_LOG_LEVEL", "chatty")]);
        assert_eq!(settings.level, log::LevelFilter::Info);
    }

    #[test]
    fn file_sink_can_be_disabled() {
        for value in ["off", "none", ""] {
            assert_eq!(lookup_settings(&[("EPCQR_LOG_DIR", value)]).dir, None);
        }
        assert_eq!(
            lookup_settings(&[("EPCQR_LOG_DIR", "/tmp/epc")]).dir,
            Some(PathBuf::from("/tmp/epc"))
        );
    }
}
