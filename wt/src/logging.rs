use std::{path::PathBuf, str::FromStr};

const APP_NAME: &str = "wt";
const LOG_FILE_NAME: &str = "wt.log";

pub const LOG_LEVEL_ENV: &str = "WT_LOG";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

pub fn cache_dir() -> Option<PathBuf> {
    if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache_home.is_empty()
    {
        return Some(PathBuf::from(xdg_cache_home).join(APP_NAME));
    }
    dirs::home_dir().map(|home| home.join(".cache").join(APP_NAME))
}

pub fn default_log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LOG_FILE_NAME))
}

/// Level named by `WT_LOG`; unset or unrecognised values fall back to `warn`
pub fn level_from_env(value: Option<&str>) -> log::LevelFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| log::LevelFilter::from_str(v).ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

pub fn setup_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }
    let log_file =
        default_log_file().ok_or_else(|| anyhow::anyhow!("Unable to find home directory"))?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("wt logging initialised (level={level})");
    Ok(())
}
