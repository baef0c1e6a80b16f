mod config;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::SonggrabConfig;
use songgrab_core::{SonggrabError, SonggrabResult};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_LOGFILE, DEFAULT_MAX_FUZZY_MATCHES, DEFAULT_SAVEDIR,
    DEFAULT_SEARCH_SIZE, DEFAULT_SOURCES, MatchingConfig, OutputConfig, ProviderConfig,
    SonggrabConfig as SonggrabConfigData,
};

/// Keys understood by `config get` / `config set`.
pub const CONFIG_KEYS: [&str; 6] = [
    "provider.base_url",
    "provider.sources",
    "provider.search_size_per_source",
    "matching.max_fuzzy_matches",
    "output.savedir",
    "output.logfilepath",
];

pub fn config_path() -> SonggrabResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SonggrabError::Config("home directory not found".to_string()))?;
    Ok(home.join(".songgrab").join("config.toml"))
}

pub fn load_config() -> SonggrabResult<SonggrabConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> SonggrabResult<SonggrabConfig> {
    if !path.exists() {
        return Ok(SonggrabConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| SonggrabError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| SonggrabError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &SonggrabConfig) -> SonggrabResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SonggrabError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| SonggrabError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| SonggrabError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn resolve_base_url(config: &SonggrabConfig) -> String {
    env_value("SONGGRAB_PROVIDER_URL")
        .or_else(|| config.provider.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn resolve_sources(config: &SonggrabConfig) -> Vec<String> {
    if let Some(value) = env_value("SONGGRAB_SOURCES") {
        let sources = split_list(&value);
        if !sources.is_empty() {
            return sources;
        }
    }
    match &config.provider.sources {
        Some(sources) if !sources.is_empty() => sources.clone(),
        _ => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn resolve_search_size(config: &SonggrabConfig) -> usize {
    config
        .provider
        .search_size_per_source
        .unwrap_or(DEFAULT_SEARCH_SIZE)
}

pub fn resolve_max_fuzzy_matches(config: &SonggrabConfig) -> usize {
    config
        .matching
        .max_fuzzy_matches
        .unwrap_or(DEFAULT_MAX_FUZZY_MATCHES)
}

/// CLI flag first, then `SONGGRAB_SAVEDIR`, then the config file.
pub fn resolve_savedir(config: &SonggrabConfig, flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| env_value("SONGGRAB_SAVEDIR"))
        .or_else(|| config.output.savedir.clone())
        .unwrap_or_else(|| DEFAULT_SAVEDIR.to_string())
}

pub fn resolve_logfile(config: &SonggrabConfig, flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| config.output.logfilepath.clone())
        .unwrap_or_else(|| DEFAULT_LOGFILE.to_string())
}

pub fn get_config_value(config: &SonggrabConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["provider", "base_url"] => config.provider.base_url.clone(),
        ["provider", "sources"] => config.provider.sources.as_ref().map(|s| s.join(",")),
        ["provider", "search_size_per_source"] => config
            .provider
            .search_size_per_source
            .map(|n| n.to_string()),
        ["matching", "max_fuzzy_matches"] => {
            config.matching.max_fuzzy_matches.map(|n| n.to_string())
        }
        ["output", "savedir"] => config.output.savedir.clone(),
        ["output", "logfilepath"] => config.output.logfilepath.clone(),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> SonggrabResult<()> {
    set_config_value_at(&config_path()?, key_path, value)
}

pub fn set_config_value_at(path: &Path, key_path: &str, value: &str) -> SonggrabResult<()> {
    if !CONFIG_KEYS.contains(&key_path) {
        return Err(SonggrabError::Config(format!(
            "unknown key '{key_path}' (expected one of: {})",
            CONFIG_KEYS.join(", ")
        )));
    }
    let item = parse_config_value(key_path, value)?;

    let content = if path.exists() {
        fs::read_to_string(path)
            .map_err(|err| SonggrabError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .unwrap_or_default();

    let Some((section, key)) = key_path.split_once('.') else {
        return Err(SonggrabError::Config(
            "key path must have 2 parts (e.g., 'provider.base_url')".to_string(),
        ));
    };

    let table = doc
        .as_table_mut()
        .entry(section)
        .or_insert(toml_edit::Item::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| SonggrabError::Config(format!("cannot set nested value in '{key_path}'")))?;
    table[key] = item;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SonggrabError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(path, doc.to_string())
        .map_err(|err| SonggrabError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

/// Lists become arrays and counts become integers; everything else is stored as a string.
fn parse_config_value(key_path: &str, value: &str) -> SonggrabResult<toml_edit::Item> {
    match key_path {
        "provider.sources" => {
            let mut array = toml_edit::Array::new();
            for source in split_list(value) {
                array.push(source);
            }
            Ok(toml_edit::value(array))
        }
        "provider.search_size_per_source" | "matching.max_fuzzy_matches" => {
            let number: i64 = value.trim().parse().map_err(|_| {
                SonggrabError::Config(format!("'{key_path}' expects an integer, got '{value}'"))
            })?;
            if number < 0 {
                return Err(SonggrabError::Config(format!(
                    "'{key_path}' must not be negative"
                )));
            }
            Ok(toml_edit::value(number))
        }
        _ => Ok(toml_edit::value(value)),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn open_in_editor() -> SonggrabResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&SonggrabConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor).arg(&path).status().map_err(|err| {
        SonggrabError::Config(format!("failed to open editor '{}': {}", editor, err))
    })?;

    if !status.success() {
        return Err(SonggrabError::Config(format!(
            "editor exited with status: {}",
            status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.toml")).unwrap();
        assert!(config.provider.base_url.is_none());
        assert_eq!(resolve_search_size(&config), DEFAULT_SEARCH_SIZE);
        assert_eq!(resolve_max_fuzzy_matches(&config), 2);
    }

    #[test]
    fn set_value_writes_typed_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        set_config_value_at(&path, "provider.sources", "migu, qqmusic").unwrap();
        set_config_value_at(&path, "matching.max_fuzzy_matches", "3").unwrap();
        set_config_value_at(&path, "output.savedir", "/tmp/music").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            config.provider.sources,
            Some(vec!["migu".to_string(), "qqmusic".to_string()])
        );
        assert_eq!(config.matching.max_fuzzy_matches, Some(3));
        assert_eq!(config.output.savedir.as_deref(), Some("/tmp/music"));
        assert_eq!(
            get_config_value(&config, "provider.sources").as_deref(),
            Some("migu,qqmusic")
        );
    }

    #[test]
    fn set_value_preserves_comments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "# bridge\n[provider]\nbase_url = \"http://a\"\n").unwrap();

        set_config_value_at(&path, "provider.search_size_per_source", "8").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# bridge"));
        assert!(content.contains("search_size_per_source = 8"));
    }

    #[test]
    fn set_value_rejects_unknown_key_and_bad_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let result = set_config_value_at(&path, "provider.token", "x");
        assert!(matches!(result, Err(SonggrabError::Config(_))));

        let result = set_config_value_at(&path, "matching.max_fuzzy_matches", "many");
        assert!(matches!(result, Err(SonggrabError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn configured_sources_keep_their_order() {
        let mut config = SonggrabConfig::default();
        config.provider.sources = Some(vec!["netease".into(), "migu".into()]);
        if env::var("SONGGRAB_SOURCES").is_err() {
            assert_eq!(resolve_sources(&config), vec!["netease", "migu"]);
        }

        config.provider.sources = Some(Vec::new());
        if env::var("SONGGRAB_SOURCES").is_err() {
            assert_eq!(resolve_sources(&config), DEFAULT_SOURCES.to_vec());
        }
    }

    #[test]
    fn savedir_flag_wins_over_config() {
        let mut config = SonggrabConfig::default();
        config.output.savedir = Some("from-config".into());
        assert_eq!(resolve_savedir(&config, Some("from-flag")), "from-flag");
        assert_eq!(resolve_logfile(&config, None), DEFAULT_LOGFILE);
    }
}
