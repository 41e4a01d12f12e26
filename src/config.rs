use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::mood::Mood;
use crate::ollama::DEFAULT_OLLAMA_URL;

/// Environment variable naming the Ollama endpoint.
pub const OLLAMA_URL_ENV: &str = "OLLAMA_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub ollama_url: Option<String>,
    pub default_model: Option<String>,
    pub default_mood: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_default_mood(mood: Mood) -> Result<()> {
        Self::save_default_mood_to(&Self::get_config_path()?, mood)
    }

    /// Update only `default_mood`, keeping every other field. An unreadable
    /// file is left untouched and the error returned.
    pub fn save_default_mood_to(path: &Path, mood: Mood) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.default_mood = Some(mood.as_str().to_string());
        config.save_to(path)
    }

    /// `--url` flag, then the environment, then the file, then localhost.
    /// Blank values at any level count as unset.
    pub fn resolve_url(&self, cli_url: Option<String>, env_url: Option<String>) -> String {
        fn non_blank(url: Option<String>) -> Option<String> {
            url.filter(|url| !url.trim().is_empty())
        }

        non_blank(cli_url)
            .or_else(|| non_blank(env_url))
            .or_else(|| non_blank(self.ollama_url.clone()))
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
    }

    pub fn resolve_model(&self, cli_model: Option<String>) -> Option<String> {
        cli_model.or_else(|| self.default_model.clone())
    }

    /// Unknown mood names in the file fall back to the default mood.
    pub fn resolve_mood(&self, cli_mood: Option<Mood>) -> Mood {
        cli_mood
            .or_else(|| self.default_mood.as_deref().and_then(Mood::from_str))
            .unwrap_or_default()
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("catgpt").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_creates_directory_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            ollama_url: Some("http://ollama:11434".to_string()),
            default_model: None,
            default_mood: Some("sleepy".to_string()),
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_url_precedence() {
        let config = Config {
            ollama_url: Some("http://from-file:11434".to_string()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_url(Some("http://cli:1".to_string()), Some("http://env:2".to_string())),
            "http://cli:1"
        );
        assert_eq!(
            config.resolve_url(None, Some("http://env:2".to_string())),
            "http://env:2"
        );
        assert_eq!(config.resolve_url(None, None), "http://from-file:11434");
        assert_eq!(Config::default().resolve_url(None, None), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_blank_url_sources_are_skipped() {
        let config = Config {
            ollama_url: Some("http://from-file:11434".to_string()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_url(None, Some(String::new())),
            "http://from-file:11434"
        );
        assert_eq!(
            config.resolve_url(Some("  ".to_string()), Some("http://env:2".to_string())),
            "http://env:2"
        );

        let blank_file = Config {
            ollama_url: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(blank_file.resolve_url(None, Some(String::new())), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_save_default_mood_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catgpt").join("config.json");

        // Creates the directory when nothing exists yet
        Config::save_default_mood_to(&path, Mood::Sleepy).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().default_mood.as_deref(),
            Some("sleepy")
        );

        let config = Config {
            ollama_url: Some("http://ollama:11434".to_string()),
            default_model: Some("mistral:7b".to_string()),
            default_mood: Some("sleepy".to_string()),
        };
        config.save_to(&path).unwrap();

        Config::save_default_mood_to(&path, Mood::Grumpy).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.ollama_url.as_deref(), Some("http://ollama:11434"));
        assert_eq!(reloaded.default_model.as_deref(), Some("mistral:7b"));
        assert_eq!(reloaded.default_mood.as_deref(), Some("grumpy"));
    }

    #[test]
    fn test_save_default_mood_leaves_broken_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"ollama_url\": ").unwrap();

        assert!(Config::save_default_mood_to(&path, Mood::Playful).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"ollama_url\": ");
    }

    #[test]
    fn test_mood_resolution() {
        let config = Config {
            default_mood: Some("grumpy".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_mood(None), Mood::Grumpy);
        assert_eq!(config.resolve_mood(Some(Mood::Playful)), Mood::Playful);

        let bogus = Config {
            default_mood: Some("hangry".to_string()),
            ..Config::default()
        };
        assert_eq!(bogus.resolve_mood(None), Mood::Funny);
    }
}
