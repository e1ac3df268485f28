//! Engine configuration.
//!
//! Precedence: built-in defaults < TOML file (`PARLEY_CONFIG`, default `config/parley.toml`)
//! < environment (`PARLEY__SECTION__KEY`, e.g. `PARLEY__TIER__FALLBACK_TIMEOUT_MS=2000`).
//! Credentials are plain injected values; the engine never stores them anywhere else.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/parley.toml";
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectConfig {
    /// Fraction of the gap to the session baseline closed after every turn.
    pub decay_rate: f64,
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self { decay_rate: 0.05 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Questions shorter than this (chars, after trimming) are tier 1 without scoring.
    pub short_question_chars: usize,
    /// Heuristic tier 3 results under this length may be escalated to the completion service.
    pub fallback_max_chars: usize,
    pub fallback_enabled: bool,
    pub fallback_timeout_ms: u64,
    pub fallback_max_tokens: u32,
    pub fallback_temperature: f32,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            short_question_chars: 100,
            fallback_max_chars: 150,
            fallback_enabled: true,
            fallback_timeout_ms: 3000,
            fallback_max_tokens: 10,
            fallback_temperature: 0.1,
        }
    }
}

impl TierConfig {
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub mode: LlmMode,
    pub api_url: String,
    pub model: String,
    /// Never serialized back out and never logged.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            mode: LlmMode::Mock,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("mode", &self.mode)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub affect: AffectConfig,
    pub tier: TierConfig,
    pub llm: LlmConfig,
}

impl EngineConfig {
    /// Path from `PARLEY_CONFIG`, else `config/parley.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var("PARLEY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load config from defaults, the default file path (if present) and `PARLEY__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let d = Self::default();
        let builder = config::Config::builder()
            .set_default("affect.decay_rate", d.affect.decay_rate)?
            .set_default("tier.short_question_chars", d.tier.short_question_chars as i64)?
            .set_default("tier.fallback_max_chars", d.tier.fallback_max_chars as i64)?
            .set_default("tier.fallback_enabled", d.tier.fallback_enabled)?
            .set_default("tier.fallback_timeout_ms", d.tier.fallback_timeout_ms as i64)?
            .set_default("tier.fallback_max_tokens", d.tier.fallback_max_tokens as i64)?
            .set_default("tier.fallback_temperature", d.tier.fallback_temperature as f64)?
            .set_default("llm.mode", "mock")?
            .set_default("llm.api_url", d.llm.api_url.as_str())?
            .set_default("llm.model", d.llm.model.as_str())?
            .set_default("llm.request_timeout_secs", d.llm.request_timeout_secs as i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("PARLEY").separator("__"))
            .build()?;

        let mut cfg: EngineConfig = built.try_deserialize()?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Writes the config as TOML (API key omitted), creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Keeps tunables inside workable ranges.
    pub fn sanitize(&mut self) {
        if !self.affect.decay_rate.is_finite() {
            self.affect.decay_rate = AffectConfig::default().decay_rate;
        }
        self.affect.decay_rate = self.affect.decay_rate.clamp(0.0, 1.0);
        if !self.tier.fallback_temperature.is_finite() {
            self.tier.fallback_temperature = TierConfig::default().fallback_temperature;
        }
        self.tier.fallback_temperature = self.tier.fallback_temperature.clamp(0.0, 2.0);
        self.tier.fallback_max_tokens = self.tier.fallback_max_tokens.max(1);
        if self.llm.api_key.as_deref().map(str::trim).is_some_and(str::is_empty) {
            self.llm.api_key = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = EngineConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.tier.short_question_chars, 100);
        assert_eq!(cfg.tier.fallback_max_chars, 150);
        assert_eq!(cfg.llm.mode, LlmMode::Mock);
        assert!((cfg.affect.decay_rate - 0.05).abs() < 1e-9);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parley.toml");
        fs::write(
            &path,
            "[affect]\ndecay_rate = 0.2\n\n[tier]\nfallback_timeout_ms = 250\nfallback_enabled = false\n\n[llm]\nmode = \"live\"\napi_key = \"sk-test\"\n",
        )
        .unwrap();
        let cfg = EngineConfig::load_from_path(&path).unwrap();
        assert!((cfg.affect.decay_rate - 0.2).abs() < 1e-9);
        assert_eq!(cfg.tier.fallback_timeout(), Duration::from_millis(250));
        assert!(!cfg.tier.fallback_enabled);
        assert_eq!(cfg.tier.short_question_chars, 100);
        assert_eq!(cfg.llm.mode, LlmMode::Live);
        assert_eq!(cfg.llm.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn save_omits_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("parley.toml");
        let mut cfg = EngineConfig::default();
        cfg.llm.api_key = Some("sk-secret".into());
        cfg.save_to_path(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("sk-secret"));
        let reloaded = EngineConfig::load_from_path(&path).unwrap();
        assert_eq!(reloaded.tier, cfg.tier);
        assert!(reloaded.llm.api_key.is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let mut llm = LlmConfig::default();
        llm.api_key = Some("sk-secret".into());
        assert!(!format!("{:?}", llm).contains("sk-secret"));
    }

    #[test]
    fn sanitize_clamps_decay() {
        let mut cfg = EngineConfig::default();
        cfg.affect.decay_rate = 3.0;
        cfg.llm.api_key = Some("  ".into());
        cfg.sanitize();
        assert_eq!(cfg.affect.decay_rate, 1.0);
        assert!(cfg.llm.api_key.is_none());
    }
}
