//! Application configuration: `config/default.toml` plus environment.
//!
//! Loading order: the first TOML file found, then an explicit path if
//! given, then `ALGOSTEP__*` environment variables (double underscore
//! separates nesting, e.g. `ALGOSTEP__NARRATION__POLICY=every_nth`).
//! After deserializing, [`AppConfig::validate`] reports every problem at
//! once rather than the first one it meets.

use crate::autoplay::SpeedPreset;
use crate::core::{AlgorithmKind, SearchTargets};
use crate::narration::{
    GeminiClient, GenerationSettings, MockNarrationClient, NarrationGateway, NarrationPolicy,
};
use crate::session::SessionOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;
use tracing::warn;

const ENV_PREFIX: &str = "ALGOSTEP";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", join_violations(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One reason a configuration was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("narration.temperature must be within [0, 2] (got {0})")]
    Temperature(f32),

    #[error("narration.top_p must be within (0, 1] (got {0})")]
    TopP(f32),

    #[error("narration.top_k must be at least 1")]
    TopK,

    #[error("narration.timeout_ms must be at least 1")]
    Timeout,

    #[error("narration.every must be at least 1 when policy is every_nth")]
    EveryNth,

    #[error("narration.model must not be empty")]
    EmptyModel,
}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionSection,
    pub narration: NarrationSection,
}

/// `[session]`: what a new session starts with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub algorithm: AlgorithmKind,
    pub target_name: String,
    pub target_number: i64,
    pub speed: SpeedPreset,
}

impl Default for SessionSection {
    fn default() -> Self {
        let targets = SearchTargets::default();
        Self {
            algorithm: AlgorithmKind::Selection,
            target_name: targets.name,
            target_number: targets.number,
            speed: SpeedPreset::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationProvider {
    #[default]
    Gemini,
    Mock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Never,
    #[default]
    EveryStep,
    EveryNth,
}

/// `[narration]`: generator backend and when to call it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrationSection {
    pub provider: NarrationProvider,
    pub model: String,
    pub base_url: Option<String>,
    /// Falls back to `GEMINI_API_KEY`, then `API_KEY`
    pub api_key: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub timeout_ms: u64,
    pub policy: PolicyKind,
    pub every: u32,
    pub discard_stale: bool,
}

impl Default for NarrationSection {
    fn default() -> Self {
        let settings = GenerationSettings::default();
        Self {
            provider: NarrationProvider::default(),
            model: crate::narration::DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
            timeout_ms: 15_000,
            policy: PolicyKind::default(),
            every: 1,
            discard_stale: true,
        }
    }
}

impl NarrationSection {
    pub fn policy(&self) -> NarrationPolicy {
        match self.policy {
            PolicyKind::Never => NarrationPolicy::Never,
            PolicyKind::EveryStep => NarrationPolicy::EveryStep,
            PolicyKind::EveryNth => NarrationPolicy::EveryNth(self.every),
        }
    }

    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured key, else the first non-empty key variable in the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|key| !key.trim().is_empty())
            })
    }

    /// The gateway for this section, or `None` when narration is off.
    ///
    /// A Gemini provider without any API key disables narration instead
    /// of failing every request.
    pub fn build_gateway(&self) -> Option<NarrationGateway> {
        if self.policy() == NarrationPolicy::Never {
            return None;
        }
        let gateway = match self.provider {
            NarrationProvider::Mock => NarrationGateway::new(Arc::new(MockNarrationClient::new())),
            NarrationProvider::Gemini => {
                let Some(api_key) = self.resolved_api_key() else {
                    warn!("no Gemini API key found, narration disabled");
                    return None;
                };
                let client = GeminiClient::new(self.base_url.as_deref(), &self.model, Some(api_key))
                    .with_settings(self.settings());
                NarrationGateway::new(Arc::new(client))
            }
        };
        Some(gateway.with_timeout(self.timeout()))
    }
}

impl AppConfig {
    /// Check every constraint, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let n = &self.narration;
        let checks = vec![
            check((0.0..=2.0).contains(&n.temperature), || {
                ConfigViolation::Temperature(n.temperature)
            }),
            check(n.top_p > 0.0 && n.top_p <= 1.0, || ConfigViolation::TopP(n.top_p)),
            check(n.top_k > 0, || ConfigViolation::TopK),
            check(n.timeout_ms > 0, || ConfigViolation::Timeout),
            check(n.policy != PolicyKind::EveryNth || n.every > 0, || {
                ConfigViolation::EveryNth
            }),
            check(!n.model.trim().is_empty(), || ConfigViolation::EmptyModel),
        ];
        Validation::all_vec(checks).map(|_| ())
    }

    /// [`validate`](Self::validate) flattened into a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            algorithm: self.session.algorithm,
            targets: SearchTargets::new(
                self.session.target_name.clone(),
                self.session.target_number,
            ),
            speed: self.session.speed,
            policy: self.narration.policy(),
            discard_stale: self.narration.discard_stale,
        }
    }
}

fn check(
    ok: bool,
    violation: impl FnOnce() -> ConfigViolation,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Load and validate configuration.
///
/// 1. The first of `config/default.toml`, `../config/default.toml`,
///    `default.toml` that exists
/// 2. `config_path`, if given and present
/// 3. `ALGOSTEP__*` environment variables
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let mut builder = config::Config::builder();

    for name in ["config/default", "../config/default", "default"] {
        if std::path::Path::new(&format!("{name}.toml")).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(path) = config_path.filter(|path| path.exists()) {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let loaded: AppConfig = builder.build()?.try_deserialize()?;
    loaded.validated()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_success());
        assert_eq!(config.session.algorithm, AlgorithmKind::Selection);
        assert_eq!(config.session.target_name, "Hoàng Mai");
        assert_eq!(config.session.target_number, 32);
        assert_eq!(config.narration.timeout(), Duration::from_millis(15_000));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let mut config = AppConfig::default();
        config.narration.temperature = 3.5;
        config.narration.top_p = 0.0;
        config.narration.top_k = 0;
        config.narration.policy = PolicyKind::EveryNth;
        config.narration.every = 0;

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| matches!(e, ConfigViolation::Temperature(_))));
                assert!(errors.iter().any(|e| matches!(e, ConfigViolation::TopP(_))));
                assert!(errors.iter().any(|e| matches!(e, ConfigViolation::TopK)));
                assert!(errors.iter().any(|e| matches!(e, ConfigViolation::EveryNth)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validated_reports_every_message() {
        let mut config = AppConfig::default();
        config.narration.model = "  ".into();
        config.narration.timeout_ms = 0;

        let err = config.validated().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("timeout_ms"));
        assert!(text.contains("model"));
    }

    #[test]
    fn toml_sections_deserialize() {
        let raw = r#"
            [session]
            algorithm = "binary_search"
            target_number = 75
            speed = "fast"

            [narration]
            provider = "mock"
            policy = "every_nth"
            every = 3
            discard_stale = false
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let options = config.session_options();
        assert_eq!(options.algorithm, AlgorithmKind::BinarySearch);
        assert_eq!(options.targets.number, 75);
        assert_eq!(options.targets.name, "Hoàng Mai");
        assert_eq!(options.speed, SpeedPreset::Fast);
        assert_eq!(options.policy, NarrationPolicy::EveryNth(3));
        assert!(!options.discard_stale);
        assert_eq!(config.narration.provider, NarrationProvider::Mock);
    }

    #[test]
    fn never_policy_builds_no_gateway() {
        let mut section = NarrationSection {
            provider: NarrationProvider::Mock,
            ..NarrationSection::default()
        };
        assert!(section.build_gateway().is_some());

        section.policy = PolicyKind::Never;
        assert!(section.build_gateway().is_none());
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let section = NarrationSection {
            api_key: Some("from-file".into()),
            ..NarrationSection::default()
        };
        assert_eq!(section.resolved_api_key().as_deref(), Some("from-file"));
    }
}
