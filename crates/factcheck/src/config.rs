//! Configuration: defaults, optional JSON file, `FACTCHECK_*` environment.
//!
//! CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use factcheck_index::{Embedder, HashingEmbedder, IndexPaths};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::{GenerationParams, HttpGenerator};
use crate::synthesizer::RetryPolicy;

pub const ENV_PREFIX: &str = "FACTCHECK_";
pub const HF_TOKEN_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";

pub const FACTS_CSV_FILE: &str = "trusted_facts.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to initialize embedder: {0}")]
    Embedder(#[from] factcheck_index::EmbedError),

    #[error("invalid adjudicator endpoint: {0}")]
    Endpoint(#[from] crate::generator::GenerateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    Hashing,
    Onnx,
}

impl FromStr for EmbedderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbedderKind::Hashing),
            "onnx" => Ok(EmbedderKind::Onnx),
            other => Err(format!("unknown embedder {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    /// Output dimension of the hashing embedder
    pub dimension: usize,
    /// ONNX model file (onnx only)
    pub model_path: Option<PathBuf>,
    /// tokenizer.json (onnx only)
    pub tokenizer_path: Option<PathBuf>,
    /// Maximum sequence length (onnx only)
    pub max_length: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hashing,
            dimension: factcheck_index::embedder::DEFAULT_DIMENSION,
            model_path: None,
            tokenizer_path: None,
            max_length: 384,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjudicatorConfig {
    /// Text-generation `POST /generate` endpoint, `http://` or `https://`
    pub endpoint: String,
    /// Model identifier, logged when the client is built
    pub model: String,
    pub temperature: f32,
    pub max_new_tokens: u32,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    /// Bearer token; never serialized back out
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for AdjudicatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/generate".to_string(),
            model: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            temperature: 0.1,
            max_new_tokens: 512,
            timeout_secs: 60,
            max_attempts: 3,
            initial_backoff_ms: 500,
            api_token: None,
        }
    }
}

impl AdjudicatorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_new_tokens: self.max_new_tokens,
        }
    }

    pub fn build_generator(&self) -> Result<HttpGenerator, ConfigError> {
        Ok(HttpGenerator::new(&self.endpoint, self.generation_params())?
            .with_token(self.api_token.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Fact corpus for `build`; defaults to `<data_dir>/trusted_facts.csv`
    pub facts_csv: Option<PathBuf>,
    /// Vector artifact; defaults to `<data_dir>/facts.index`
    pub vector_index: Option<PathBuf>,
    /// Statement artifact; defaults to `<data_dir>/statements.csv`
    pub statements: Option<PathBuf>,
    pub top_k: usize,
    pub confidence_threshold: f32,
    pub embedder: EmbedderConfig,
    pub adjudicator: AdjudicatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            facts_csv: None,
            vector_index: None,
            statements: None,
            top_k: 3,
            confidence_threshold: 0.55,
            embedder: EmbedderConfig::default(),
            adjudicator: AdjudicatorConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `FACTCHECK_*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, v)) = var("DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some((_, v)) = var("FACTS_CSV") {
            self.facts_csv = Some(PathBuf::from(v));
        }
        if let Some((_, v)) = var("VECTOR_INDEX") {
            self.vector_index = Some(PathBuf::from(v));
        }
        if let Some((_, v)) = var("STATEMENTS") {
            self.statements = Some(PathBuf::from(v));
        }
        if let Some((k, v)) = var("TOP_K") {
            self.top_k = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("EMBEDDER") {
            self.embedder.kind = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("EMBEDDING_DIMENSION") {
            self.embedder.dimension = parse(&k, &v)?;
        }
        if let Some((_, v)) = var("ONNX_MODEL") {
            self.embedder.model_path = Some(PathBuf::from(v));
        }
        if let Some((_, v)) = var("ONNX_TOKENIZER") {
            self.embedder.tokenizer_path = Some(PathBuf::from(v));
        }
        if let Some((_, v)) = var("ADJUDICATOR_URL") {
            self.adjudicator.endpoint = v;
        }
        if let Some((_, v)) = var("ADJUDICATOR_MODEL") {
            self.adjudicator.model = v;
        }
        if let Some((k, v)) = var("TIMEOUT_SECS") {
            self.adjudicator.timeout_secs = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("MAX_ATTEMPTS") {
            self.adjudicator.max_attempts = parse(&k, &v)?;
        }

        // The prefixed token wins over the hub-wide one.
        if let Some(token) = var("API_TOKEN")
            .map(|(_, v)| v)
            .or_else(|| lookup(HF_TOKEN_VAR))
            .filter(|t| !t.trim().is_empty())
        {
            self.adjudicator.api_token = Some(token);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold {} is outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if self.embedder.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedder dimension must be non-zero".into(),
            ));
        }
        if self.embedder.kind == EmbedderKind::Onnx
            && (self.embedder.model_path.is_none() || self.embedder.tokenizer_path.is_none())
        {
            return Err(ConfigError::Invalid(
                "onnx embedder needs model_path and tokenizer_path".into(),
            ));
        }
        if self.adjudicator.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be non-zero".into()));
        }
        if self.adjudicator.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if !self.adjudicator.temperature.is_finite() || self.adjudicator.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "temperature {} must be a non-negative number",
                self.adjudicator.temperature
            )));
        }
        Ok(())
    }

    pub fn api_token(&self) -> Option<&str> {
        self.adjudicator.api_token.as_deref()
    }

    pub fn facts_csv_path(&self) -> PathBuf {
        self.facts_csv
            .clone()
            .unwrap_or_else(|| self.data_dir.join(FACTS_CSV_FILE))
    }

    pub fn index_paths(&self) -> IndexPaths {
        let defaults = IndexPaths::in_dir(&self.data_dir);
        IndexPaths {
            vectors: self.vector_index.clone().unwrap_or(defaults.vectors),
            statements: self.statements.clone().unwrap_or(defaults.statements),
        }
    }

    /// Construct the configured embedder.
    pub fn build_embedder(&self) -> Result<Arc<dyn Embedder>, ConfigError> {
        match self.embedder.kind {
            EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(self.embedder.dimension))),
            EmbedderKind::Onnx => self.build_onnx_embedder(),
        }
    }

    #[cfg(feature = "onnx")]
    fn build_onnx_embedder(&self) -> Result<Arc<dyn Embedder>, ConfigError> {
        use factcheck_index::{OnnxConfig, OnnxEmbedder};

        let (Some(model_path), Some(tokenizer_path)) =
            (&self.embedder.model_path, &self.embedder.tokenizer_path)
        else {
            return Err(ConfigError::Invalid(
                "onnx embedder needs model_path and tokenizer_path".into(),
            ));
        };
        let embedder = OnnxEmbedder::load(OnnxConfig {
            model_path: model_path.clone(),
            tokenizer_path: tokenizer_path.clone(),
            max_length: self.embedder.max_length,
            ..OnnxConfig::default()
        })?;
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "onnx"))]
    fn build_onnx_embedder(&self) -> Result<Arc<dyn Embedder>, ConfigError> {
        Err(ConfigError::Invalid(
            "onnx embedder requested but factcheck was built without the `onnx` feature".into(),
        ))
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_pipeline_parameters() {
        let config = Config::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.confidence_threshold, 0.55);
        assert_eq!(config.adjudicator.temperature, 0.1);
        assert_eq!(config.adjudicator.max_new_tokens, 512);
        assert_eq!(config.facts_csv_path(), PathBuf::from("data/trusted_facts.csv"));
        assert_eq!(config.index_paths(), IndexPaths::in_dir("data"));
        config.validate().unwrap();
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factcheck.json");
        std::fs::write(
            &path,
            r#"{"top_k": 5, "adjudicator": {"endpoint": "http://tgi:80/generate"}}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.adjudicator.endpoint, "http://tgi:80/generate");
        assert_eq!(config.adjudicator.max_new_tokens, 512);
        assert_eq!(config.confidence_threshold, 0.55);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factcheck.json");
        std::fs::write(&path, r#"{"topk": 5}"#).unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_and_token_fallback() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("FACTCHECK_TOP_K", "7"),
                ("FACTCHECK_DATA_DIR", "/srv/facts"),
                ("FACTCHECK_EMBEDDER", "Hashing"),
                ("HUGGINGFACEHUB_API_TOKEN", "hf_abc"),
            ]))
            .unwrap();
        assert_eq!(config.top_k, 7);
        assert_eq!(config.data_dir, PathBuf::from("/srv/facts"));
        assert_eq!(config.api_token(), Some("hf_abc"));
        assert_eq!(
            config.index_paths().vectors,
            PathBuf::from("/srv/facts/facts.index")
        );

        config
            .apply_env(env(&[
                ("FACTCHECK_API_TOKEN", "fc_xyz"),
                ("HUGGINGFACEHUB_API_TOKEN", "hf_abc"),
            ]))
            .unwrap();
        assert_eq!(config.api_token(), Some("fc_xyz"));
    }

    #[test]
    fn malformed_environment_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("FACTCHECK_TOP_K", "three")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref key, .. } if key == "FACTCHECK_TOP_K"));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.embedder.dimension = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.adjudicator.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.embedder.kind = EmbedderKind::Onnx;
        assert!(config.validate().is_err());
    }

    #[test]
    fn hosted_https_endpoint_builds_a_generator() {
        let mut config = Config::default();
        config.apply_env(env(&[(
            "FACTCHECK_ADJUDICATOR_URL",
            "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1",
        )]))
        .unwrap();
        let generator = config.adjudicator.build_generator().unwrap();
        assert_eq!(generator.endpoint().scheme_str(), Some("https"));

        config.adjudicator.endpoint = "ftp://example.com/generate".into();
        assert!(matches!(
            config.adjudicator.build_generator(),
            Err(ConfigError::Endpoint(_))
        ));
    }

    #[test]
    fn token_is_not_serialized() {
        let mut config = Config::default();
        config.adjudicator.api_token = Some("secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
