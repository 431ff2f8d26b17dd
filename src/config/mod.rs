use directories::ProjectDirs;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{Args, ProviderKind};
use crate::errors::{Result, TripError};
use crate::prompt::DEFAULT_CURRENCY;
use crate::wire::OutputFormat;

pub const DEFAULT_ANIMATION_URL: &str = "https://assets1.lottiefiles.com/packages/lf20_jtbfg2nb.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Empty means the provider's default model.
    pub model: String,
    /// Empty means the provider's public endpoint.
    pub api_base: String,
    /// Environment variable holding the credential; empty means the
    /// provider's conventional variable.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub currency: String,
    pub format: OutputFormat,
    pub prompt_template: Option<String>,
    /// Empty disables the decorative animation fetch.
    pub animation_url: String,
    pub out_dir: String,
    /// Resolved once at startup; never read from or written to config files.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: String::new(),
            api_base: String::new(),
            api_key_env: String::new(),
            timeout_secs: 120,
            currency: DEFAULT_CURRENCY.into(),
            format: OutputFormat::Headings,
            prompt_template: None,
            animation_url: DEFAULT_ANIMATION_URL.into(),
            out_dir: ".trip".into(),
            api_key: None,
        }
    }
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-pro",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    pub fn default_api_base(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Conventional credential variable; `None` for providers that need none.
    pub fn default_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GOOGLE_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl Config {
    pub fn model(&self) -> &str {
        if self.model.is_empty() { self.provider.default_model() } else { &self.model }
    }

    pub fn api_base(&self) -> &str {
        if self.api_base.is_empty() { self.provider.default_api_base() } else { &self.api_base }
    }

    fn key_env(&self) -> Option<&str> {
        if self.api_key_env.is_empty() { self.provider.default_key_env() } else { Some(&self.api_key_env) }
    }

    /// Parses a `.toml`, `.yaml` or `.yml` config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&raw)
                .map_err(|e| TripError::Config(format!("{}: {e}", path.display()))),
            _ => toml::from_str(&raw)
                .map_err(|e| TripError::Config(format!("{}: {e}", path.display()))),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "trip-planner", "trip_planner")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, then the config file (explicit path, or the platform default
    /// when it exists), then command-line overrides.
    pub fn load(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_file(Path::new(p))?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => {
                    debug!(path = %p.display(), "loading default config file");
                    Self::from_file(&p)?
                }
                None => Self::default(),
            },
        };
        cfg.apply_args(args);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects settings that would make every request fail immediately.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(TripError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(kind) = args.provider {
            if kind != self.provider {
                // Endpoint, model and key variable of another provider do not carry over.
                self.model.clear();
                self.api_base.clear();
                self.api_key_env.clear();
            }
            self.provider = kind;
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if args.structured {
            self.format = OutputFormat::Tagged;
        }
        if args.no_animation {
            self.animation_url.clear();
        }
    }

    /// Resolves the credential through `lookup` (the process environment in
    /// the binary). A provider that needs a key and has none is a startup error.
    pub fn resolve_api_key<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(var) = self.key_env().map(str::to_string) else {
            self.api_key = None;
            return Ok(());
        };
        match lookup(&var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(key) => {
                self.api_key = Some(key);
                Ok(())
            }
            None => Err(TripError::Config(format!(
                "{var} is not set; export it before running the planner"
            ))),
        }
    }
}
