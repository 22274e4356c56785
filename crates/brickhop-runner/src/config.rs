use serde::Deserialize;

use crate::error::RunnerError;

/// Headless runner configuration, loaded from `brickhop.toml`.
///
/// The tick rate is not set here: it belongs to the game
/// (`PlatformerConfig::tick_rate_hz`), since velocities are tuned per tick.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Stop after this many ticks. `None` runs until game over or Ctrl-C.
    pub max_ticks: Option<u64>,
    /// Log a session summary every N rendered frames.
    pub log_every_ticks: u64,
    /// Start a fresh session after game over instead of waiting.
    pub auto_reset: bool,
    /// Lives for the first session; overrides the game's starting lives.
    pub lives: Option<i64>,
    /// Key codes held down for the whole run, e.g. `["ArrowRight"]`.
    pub hold_keys: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_ticks: None,
            log_every_ticks: 60,
            auto_reset: false,
            lives: None,
            hold_keys: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Load config from `brickhop.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("brickhop.toml") {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from brickhop.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse brickhop.toml: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No brickhop.toml found, using defaults");
                RunnerConfig::default()
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RunnerConfig>(content)
    }

    /// Apply `BRICKHOP_*` overrides. `lookup` is `std::env::var` in the
    /// binary; unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("BRICKHOP_MAX_TICKS")
            && let Ok(n) = val.parse::<u64>()
        {
            self.max_ticks = Some(n);
        }
        if let Some(val) = lookup("BRICKHOP_LOG_EVERY_TICKS")
            && let Ok(n) = val.parse::<u64>()
        {
            self.log_every_ticks = n;
        }
        if let Some(val) = lookup("BRICKHOP_AUTO_RESET")
            && let Ok(b) = val.parse::<bool>()
        {
            self.auto_reset = b;
        }
        if let Some(val) = lookup("BRICKHOP_LIVES")
            && let Ok(n) = val.parse::<i64>()
        {
            self.lives = Some(n);
        }
    }

    /// Apply `--ticks=N`, `--lives=N`, `--hold=KEY` and `--auto-reset`
    /// command-line flags. Unknown arguments are logged and skipped.
    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if let Some(n) = arg.strip_prefix("--ticks=").and_then(|v| v.parse::<u64>().ok()) {
                self.max_ticks = Some(n);
            } else if let Some(n) = arg.strip_prefix("--lives=").and_then(|v| v.parse::<i64>().ok())
            {
                self.lives = Some(n);
            } else if let Some(key) = arg.strip_prefix("--hold=") {
                self.hold_keys.push(key.to_string());
            } else if arg == "--auto-reset" {
                self.auto_reset = true;
            } else {
                tracing::warn!(arg, "Ignoring unrecognized argument");
            }
        }
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.max_ticks == Some(0) {
            return Err(RunnerError::InvalidConfig(
                "max_ticks must be > 0 when set".to_string(),
            ));
        }
        if self.log_every_ticks == 0 {
            return Err(RunnerError::InvalidConfig(
                "log_every_ticks must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
