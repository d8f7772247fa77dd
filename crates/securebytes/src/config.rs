//! Configuration loading and validation.
//!
//! Values are read from environment variables prefixed with `SECUREBYTES_`:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `SECUREBYTES_KEY` | empty | raw key handed to key derivation |
//! | `SECUREBYTES_SERIALIZER` | `json` | `json`, `binary` or `tlv` |
//! | `SECUREBYTES_REQUIRE_STRONG_KEY` | `false` | reject keys shorter than 50 bytes |

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::codec::Serializer;
use crate::kdf::RECOMMENDED_MIN_KEY_LEN;

/// Prefix shared by every recognised environment variable.
pub const ENV_PREFIX: &str = "SECUREBYTES";

/// Validated instance settings.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Raw key. An empty key is accepted unless `require_strong_key` is set.
    #[serde(default)]
    pub key: String,

    /// Serializer applied by `encrypt`/`decrypt`.
    #[serde(default)]
    pub serializer: Serializer,

    /// When set, keys shorter than [`RECOMMENDED_MIN_KEY_LEN`] bytes are
    /// rejected at load time.
    #[serde(default)]
    pub require_strong_key: bool,
}

impl Settings {
    /// Load and validate settings from `SECUREBYTES_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration from environment")?;
        Self::from_config(cfg)
    }

    /// Deserialise and validate settings from an already-built source.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialisation or validation fails.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        let settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise securebytes configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.require_strong_key && self.key.len() < RECOMMENDED_MIN_KEY_LEN {
            anyhow::bail!(
                "SECUREBYTES_KEY must be at least {RECOMMENDED_MIN_KEY_LEN} bytes when \
                 SECUREBYTES_REQUIRE_STRONG_KEY is set"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("key", &"[REDACTED]")
            .field("serializer", &self.serializer)
            .field("require_strong_key", &self.require_strong_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(overrides: &[(&str, &str)]) -> Result<Settings> {
        let mut builder = config::Config::builder();
        for (k, v) in overrides {
            builder = builder.set_override(*k, *v)?;
        }
        Settings::from_config(builder.build()?)
    }

    #[test]
    fn defaults_are_correct() {
        let s = build(&[]).unwrap();
        assert_eq!(s.key, "");
        assert_eq!(s.serializer, Serializer::Json);
        assert!(!s.require_strong_key);
    }

    #[test]
    fn reads_serializer_by_name() {
        let s = build(&[("key", "k"), ("serializer", "tlv")]).unwrap();
        assert_eq!(s.serializer, Serializer::Tlv);
        let s = build(&[("serializer", "binary")]).unwrap();
        assert_eq!(s.serializer, Serializer::Binary);
    }

    #[test]
    fn rejects_unknown_serializer() {
        assert!(build(&[("serializer", "yaml")]).is_err());
    }

    #[test]
    fn weak_key_accepted_by_default() {
        assert!(build(&[("key", "short")]).is_ok());
    }

    #[test]
    fn validate_rejects_short_key_when_strong_key_required() {
        let cfg = Settings {
            key: "short".into(),
            serializer: Serializer::Json,
            require_strong_key: true,
        };
        assert!(cfg.validate().is_err());

        let cfg = Settings {
            key: String::new(),
            serializer: Serializer::Json,
            require_strong_key: true,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_long_key() {
        let cfg = Settings {
            key: "x".repeat(RECOMMENDED_MIN_KEY_LEN),
            serializer: Serializer::Binary,
            require_strong_key: true,
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn key_length_is_counted_in_bytes() {
        // 25 two-byte characters.
        let cfg = Settings {
            key: "é".repeat(RECOMMENDED_MIN_KEY_LEN / 2),
            serializer: Serializer::Json,
            require_strong_key: true,
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_env_reads_prefixed_variables() {
        // The only test in this crate that touches SECUREBYTES_* variables.
        let key = "e".repeat(RECOMMENDED_MIN_KEY_LEN);
        std::env::set_var("SECUREBYTES_KEY", &key);
        std::env::set_var("SECUREBYTES_SERIALIZER", "binary");
        std::env::set_var("SECUREBYTES_REQUIRE_STRONG_KEY", "true");
        let loaded = Settings::from_env();

        std::env::set_var("SECUREBYTES_KEY", "short");
        let rejected = Settings::from_env();

        for var in ["KEY", "SERIALIZER", "REQUIRE_STRONG_KEY"] {
            std::env::remove_var(format!("{ENV_PREFIX}_{var}"));
        }

        let s = loaded.unwrap();
        assert_eq!(s.key, key);
        assert_eq!(s.serializer, Serializer::Binary);
        assert!(s.require_strong_key);
        assert!(rejected.is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = Settings {
            key: "hunter2-hunter2".into(),
            serializer: Serializer::Json,
            require_strong_key: false,
        };
        let printed = format!("{cfg:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("hunter2"));
    }
}
