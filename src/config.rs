use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_NAME_SERVICE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_NAME_SERVICE_MODEL: &str = "llama-3.3-70b-versatile";
/// Longest accepted session lifetime: one year.
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Connection details for the chat-completions endpoint that invents codenames.
#[derive(Debug, Clone, Deserialize)]
pub struct NameServiceConfig {
    pub api_key: String,
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub self_destruct_secret: String,
    pub names: NameServiceConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let parsed_or = |key: &str, default| {
            lookup(key)
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(default)
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "gadgets".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "gadgets-users".into()),
            // 3 days
            ttl_minutes: parsed_or("JWT_TTL_MINUTES", 60 * 24 * 3).clamp(1, MAX_JWT_TTL_MINUTES),
        };

        let names = NameServiceConfig {
            api_key: required("GROQ_API_KEY")?,
            url: lookup("NAME_SERVICE_URL").unwrap_or_else(|| DEFAULT_NAME_SERVICE_URL.into()),
            model: lookup("NAME_SERVICE_MODEL").unwrap_or_else(|| DEFAULT_NAME_SERVICE_MODEL.into()),
            timeout_secs: lookup("NAME_SERVICE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };

        let port = lookup("APP_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt,
            self_destruct_secret: required("SELF_DESTRUCT_SECRET")?,
            names,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/gadgets"),
        ("JWT_SECRET", "jwt-secret"),
        ("SELF_DESTRUCT_SECRET", "boom"),
        ("GROQ_API_KEY", "gsk_test"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let cfg = AppConfig::from_lookup(lookup_from(REQUIRED)).expect("config");
        assert_eq!(cfg.jwt.ttl_minutes, 4320);
        assert_eq!(cfg.jwt.issuer, "gadgets");
        assert_eq!(cfg.names.url, DEFAULT_NAME_SERVICE_URL);
        assert_eq!(cfg.names.model, DEFAULT_NAME_SERVICE_MODEL);
        assert_eq!(cfg.names.timeout_secs, 15);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.self_destruct_secret, "boom");
    }

    #[test]
    fn port_falls_back_to_plain_port_var() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "8081"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
        assert_eq!(cfg.port, 8081);

        pairs.push(("APP_PORT", "9000"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn garbage_ttl_uses_default() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JWT_TTL_MINUTES", "soon"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
        assert_eq!(cfg.jwt.ttl_minutes, 4320);
    }

    #[test]
    fn out_of_range_ttl_is_clamped() {
        for (raw, expected) in [
            ("9223372036854775807", MAX_JWT_TTL_MINUTES),
            ("-5", 1),
            ("0", 1),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("JWT_TTL_MINUTES", raw));
            let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
            assert_eq!(cfg.jwt.ttl_minutes, expected, "{raw}");
        }
    }

    #[test]
    fn missing_self_destruct_secret_is_an_error() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "SELF_DESTRUCT_SECRET")
            .collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("SELF_DESTRUCT_SECRET"));
    }
}
