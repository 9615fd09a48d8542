//! Runtime configuration for the OpenReplay connection.
//!
//! Configuration is read once from the process environment at startup and
//! is immutable thereafter. Nothing is validated eagerly: a missing
//! credential or project identifier simply makes remote calls fail, and
//! that failure is surfaced through the normal tool-result path.
//!
//! Environment variables:
//! - `OPENREPLAY_API_URL` - base URL (defaults to the public cloud endpoint)
//! - `OPENREPLAY_API_KEY` / `OPENREPLAY_PROJECT_ID` - full-access mode
//! - `OPENREPLAY_ORG_API_KEY` / `OPENREPLAY_PROJECT_KEY` - organization mode
//! - `OPENREPLAY_AUTH_MODE` - explicit mode override (`full-access` or
//!   `organization`); without it, the presence of the organization key
//!   selects organization mode

use std::env;

use crate::api::auth::AuthMode;
use crate::api::DEFAULT_API_URL;

/// Resolved connection settings, established once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base API URL, without a trailing slash requirement.
    pub api_url: String,
    /// API credential for the active mode; `None` when unset.
    pub credential: Option<String>,
    /// Project identifier interpolated into request paths; `None` when unset.
    pub project: Option<String>,
    /// Active authentication mode.
    pub mode: AuthMode,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves configuration through an injectable variable lookup.
    ///
    /// Factored out of [`Config::from_env`] so tests can supply variables
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let org_key = non_empty("OPENREPLAY_ORG_API_KEY");
        let api_key = non_empty("OPENREPLAY_API_KEY");

        // Explicit mode wins; otherwise the organization key's presence
        // selects organization mode.
        let mode = match non_empty("OPENREPLAY_AUTH_MODE").and_then(|v| v.parse().ok()) {
            Some(mode) => mode,
            None if org_key.is_some() => AuthMode::Organization,
            None => AuthMode::FullAccess,
        };

        let (credential, project) = match mode {
            AuthMode::FullAccess => (api_key, non_empty("OPENREPLAY_PROJECT_ID")),
            AuthMode::Organization => (org_key, non_empty("OPENREPLAY_PROJECT_KEY")),
        };

        let api_url = non_empty("OPENREPLAY_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url,
            credential,
            project,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults_to_full_access_with_public_url() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.mode, AuthMode::FullAccess);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.credential.is_none());
        assert!(config.project.is_none());
    }

    #[test]
    fn test_full_access_key_and_project() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENREPLAY_API_KEY", "secret"),
            ("OPENREPLAY_PROJECT_ID", "1234"),
        ]));
        assert_eq!(config.mode, AuthMode::FullAccess);
        assert_eq!(config.credential.as_deref(), Some("secret"));
        assert_eq!(config.project.as_deref(), Some("1234"));
    }

    #[test]
    fn test_organization_key_selects_organization_mode() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENREPLAY_ORG_API_KEY", "org-secret"),
            ("OPENREPLAY_PROJECT_KEY", "abcdef"),
        ]));
        assert_eq!(config.mode, AuthMode::Organization);
        assert_eq!(config.credential.as_deref(), Some("org-secret"));
        assert_eq!(config.project.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_explicit_mode_override_wins() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENREPLAY_AUTH_MODE", "full-access"),
            ("OPENREPLAY_ORG_API_KEY", "org-secret"),
            ("OPENREPLAY_API_KEY", "secret"),
        ]));
        assert_eq!(config.mode, AuthMode::FullAccess);
        assert_eq!(config.credential.as_deref(), Some("secret"));
    }

    #[test]
    fn test_custom_api_url() {
        let config = Config::from_lookup(lookup_from(&[(
            "OPENREPLAY_API_URL",
            "https://openreplay.internal.example.com",
        )]));
        assert_eq!(config.api_url, "https://openreplay.internal.example.com");
    }

    #[test]
    fn test_empty_values_are_treated_as_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENREPLAY_API_KEY", ""),
            ("OPENREPLAY_API_URL", ""),
        ]));
        assert!(config.credential.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
