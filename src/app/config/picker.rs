use serde::{Deserialize, Serialize};

/// Environment variable for a session-level picker option override.
pub const SESSION_OPTS_VAR: &str = "FZMPD_FZF_OPTS";
/// fzf's own options variable; fzf applies it by itself, so when it is set
/// we stop passing our options to avoid fighting over precedence.
pub const NATIVE_OPTS_VAR: &str = "FZF_DEFAULT_OPTS";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PickerConfig {
    /// Extra fzf options appended to every invocation, whitespace-separated
    #[serde(default)]
    pub options: String,
}

impl PickerConfig {
    /// Resolve the extra arguments actually passed to the picker from the
    /// current process environment.
    pub fn resolve_extra_args(&self) -> Vec<String> {
        resolve_options(
            Some(self.options.as_str()),
            std::env::var(SESSION_OPTS_VAR).ok().as_deref(),
            std::env::var(NATIVE_OPTS_VAR).ok().as_deref(),
        )
    }
}

/// Three-tier option precedence: the tool-native variable wins over the
/// session variable, which wins over the config file. The native tier wins
/// by us passing nothing, since the picker reads its own variable.
pub fn resolve_options(
    config: Option<&str>,
    session: Option<&str>,
    native: Option<&str>,
) -> Vec<String> {
    if native.is_some_and(|v| !v.trim().is_empty()) {
        return Vec::new();
    }
    let winner = match session {
        Some(s) if !s.trim().is_empty() => s,
        _ => config.unwrap_or(""),
    };
    winner.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_tier_applies_when_alone() {
        let args = resolve_options(Some("--no-sort --cycle"), None, None);
        assert_eq!(args, vec!["--no-sort", "--cycle"]);
    }

    #[test]
    fn session_tier_beats_config() {
        let args = resolve_options(Some("--no-sort"), Some("--cycle"), None);
        assert_eq!(args, vec!["--cycle"]);
    }

    #[test]
    fn native_tier_beats_everything() {
        let args = resolve_options(Some("--no-sort"), Some("--cycle"), Some("--reverse"));
        assert!(args.is_empty());
    }

    #[test]
    fn blank_tiers_fall_through() {
        let args = resolve_options(Some("--no-sort"), Some("   "), Some(""));
        assert_eq!(args, vec!["--no-sort"]);
    }
}
