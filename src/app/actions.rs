use crate::app::config::BindsConfig;

/// Logical actions that can be bound to a picker key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Jump to the play queue view
    Playlist,
    /// Jump to the flat song list
    Track,
    /// Jump to the artist list
    Artist,
    /// Jump to the genre list
    Genre,
    /// Enqueue the highlighted entry without leaving the screen
    FindAdd,
}

/// Immutable key-binding table, built once at startup from the defaults
/// layered with validated config overrides.
///
/// Token collisions are allowed; `resolve` scans in declaration order
/// (playlist, track, artist, genre, findadd), so the earliest declared
/// action always wins for a shared token.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    playlist: String,
    track: String,
    artist: String,
    genre: String,
    findadd: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            playlist: "f1".to_string(),
            track: "f2".to_string(),
            artist: "f3".to_string(),
            genre: "f4".to_string(),
            findadd: "ctrl-space".to_string(),
        }
    }
}

impl KeyBindings {
    /// Build the table from the config section. Invalid key tokens keep the
    /// built-in default and produce a warning instead of failing startup.
    pub fn from_config(config: &BindsConfig) -> (Self, Vec<String>) {
        let mut table = Self::default();
        let mut warnings = Vec::new();

        let overrides = [
            ("playlist", &config.playlist, &mut table.playlist),
            ("track", &config.track, &mut table.track),
            ("artist", &config.artist, &mut table.artist),
            ("genre", &config.genre, &mut table.genre),
            ("findadd", &config.findadd, &mut table.findadd),
        ];
        for (name, value, slot) in overrides {
            let Some(value) = value else { continue };
            let token = value.trim().to_lowercase();
            if is_valid_key_token(&token) {
                *slot = token;
            } else {
                warnings.push(format!(
                    "Invalid key token for binds.{}: {:?} (keeping {:?})",
                    name, value, slot
                ));
            }
        }

        (table, warnings)
    }

    /// Resolve a picker key token to a logical action, first declared wins.
    pub fn resolve(&self, token: &str) -> Option<Action> {
        let order = [
            (self.playlist.as_str(), Action::Playlist),
            (self.track.as_str(), Action::Track),
            (self.artist.as_str(), Action::Artist),
            (self.genre.as_str(), Action::Genre),
            (self.findadd.as_str(), Action::FindAdd),
        ];
        order
            .into_iter()
            .find(|(bound, _)| *bound == token)
            .map(|(_, action)| action)
    }

    /// The four view-switching tokens, passed to every selection screen as
    /// expected keys.
    pub fn view_tokens(&self) -> [&str; 4] {
        [&self.playlist, &self.track, &self.artist, &self.genre]
    }

    pub fn findadd(&self) -> &str {
        &self.findadd
    }
}

/// Check a key token against the shapes the fuzzy selector understands:
/// a single printable character, `f1`..`f12`, a named key, or a
/// `ctrl-`/`alt-`/`shift-` prefix in front of another valid token.
pub fn is_valid_key_token(token: &str) -> bool {
    const NAMED: &[&str] = &[
        "space", "enter", "tab", "btab", "esc", "del", "bspace", "up", "down", "left", "right",
        "home", "end", "pgup", "pgdn", "insert",
    ];

    if token.is_empty() {
        return false;
    }
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return !c.is_whitespace();
    }
    if NAMED.contains(&token) {
        return true;
    }
    if let Some(num) = token.strip_prefix('f')
        && let Ok(n) = num.parse::<u8>()
    {
        return (1..=12).contains(&n);
    }
    for prefix in ["ctrl-", "alt-", "shift-"] {
        if let Some(rest) = token.strip_prefix(prefix) {
            return is_valid_key_token(rest);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::BindsConfig;

    fn binds(
        playlist: Option<&str>,
        track: Option<&str>,
        artist: Option<&str>,
        genre: Option<&str>,
        findadd: Option<&str>,
    ) -> BindsConfig {
        BindsConfig {
            playlist: playlist.map(String::from),
            track: track.map(String::from),
            artist: artist.map(String::from),
            genre: genre.map(String::from),
            findadd: findadd.map(String::from),
        }
    }

    #[test]
    fn defaults_resolve_to_their_actions() {
        let table = KeyBindings::default();
        assert_eq!(table.resolve("f1"), Some(Action::Playlist));
        assert_eq!(table.resolve("f2"), Some(Action::Track));
        assert_eq!(table.resolve("f3"), Some(Action::Artist));
        assert_eq!(table.resolve("f4"), Some(Action::Genre));
        assert_eq!(table.resolve("ctrl-space"), Some(Action::FindAdd));
        assert_eq!(table.resolve("f5"), None);
    }

    #[test]
    fn override_replaces_default() {
        let (table, warnings) =
            KeyBindings::from_config(&binds(Some("ctrl-p"), None, None, None, None));
        assert!(warnings.is_empty());
        assert_eq!(table.resolve("ctrl-p"), Some(Action::Playlist));
        assert_eq!(table.resolve("f1"), None);
    }

    #[test]
    fn colliding_tokens_resolve_deterministically() {
        // playlist and track share a token; playlist is declared first and
        // must win on every run
        let config = binds(Some("f9"), Some("f9"), None, None, None);
        for _ in 0..32 {
            let (table, _) = KeyBindings::from_config(&config);
            assert_eq!(table.resolve("f9"), Some(Action::Playlist));
        }
    }

    #[test]
    fn invalid_token_keeps_default_and_warns() {
        let (table, warnings) =
            KeyBindings::from_config(&binds(None, Some("not a key"), None, None, None));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("binds.track"));
        assert_eq!(table.resolve("f2"), Some(Action::Track));
    }

    #[test]
    fn token_validation_shapes() {
        for ok in ["a", ">", "f1", "f12", "del", "ctrl-x", "alt-enter", "ctrl-space", "shift-f5"] {
            assert!(is_valid_key_token(ok), "{ok} should be valid");
        }
        for bad in ["", " ", "f0", "f13", "meta-x", "ctrl-", "enterr"] {
            assert!(!is_valid_key_token(bad), "{bad} should be invalid");
        }
    }
}
