use serde::{Deserialize, Serialize};

/// The view the navigator starts in when no CLI flag says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartView {
    Artists,
    Songs,
    Playlist,
    Genres,
}

impl StartView {
    /// Parse a config value. Returns `None` for unknown names so the caller
    /// can warn and keep the default.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "artists" => Some(Self::Artists),
            "songs" => Some(Self::Songs),
            "playlist" => Some(Self::Playlist),
            "genres" => Some(Self::Genres),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UiConfig {
    /// One of "artists", "songs", "playlist", "genres"
    #[serde(default = "UiConfig::default_default_view")]
    pub default_view: String,
    /// Template used for song lines, with %tag% placeholders and [..]
    /// conditional groups
    #[serde(default = "UiConfig::default_full_song_format")]
    pub full_song_format: String,
}

impl UiConfig {
    fn default_default_view() -> String {
        "artists".to_string()
    }

    fn default_full_song_format() -> String {
        "[[%artist% - ][%album% - ]%title%]".to_string()
    }

    /// Resolved start view; unknown names warn and fall back to artists.
    pub fn start_view(&self, warnings: &mut Vec<String>) -> StartView {
        match StartView::parse(&self.default_view) {
            Some(view) => view,
            None => {
                warnings.push(format!(
                    "Unknown default_view {:?}, falling back to \"artists\"",
                    self.default_view
                ));
                StartView::Artists
            }
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: Self::default_default_view(),
            full_song_format: Self::default_full_song_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_view_names_parse() {
        assert_eq!(StartView::parse("artists"), Some(StartView::Artists));
        assert_eq!(StartView::parse("Playlist"), Some(StartView::Playlist));
        assert_eq!(StartView::parse(" genres "), Some(StartView::Genres));
        assert_eq!(StartView::parse("albums"), None);
    }

    #[test]
    fn unknown_view_warns_and_keeps_default() {
        let ui = UiConfig {
            default_view: "albums".to_string(),
            ..UiConfig::default()
        };
        let mut warnings = Vec::new();
        assert_eq!(ui.start_view(&mut warnings), StartView::Artists);
        assert_eq!(warnings.len(), 1);
    }
}
