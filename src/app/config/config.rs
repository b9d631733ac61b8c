use crate::app::config::binds::BindsConfig;
use crate::app::config::logging::LoggingConfig;
use crate::app::config::mpd::MpdConfig;
use crate::app::config::picker::PickerConfig;
use crate::app::config::ui::UiConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mpd: MpdConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub binds: BindsConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use two rows instead of full matrix for memory efficiency
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Find the most similar string from a list of candidates
fn find_similar(unknown: &str, candidates: &[&str]) -> Option<String> {
    let unknown_lower = unknown.to_lowercase();

    let mut best_match: Option<(&str, usize)> = None;

    for &candidate in candidates {
        let distance = levenshtein_distance(&unknown_lower, &candidate.to_lowercase());

        // Only suggest when the distance is reasonable relative to the length
        let max_len = unknown.len().max(candidate.len());
        let threshold = (max_len / 2).max(3);

        if distance <= threshold {
            if let Some((_, best_distance)) = best_match {
                if distance < best_distance {
                    best_match = Some((candidate, distance));
                }
            } else {
                best_match = Some((candidate, distance));
            }
        }
    }

    best_match.map(|(s, _)| s.to_string())
}

/// Format an unknown config warning with optional "did you mean" suggestion
fn format_unknown_warning(section: &str, key: &str, suggestion: Option<&str>) -> String {
    if section == "section" {
        match suggestion {
            Some(s) => format!("Unknown config section: [{}] (did you mean: [{}]?)", key, s),
            None => format!("Unknown config section: [{}]", key),
        }
    } else {
        match suggestion {
            Some(s) => format!(
                "Unknown option in {}: {} (did you mean: {}?)",
                section, key, s
            ),
            None => format!("Unknown option in {}: {}", section, key),
        }
    }
}

impl Config {
    /// Returns the default config file path based on the platform:
    /// - Linux: ~/.config/fzmpd/config.toml (XDG_CONFIG_HOME)
    /// - macOS: ~/Library/Application Support/fzmpd/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\fzmpd\config.toml
    fn default_config_path() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(config_dir.join("fzmpd").join("config.toml"))
    }

    /// Load the config, creating a default file on first run. Returns the
    /// config together with every warning collected while reading it;
    /// warnings are reported once the logger is up and are never fatal.
    pub fn load(config_path: Option<PathBuf>) -> color_eyre::Result<(Self, Vec<String>)> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_string)?;

            eprintln!("Created default config file at: {}", config_path.display());

            return Ok((default_config, Vec::new()));
        }
        let contents = std::fs::read_to_string(&config_path)?;
        Ok(Self::from_toml(&contents))
    }

    /// Parse config contents, collecting warnings instead of failing.
    pub fn from_toml(contents: &str) -> (Self, Vec<String>) {
        let mut warnings = Self::check_unknown_fields(contents);

        let config: Config = match toml::from_str(contents) {
            Ok(config) => config,
            Err(e) => {
                warnings.push(format!(
                    "Failed to parse config file, using defaults: {}",
                    e
                ));
                Config::default()
            }
        };
        (config, warnings)
    }

    /// Check for unknown fields in the config file and return warnings
    fn check_unknown_fields(contents: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        const KNOWN_SECTIONS: &[&str] = &["mpd", "ui", "binds", "picker", "logging"];
        const KNOWN_MPD_FIELDS: &[&str] = &["address"];
        const KNOWN_UI_FIELDS: &[&str] = &["default_view", "full_song_format"];
        const KNOWN_BINDS_FIELDS: &[&str] = &["playlist", "track", "artist", "genre", "findadd"];
        const KNOWN_PICKER_FIELDS: &[&str] = &["options"];
        const KNOWN_LOGGING_FIELDS: &[&str] = &[
            "enabled",
            "level",
            "append_to_file",
            "rotate_logs",
            "rotation_size_mb",
            "keep_log_files",
        ];

        // Parse as generic TOML table
        let table: Result<toml::Table, _> = toml::from_str(contents);
        let table = match table {
            Ok(t) => t,
            Err(_) => return warnings, // Let the main parser handle errors
        };

        for key in table.keys() {
            if !KNOWN_SECTIONS.contains(&key.as_str()) {
                let suggestion = find_similar(key, KNOWN_SECTIONS);
                warnings.push(format_unknown_warning("section", key, suggestion.as_deref()));
            }
        }

        let sections: [(&str, &[&str]); 5] = [
            ("mpd", KNOWN_MPD_FIELDS),
            ("ui", KNOWN_UI_FIELDS),
            ("binds", KNOWN_BINDS_FIELDS),
            ("picker", KNOWN_PICKER_FIELDS),
            ("logging", KNOWN_LOGGING_FIELDS),
        ];
        for (section, known_fields) in sections {
            if let Some(toml::Value::Table(fields)) = table.get(section) {
                for key in fields.keys() {
                    if !known_fields.contains(&key.as_str()) {
                        let suggestion = find_similar(key, known_fields);
                        warnings.push(format_unknown_warning(
                            &format!("[{}]", section),
                            key,
                            suggestion.as_deref(),
                        ));
                    }
                }
            }
        }

        warnings
    }

    /// Generate a default config file at the specified path
    pub fn generate_default(path: PathBuf) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Config file already exists at: {}",
                path.display()
            ));
        }

        let default_config = Config::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        std::fs::write(&path, &toml_string)?;

        println!("Generated default config at: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_section_and_field_warn() {
        let contents = "[mdp]\naddress = \"x\"\n\n[binds]\nplaylst = \"f1\"\n";
        let (_, warnings) = Config::from_toml(contents);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("[mdp]"));
        assert!(warnings[0].contains("mpd"));
        assert!(warnings[1].contains("playlst"));
        assert!(warnings[1].contains("playlist"));
    }

    #[test]
    fn valid_overrides_apply() {
        let contents = "[ui]\ndefault_view = \"playlist\"\n\n[binds]\ntrack = \"ctrl-t\"\n";
        let (config, warnings) = Config::from_toml(contents);
        assert!(warnings.is_empty());
        assert_eq!(config.ui.default_view, "playlist");
        assert_eq!(config.binds.track.as_deref(), Some("ctrl-t"));
        // Untouched sections keep defaults
        assert_eq!(config.mpd.address, "localhost:6600");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults_with_warning() {
        let (config, warnings) = Config::from_toml("[mpd]\naddress = not quoted\n");
        assert!(!warnings.is_empty());
        assert_eq!(config.mpd.address, "localhost:6600");
    }
}
