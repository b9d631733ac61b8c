use crate::app::config::StartView;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "fzmpd")]
#[command(version)]
#[command(about = "A fuzzy-finder driven mpd client", long_about = None)]
pub struct Args {
    /// Start in the flat song list
    #[arg(long, group = "view")]
    pub all: bool,

    /// Start in the artist list
    #[arg(long, group = "view")]
    pub artist: bool,

    /// Start in the play queue
    #[arg(long, group = "view")]
    pub playlist: bool,

    /// Start in the genre list
    #[arg(long, group = "view")]
    pub genre: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// MPD server address (overrides config)
    #[arg(long)]
    pub address: Option<String>,

    /// Write a default config file to the given path and exit
    #[arg(long)]
    pub generate_config: Option<PathBuf>,

    #[command(subcommand)]
    pub tool: Option<ToolCommand>,
}

impl Args {
    /// Initial view requested on the command line, if any. The flags are
    /// mutually exclusive (clap group), so at most one can be set.
    pub fn start_view_override(&self) -> Option<StartView> {
        if self.all {
            Some(StartView::Songs)
        } else if self.artist {
            Some(StartView::Artists)
        } else if self.playlist {
            Some(StartView::Playlist)
        } else if self.genre {
            Some(StartView::Genres)
        } else {
            None
        }
    }
}

/// Re-entry points used by picker-side key bindings and previews. These are
/// implementation detail, not user surface, so they stay out of the help.
#[derive(Subcommand, Debug, Clone)]
pub enum ToolCommand {
    /// Enqueue everything matching the target, best-effort
    #[command(hide = true)]
    Enqueue {
        #[command(subcommand)]
        target: Target,
    },
    /// Print the songs matching the target for a preview pane
    #[command(hide = true)]
    Preview {
        #[command(subcommand)]
        target: Target,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum Target {
    Artist {
        name: String,
    },
    Album {
        #[arg(long)]
        artist: String,
        name: String,
    },
    Genre {
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("argv should parse")
    }

    #[test]
    fn view_flags_map_to_start_views() {
        assert_eq!(
            parse(&["fzmpd", "--all"]).start_view_override(),
            Some(StartView::Songs)
        );
        assert_eq!(
            parse(&["fzmpd", "--artist"]).start_view_override(),
            Some(StartView::Artists)
        );
        assert_eq!(
            parse(&["fzmpd", "--playlist"]).start_view_override(),
            Some(StartView::Playlist)
        );
        assert_eq!(
            parse(&["fzmpd", "--genre"]).start_view_override(),
            Some(StartView::Genres)
        );
        assert_eq!(parse(&["fzmpd"]).start_view_override(), None);
    }

    #[test]
    fn view_flags_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["fzmpd", "--all", "--genre"]).is_err());
    }

    #[test]
    fn hidden_tool_commands_parse() {
        let args = parse(&["fzmpd", "enqueue", "album", "--artist", "Low", "Trust"]);
        assert!(matches!(
            args.tool,
            Some(ToolCommand::Enqueue {
                target: Target::Album { .. }
            })
        ));
        let args = parse(&["fzmpd", "preview", "artist", "Low"]);
        assert!(matches!(
            args.tool,
            Some(ToolCommand::Preview {
                target: Target::Artist { .. }
            })
        ));
    }
}
