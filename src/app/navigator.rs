//! The view state machine.
//!
//! One handler per view. Each handler fetches a fresh snapshot from MPD,
//! runs one selection screen, and decides where to go next. Global
//! view-switch keys win over view-local keys, so the user can hop to the
//! playlist, song, artist or genre screen from anywhere. The whole machine
//! is a single explicit loop in [`Navigator::run`]; handlers never recurse.

use crate::app::actions::{Action, KeyBindings};
use crate::app::config::{Config, StartView};
use crate::app::dispatcher::{Direction, Dispatcher};
use crate::app::format::Template;
use crate::app::library::{self, Item};
use crate::app::mpd::Mpd;
use crate::app::picker::{Picker, PickerKey, PickerOpts, shell_quote};
use mpd_client::tag::Tag;

pub const EXIT_OK: i32 = 0;
/// A view with no fallback ended with nothing selected.
pub const EXIT_NO_SELECTION: i32 = 1;
/// A handler was entered with parameters that can never be empty in a
/// correct program. Reserved high code so it stands out from user errors.
pub const EXIT_INVARIANT: i32 = 70;

// Playlist-local keys, not configurable
const KEY_NEXT_TRACK: &str = ">";
const KEY_PREV_TRACK: &str = "<";
const KEY_DELETE: &str = "del";
const KEY_CLEAR: &str = "ctrl-x";

/// One selection screen in the navigation hierarchy. Parameterized variants
/// carry the strings needed to re-enter the parent view; a `View` lives
/// only until the next transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Songs,
    Artists,
    AlbumsOfArtist { artist: String },
    SongsOfAlbum { artist: String, album: String },
    Genres,
    ArtistsOfGenre { genre: String },
    Playlist,
}

impl From<StartView> for View {
    fn from(start: StartView) -> Self {
        match start {
            StartView::Artists => View::Artists,
            StartView::Songs => View::Songs,
            StartView::Playlist => View::Playlist,
            StartView::Genres => View::Genres,
        }
    }
}

enum Flow {
    Goto(View),
    Exit(i32),
}

/// The view a global action key jumps to, if the token is bound to one.
/// `FindAdd` is not a view switch and resolves to `None` here.
fn global_view(binds: &KeyBindings, token: &str) -> Option<View> {
    match binds.resolve(token)? {
        Action::Playlist => Some(View::Playlist),
        Action::Track => Some(View::Songs),
        Action::Artist => Some(View::Artists),
        Action::Genre => Some(View::Genres),
        Action::FindAdd => None,
    }
}

pub struct Navigator {
    mpd: Mpd,
    picker: Picker,
    dispatcher: Dispatcher,
    binds: KeyBindings,
    song_template: Template,
    /// Shell-quoted path to this binary, for picker-side re-entry commands
    exe: String,
}

impl Navigator {
    pub fn new(mpd: Mpd, picker: Picker, binds: KeyBindings, config: &Config) -> Self {
        let dispatcher = Dispatcher::new(mpd.handle());
        let song_template = Template::parse(&config.ui.full_song_format);
        let exe = std::env::current_exe()
            .ok()
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_else(|| "fzmpd".to_string());
        Self {
            mpd,
            picker,
            dispatcher,
            binds,
            song_template,
            exe: shell_quote(&exe),
        }
    }

    /// Drive the state machine until a handler asks to exit. Returns the
    /// process exit code.
    pub async fn run(mut self, start: View) -> color_eyre::Result<i32> {
        let mut view = start;
        loop {
            log::debug!("Entering view: {:?}", view);
            let flow = match view {
                View::Songs => self.songs().await?,
                View::Artists => self.artists().await?,
                View::AlbumsOfArtist { artist } => self.albums_of_artist(artist).await?,
                View::SongsOfAlbum { artist, album } => {
                    self.songs_of_album(artist, album).await?
                }
                View::Genres => self.genres().await?,
                View::ArtistsOfGenre { genre } => self.artists_of_genre(genre).await?,
                View::Playlist => self.playlist().await?,
            };
            match flow {
                Flow::Goto(next) => view = next,
                Flow::Exit(code) => return Ok(code),
            }
        }
    }

    /// Options every screen shares: the prompt and the global view-switch
    /// keys as expected keys.
    fn base_opts(&self, prompt: &str) -> PickerOpts {
        PickerOpts {
            prompt: prompt.to_string(),
            expect: self
                .binds
                .view_tokens()
                .iter()
                .map(|t| t.to_string())
                .collect(),
            ..Default::default()
        }
    }

    /// All songs, flat. Confirming hands the selection to the dispatcher
    /// with play intent; an empty confirm is a hard stop.
    async fn songs(&mut self) -> color_eyre::Result<Flow> {
        let songs = self.mpd.all_songs().await?;
        let items = library::song_items(&songs, &self.song_template);

        let mut opts = self.base_opts("songs");
        opts.multi = true;
        opts.with_fields = true;

        let sel = self.picker.show(&library::lines(&items), &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => Ok(self.global_or(&token, Flow::Exit(EXIT_NO_SELECTION))),
            PickerKey::Enter if !sel.items.is_empty() => {
                self.dispatcher
                    .enqueue_and_play(&selected_ids(&sel.items))
                    .await?;
                Ok(Flow::Goto(View::Playlist))
            }
            PickerKey::Enter => Ok(Flow::Exit(EXIT_NO_SELECTION)),
        }
    }

    async fn artists(&mut self) -> color_eyre::Result<Flow> {
        let artists = self.mpd.list_tag(Tag::Artist).await?;

        let mut opts = self.base_opts("artists");
        opts.preview = Some(format!("{} preview artist {{}}", self.exe));
        opts.inline_execute = Some((
            self.binds.findadd().to_string(),
            format!("{} enqueue artist {{}}", self.exe),
        ));

        let sel = self.picker.show(&artists, &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => Ok(self.global_or(&token, Flow::Exit(EXIT_NO_SELECTION))),
            PickerKey::Enter => match sel.items.into_iter().next() {
                Some(artist) => Ok(Flow::Goto(View::AlbumsOfArtist { artist })),
                None => Ok(Flow::Exit(EXIT_NO_SELECTION)),
            },
        }
    }

    /// Albums of one artist, date-sorted. Backs out to the artist list
    /// instead of terminating.
    async fn albums_of_artist(&mut self, artist: String) -> color_eyre::Result<Flow> {
        let songs = self.mpd.songs_of_artist(&artist).await?;
        let items = library::album_items(&songs);

        let mut opts = self.base_opts("albums");
        opts.with_fields = true;
        opts.header = Some(artist.clone());
        opts.preview = Some(format!(
            "{} preview album --artist {} {{1}}",
            self.exe,
            shell_quote(&artist)
        ));
        opts.inline_execute = Some((
            self.binds.findadd().to_string(),
            format!(
                "{} enqueue album --artist {} {{1}}",
                self.exe,
                shell_quote(&artist)
            ),
        ));

        let sel = self.picker.show(&library::lines(&items), &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => Ok(self.global_or(&token, Flow::Goto(View::Artists))),
            PickerKey::Enter => match sel.items.first() {
                Some(line) => Ok(Flow::Goto(View::SongsOfAlbum {
                    artist,
                    album: Item::id_of_line(line).to_string(),
                })),
                None => Ok(Flow::Goto(View::Artists)),
            },
        }
    }

    async fn songs_of_album(&mut self, artist: String, album: String) -> color_eyre::Result<Flow> {
        // Reaching this view without both parameters is a bug in the
        // transition logic, not a user error
        if artist.is_empty() || album.is_empty() {
            log::error!(
                "songs_of_album entered with empty parameter: artist={:?} album={:?}",
                artist,
                album
            );
            return Ok(Flow::Exit(EXIT_INVARIANT));
        }

        let songs = self.mpd.songs_of_album(&artist, &album).await?;
        let items = library::song_items(&songs, &self.song_template);

        let mut opts = self.base_opts("songs");
        opts.multi = true;
        opts.with_fields = true;
        opts.header = Some(format!("{} - {}", artist, album));

        let sel = self.picker.show(&library::lines(&items), &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => {
                Ok(self.global_or(&token, Flow::Goto(View::AlbumsOfArtist { artist })))
            }
            PickerKey::Enter if !sel.items.is_empty() => {
                self.dispatcher
                    .enqueue_and_play(&selected_ids(&sel.items))
                    .await?;
                Ok(Flow::Goto(View::Playlist))
            }
            PickerKey::Enter => Ok(Flow::Goto(View::AlbumsOfArtist { artist })),
        }
    }

    /// Genres, most common first.
    async fn genres(&mut self) -> color_eyre::Result<Flow> {
        let songs = self.mpd.all_songs().await?;
        let genres = library::genre_lines(&songs);

        let mut opts = self.base_opts("genres");
        opts.inline_execute = Some((
            self.binds.findadd().to_string(),
            format!("{} enqueue genre {{}}", self.exe),
        ));

        let sel = self.picker.show(&genres, &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => Ok(self.global_or(&token, Flow::Exit(EXIT_NO_SELECTION))),
            PickerKey::Enter => match sel.items.into_iter().next() {
                Some(genre) => Ok(Flow::Goto(View::ArtistsOfGenre { genre })),
                None => Ok(Flow::Exit(EXIT_NO_SELECTION)),
            },
        }
    }

    async fn artists_of_genre(&mut self, genre: String) -> color_eyre::Result<Flow> {
        let songs = self.mpd.songs_of_genre(&genre).await?;
        let artists = library::artists_from_songs(&songs);

        let mut opts = self.base_opts("artists");
        opts.header = Some(genre.clone());
        opts.preview = Some(format!("{} preview artist {{}}", self.exe));
        opts.inline_execute = Some((
            self.binds.findadd().to_string(),
            format!("{} enqueue artist {{}}", self.exe),
        ));

        let sel = self.picker.show(&artists, &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => Ok(self.global_or(&token, Flow::Goto(View::Genres))),
            PickerKey::Enter => match sel.items.into_iter().next() {
                Some(artist) => Ok(Flow::Goto(View::AlbumsOfArtist { artist })),
                None => Ok(Flow::Goto(View::Genres)),
            },
        }
    }

    /// The live control surface. Loops on itself after every side effect;
    /// only a cancel or a global jump leaves it. Play and delete are
    /// dispatched in the background and the queue is re-read immediately,
    /// accepting a brief staleness window over a round-trip before redraw.
    async fn playlist(&mut self) -> color_eyre::Result<Flow> {
        let queue = self.mpd.queue().await?;
        let current = self.mpd.current_song().await?;
        let items = library::queue_items(&queue, &self.song_template);

        let mut opts = self.base_opts("playlist");
        opts.multi = true;
        opts.with_fields = true;
        opts.header = current.map(|entry| {
            format!(
                "now playing: {}",
                library::render_song(&entry.song, &self.song_template)
            )
        });
        opts.expect.extend(
            [KEY_NEXT_TRACK, KEY_PREV_TRACK, KEY_DELETE, KEY_CLEAR].map(String::from),
        );

        let sel = self.picker.show(&library::lines(&items), &opts).await?;
        match sel.key {
            PickerKey::Cancel => Ok(Flow::Exit(EXIT_OK)),
            PickerKey::Token(token) => {
                // Global jumps win even over the playlist-local keys
                if let Some(view) = global_view(&self.binds, &token) {
                    return Ok(Flow::Goto(view));
                }
                match token.as_str() {
                    KEY_NEXT_TRACK => {
                        self.dispatcher.jump(Direction::Next).await?;
                        Ok(Flow::Goto(View::Playlist))
                    }
                    KEY_PREV_TRACK => {
                        self.dispatcher.jump(Direction::Prev).await?;
                        Ok(Flow::Goto(View::Playlist))
                    }
                    KEY_DELETE => {
                        self.dispatcher
                            .delete_positions_bg(library::parse_positions(&sel.items));
                        Ok(Flow::Goto(View::Playlist))
                    }
                    KEY_CLEAR => {
                        self.dispatcher.clear().await?;
                        Ok(Flow::Goto(View::Artists))
                    }
                    _ => Ok(Flow::Goto(View::Playlist)),
                }
            }
            PickerKey::Enter => {
                if let Some(&position) = library::parse_positions(&sel.items).first() {
                    self.dispatcher.play_position_bg(position);
                }
                Ok(Flow::Goto(View::Playlist))
            }
        }
    }

    fn global_or(&self, token: &str, fallback: Flow) -> Flow {
        match global_view(&self.binds, token) {
            Some(view) => Flow::Goto(view),
            None => fallback,
        }
    }
}

/// Hidden identifiers of the selected lines, in selection order.
fn selected_ids(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| Item::id_of_line(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_global_token_switches_views() {
        let binds = KeyBindings::default();
        assert_eq!(global_view(&binds, "f1"), Some(View::Playlist));
        assert_eq!(global_view(&binds, "f2"), Some(View::Songs));
        assert_eq!(global_view(&binds, "f3"), Some(View::Artists));
        assert_eq!(global_view(&binds, "f4"), Some(View::Genres));
    }

    #[test]
    fn findadd_and_unbound_tokens_are_not_view_switches() {
        let binds = KeyBindings::default();
        assert_eq!(global_view(&binds, "ctrl-space"), None);
        assert_eq!(global_view(&binds, ">"), None);
        assert_eq!(global_view(&binds, "f5"), None);
    }

    #[test]
    fn start_views_map_to_views() {
        assert_eq!(View::from(StartView::Artists), View::Artists);
        assert_eq!(View::from(StartView::Songs), View::Songs);
        assert_eq!(View::from(StartView::Playlist), View::Playlist);
        assert_eq!(View::from(StartView::Genres), View::Genres);
    }

    #[test]
    fn selected_ids_keep_selection_order() {
        let lines = vec![
            "music/b.flac\tB side".to_string(),
            "music/a.flac\tA side".to_string(),
        ];
        assert_eq!(selected_ids(&lines), vec!["music/b.flac", "music/a.flac"]);
    }
}
