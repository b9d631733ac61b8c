//! Picker-side re-entry commands.
//!
//! The selector can only run shell commands for inline-execute bindings and
//! preview panes, so those re-invoke this binary with a hidden subcommand.
//! Each run opens its own short-lived MPD connection. Both commands are
//! best-effort: they always exit 0 and never initialize the logger, since
//! several of them can run concurrently while a screen stays interactive
//! and their output (if any) is swallowed by the selector.

use crate::app::cli::Target;
use crate::app::config::Config;
use crate::app::dispatcher::Dispatcher;
use crate::app::format::Template;
use crate::app::library;
use crate::app::mpd::Mpd;
use mpd_client::responses::Song;

async fn songs_for_target(mpd: &Mpd, target: &Target) -> color_eyre::Result<Vec<Song>> {
    match target {
        Target::Artist { name } => mpd.songs_of_artist(name).await,
        Target::Album { artist, name } => mpd.songs_of_album(artist, name).await,
        Target::Genre { name } => mpd.songs_of_genre(name).await,
    }
}

/// Enqueue everything matching the target. Failures are deliberately not
/// surfaced; the screen the user is looking at must stay undisturbed.
pub async fn run_enqueue(config: &Config, target: &Target) -> i32 {
    let result = async {
        let mpd = Mpd::connect(&config.mpd.address).await?;
        let songs = songs_for_target(&mpd, target).await?;
        let uris: Vec<String> = songs
            .iter()
            .map(|song| song.file_path().to_string_lossy().into_owned())
            .collect();
        Dispatcher::new(mpd.handle()).enqueue(&uris).await?;
        Ok::<(), color_eyre::Report>(())
    }
    .await;

    if let Err(e) = result {
        eprintln!("enqueue failed: {}", e);
    }
    0
}

/// Print one line per matching song for the preview pane. Prints nothing on
/// failure; a broken preview must not break the screen.
pub async fn run_preview(config: &Config, target: &Target) -> i32 {
    let template = match target {
        Target::Album { .. } => Template::parse("[%track% - ]%title%"),
        _ => Template::parse("[%album% - ]%title%"),
    };

    let result = async {
        let mpd = Mpd::connect(&config.mpd.address).await?;
        let songs = songs_for_target(&mpd, target).await?;
        for song in &songs {
            println!("{}", library::render_song(song, &template));
        }
        Ok::<(), color_eyre::Report>(())
    }
    .await;

    if let Err(e) = result {
        eprintln!("preview failed: {}", e);
    }
    0
}
