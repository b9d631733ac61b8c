//! Builders that turn MPD responses into picker lines.
//!
//! A line is either plain text or an [`Item`]: a hidden identifier column
//! (file path or queue position) joined by a tab to the human-readable
//! column. The picker is told to show only the visible column; the hidden
//! one comes back with the selection and drives the queue mutations.

use crate::app::format::Template;
use mpd_client::{
    responses::{Song, SongInQueue},
    tag::Tag,
};
use std::collections::{HashMap, HashSet};

/// A display line with a hidden identifier column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub display: String,
}

impl Item {
    pub fn line(&self) -> String {
        format!("{}\t{}", self.id, self.display)
    }

    /// Hidden identifier of a selected line.
    pub fn id_of_line(line: &str) -> &str {
        line.split('\t').next().unwrap_or("")
    }
}

pub fn lines(items: &[Item]) -> Vec<String> {
    items.iter().map(Item::line).collect()
}

/// Replace characters that would corrupt a picker line (control characters
/// including tab, plus invisible separators) with spaces.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{0000}'..='\u{001F}'
            | '\u{007F}'..='\u{009F}'
            | '\u{00AD}'
            | '\u{200B}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{2060}'
            | '\u{FEFF}' => ' ',
            _ => c,
        })
        .collect()
}

/// Look up a template placeholder on a song.
fn song_tag(song: &Song, name: &str) -> Option<String> {
    match name {
        "artist" => song.artists().first().map(|s| sanitize(s)),
        "album" => song.album().map(sanitize),
        "title" => song.title().map(sanitize),
        "track" => match song.number() {
            (_, 0) => None,
            (_, track) => Some(track.to_string()),
        },
        "date" => song
            .tags
            .get(&Tag::Date)
            .and_then(|values| values.first())
            .map(|s| sanitize(s)),
        "file" => Some(song.file_path().to_string_lossy().into_owned()),
        _ => None,
    }
}

/// Render one song line, falling back to the file path when the template
/// comes out empty so the line stays selectable.
pub fn render_song(song: &Song, template: &Template) -> String {
    let rendered = template.render(&|name| song_tag(song, name));
    if rendered.trim().is_empty() {
        song.file_path().to_string_lossy().into_owned()
    } else {
        rendered
    }
}

/// Song lines with the file path as hidden identifier.
pub fn song_items(songs: &[Song], template: &Template) -> Vec<Item> {
    songs
        .iter()
        .map(|song| Item {
            id: song.file_path().to_string_lossy().into_owned(),
            display: render_song(song, template),
        })
        .collect()
}

/// Distinct artist names in library order (first occurrence wins).
pub fn artists_from_songs(songs: &[Song]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut artists = Vec::new();
    for song in songs {
        for artist in song.artists() {
            let artist = sanitize(artist);
            if !artist.is_empty() && seen.insert(artist.clone()) {
                artists.push(artist);
            }
        }
    }
    artists
}

/// Album items for one artist: `(date, album)` pairs sorted by leading date
/// and deduplicated, with the album name as hidden identifier.
pub fn album_items(songs: &[Song]) -> Vec<Item> {
    let pairs: Vec<(String, String)> = songs
        .iter()
        .filter_map(|song| {
            song.album().map(|album| {
                (
                    song_tag(song, "date").unwrap_or_default(),
                    sanitize(album),
                )
            })
        })
        .filter(|(_, album)| !album.is_empty())
        .collect();

    sort_albums(pairs)
        .into_iter()
        .map(|(date, album)| {
            let display = if date.is_empty() {
                album.clone()
            } else {
                format!("{} {}", date, album)
            };
            Item { id: album, display }
        })
        .collect()
}

/// Stable sort by leading date token ascending, undated albums explicitly
/// first, then dedup by album name keeping the first occurrence.
pub fn sort_albums(mut pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    // An empty date key sorts before every dated one by construction, not
    // by collation accident
    pairs.sort_by(|a, b| match (a.0.is_empty(), b.0.is_empty()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        (false, false) => a.0.cmp(&b.0),
    });

    let mut seen = HashSet::new();
    pairs.retain(|(_, album)| seen.insert(album.clone()));
    pairs
}

/// Genre lines sorted by occurrence count descending, ties lexicographic.
pub fn genre_lines(songs: &[Song]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for song in songs {
        if let Some(values) = song.tags.get(&Tag::Genre) {
            for genre in values {
                let genre = sanitize(genre);
                if !genre.is_empty() {
                    *counts.entry(genre).or_insert(0) += 1;
                }
            }
        }
    }
    sort_genres(counts.into_iter().collect())
}

pub fn sort_genres(mut counts: Vec<(String, usize)>) -> Vec<String> {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.into_iter().map(|(genre, _)| genre).collect()
}

/// Queue lines tagged with their 1-based position as hidden identifier.
pub fn queue_items(queue: &[SongInQueue], template: &Template) -> Vec<Item> {
    queue
        .iter()
        .map(|entry| {
            let position = entry.position.0 + 1;
            let rendered = template.render(&|name| match name {
                "position" => Some(position.to_string()),
                _ => song_tag(&entry.song, name),
            });
            let rendered = if rendered.trim().is_empty() {
                entry.song.file_path().to_string_lossy().into_owned()
            } else {
                rendered
            };
            Item {
                id: position.to_string(),
                display: format!("{} {}", position, rendered),
            }
        })
        .collect()
}

/// Parse the 1-based queue positions out of selected lines, in selection
/// order. Lines that do not carry a position are skipped.
pub fn parse_positions(lines: &[String]) -> Vec<usize> {
    lines
        .iter()
        .filter_map(|line| Item::id_of_line(line).parse::<usize>().ok())
        .filter(|&position| position > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn albums_sort_by_date_ascending() {
        let sorted = sort_albums(vec![
            (s("2005"), s("Later")),
            (s("1993"), s("Early")),
            (s("1999"), s("Middle")),
        ]);
        let names: Vec<&str> = sorted.iter().map(|(_, a)| a.as_str()).collect();
        assert_eq!(names, ["Early", "Middle", "Later"]);
    }

    #[test]
    fn undated_albums_sort_first() {
        let sorted = sort_albums(vec![(s("1999"), s("Dated")), (s(""), s("Undated"))]);
        let names: Vec<&str> = sorted.iter().map(|(_, a)| a.as_str()).collect();
        assert_eq!(names, ["Undated", "Dated"]);
    }

    #[test]
    fn equal_dates_preserve_library_order() {
        let sorted = sort_albums(vec![
            (s("2001"), s("B side")),
            (s("2001"), s("A side")),
            (s("2000"), s("Oldest")),
        ]);
        let names: Vec<&str> = sorted.iter().map(|(_, a)| a.as_str()).collect();
        // Stable sort: the two 2001 albums keep their relative order
        assert_eq!(names, ["Oldest", "B side", "A side"]);
    }

    #[test]
    fn duplicate_albums_are_deduplicated() {
        let sorted = sort_albums(vec![
            (s("1999"), s("Album")),
            (s("1999"), s("Album")),
            (s("1999"), s("Other")),
        ]);
        assert_eq!(sorted.len(), 2);
    }

    #[test]
    fn genres_sort_by_frequency_descending() {
        let sorted = sort_genres(vec![(s("ambient"), 2), (s("rock"), 10), (s("jazz"), 5)]);
        assert_eq!(sorted, ["rock", "jazz", "ambient"]);
    }

    #[test]
    fn genre_count_ties_break_lexicographically() {
        // Three genres sharing one count must come out in name order
        let sorted = sort_genres(vec![
            (s("noise"), 3),
            (s("ambient"), 3),
            (s("drone"), 3),
            (s("rock"), 7),
        ]);
        assert_eq!(sorted, ["rock", "ambient", "drone", "noise"]);
    }

    #[test]
    fn positions_parse_from_hidden_column() {
        let lines = vec![s("1\t1 first song"), s("3\t3 third song")];
        assert_eq!(parse_positions(&lines), vec![1, 3]);
    }

    #[test]
    fn malformed_position_lines_are_skipped() {
        let lines = vec![s("not a number\tx"), s("0\tzero"), s("2\t2 ok")];
        assert_eq!(parse_positions(&lines), vec![2]);
    }

    #[test]
    fn item_round_trip() {
        let item = Item {
            id: s("music/a.flac"),
            display: s("Artist - Song"),
        };
        assert_eq!(Item::id_of_line(&item.line()), "music/a.flac");
    }

    #[test]
    fn sanitize_strips_tabs_and_control_chars() {
        assert_eq!(sanitize("a\tb\nc"), "a b c");
        assert_eq!(sanitize("plain"), "plain");
    }
}
