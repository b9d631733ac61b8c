//! Queue mutations.
//!
//! Every write against MPD goes through here. The navigator treats these as
//! fire-and-forget: play and delete from the playlist screen are spawned in
//! the background and their failures are only logged, the screen re-renders
//! immediately against a possibly briefly stale queue.

use crate::app::logging::log_mpd_command;
use mpd_client::{
    Client,
    commands::{self, SongPosition},
};

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Next,
    Prev,
}

pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Append items to the queue in the order given. An empty list is a
    /// recoverable no-op, not an error. Returns the number of items added.
    pub async fn enqueue(&self, uris: &[String]) -> color_eyre::Result<usize> {
        if uris.is_empty() {
            return Ok(0);
        }
        for uri in uris {
            self.client.command(commands::Add::uri(uri)).await?;
        }
        log_mpd_command(&format!("add x{}", uris.len()), true, None);
        Ok(uris.len())
    }

    /// Enqueue, then start playback at the first newly-added position.
    pub async fn enqueue_and_play(&self, uris: &[String]) -> color_eyre::Result<()> {
        let len_before = self.client.command(commands::Queue).await?.len();
        let added = self.enqueue(uris).await?;
        if let Some(index) = first_added_index(len_before, added) {
            let position: SongPosition = index.into();
            self.client.command(commands::Play::song(position)).await?;
            log_mpd_command(&format!("play {}", index), true, None);
        }
        Ok(())
    }

    /// Start playback at a 1-based queue position, in the background.
    pub fn play_position_bg(&self, position: usize) {
        if position == 0 {
            return;
        }
        let client = self.client.clone();
        tokio::spawn(async move {
            let pos: SongPosition = (position - 1).into();
            if let Err(e) = client.command(commands::Play::song(pos)).await {
                log_mpd_command(&format!("play {}", position - 1), false, Some(&e.to_string()));
            }
        });
    }

    /// Remove 1-based queue positions, in the background. Positions are
    /// deleted highest-first so earlier removals do not shift later ones.
    /// An empty list is a no-op.
    pub fn delete_positions_bg(&self, positions: Vec<usize>) {
        let ordered = delete_order(positions);
        if ordered.is_empty() {
            return;
        }
        let client = self.client.clone();
        tokio::spawn(async move {
            for index in ordered {
                let pos: SongPosition = index.into();
                if let Err(e) = client.command(commands::Delete::position(pos)).await {
                    log_mpd_command(&format!("delete {}", index), false, Some(&e.to_string()));
                }
            }
        });
    }

    /// Skip to the next or previous track.
    pub async fn jump(&self, direction: Direction) -> color_eyre::Result<()> {
        match direction {
            Direction::Next => self.client.command(commands::Next).await?,
            Direction::Prev => self.client.command(commands::Previous).await?,
        }
        Ok(())
    }

    /// Empty the queue.
    pub async fn clear(&self) -> color_eyre::Result<()> {
        self.client.command(commands::ClearQueue).await?;
        log_mpd_command("clear", true, None);
        Ok(())
    }
}

/// 0-based index of the first newly-added queue entry: with N entries
/// before the add, the first new one sits at N regardless of how many were
/// added. `None` when nothing was added.
pub fn first_added_index(len_before: usize, added: usize) -> Option<usize> {
    (added > 0).then_some(len_before)
}

/// Convert 1-based display positions into deduplicated 0-based indices in
/// descending order, the only order that keeps later deletions valid.
pub fn delete_order(positions: Vec<usize>) -> Vec<usize> {
    let mut indices: Vec<usize> = positions
        .into_iter()
        .filter(|&p| p > 0)
        .map(|p| p - 1)
        .collect();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_added_item_plays_at_n_plus_one() {
        // Queue of length 4, one new item: 1-based index 5, 0-based 4
        assert_eq!(first_added_index(4, 1), Some(4));
    }

    #[test]
    fn multiple_added_items_play_at_first_new_position() {
        // Independent of k, the jump target is the first newly added entry
        for k in 2..10 {
            assert_eq!(first_added_index(4, k), Some(4));
        }
    }

    #[test]
    fn adding_nothing_plays_nothing() {
        assert_eq!(first_added_index(4, 0), None);
        assert_eq!(first_added_index(0, 0), None);
    }

    #[test]
    fn empty_queue_plays_from_the_top() {
        assert_eq!(first_added_index(0, 3), Some(0));
    }

    #[test]
    fn deletions_are_descending_zero_based() {
        assert_eq!(delete_order(vec![1, 3]), vec![2, 0]);
        assert_eq!(delete_order(vec![3, 1]), vec![2, 0]);
    }

    #[test]
    fn delete_order_dedups_and_drops_invalid() {
        assert_eq!(delete_order(vec![2, 2, 0]), vec![1]);
        assert!(delete_order(vec![]).is_empty());
    }
}
