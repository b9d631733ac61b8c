use mpd_client::{
    Client,
    client::ConnectionEvents,
    commands,
    filter::{Filter, Operator},
    responses::{Song, SongInQueue},
    tag::Tag,
};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;

/// Thin wrapper around the MPD connection. Every read is a fresh snapshot;
/// nothing is cached here.
pub struct Mpd {
    client: Client,
    // Keeps the connection's event stream alive for the session
    _events: ConnectionEvents,
}

/// Connect to MPD via Unix socket or TCP based on address format
async fn connect_stream(address: &str) -> color_eyre::Result<(Client, ConnectionEvents)> {
    let is_unix_socket = address.contains('/');

    if is_unix_socket {
        #[cfg(unix)]
        {
            let connection = UnixStream::connect(address).await?;
            Ok(Client::connect(connection).await?)
        }
        #[cfg(not(unix))]
        {
            Err(color_eyre::eyre::eyre!(
                "Unix sockets are not supported on this platform"
            ))
        }
    } else {
        let connection = TcpStream::connect(address).await?;
        Ok(Client::connect(connection).await?)
    }
}

impl Mpd {
    pub async fn connect(address: &str) -> color_eyre::Result<Self> {
        let (client, events) = connect_stream(address).await.inspect_err(|e| {
            crate::app::logging::log_mpd_connection(address, false, Some(&e.to_string()));
        })?;
        crate::app::logging::log_mpd_connection(address, true, None);
        Ok(Self {
            client,
            _events: events,
        })
    }

    /// Cloneable command handle for fire-and-forget background mutations.
    pub fn handle(&self) -> Client {
        self.client.clone()
    }

    // --- reads ---

    /// Distinct values for a tag across the whole library.
    pub async fn list_tag(&self, tag: Tag) -> color_eyre::Result<Vec<String>> {
        let values = self.client.command(commands::List::new(tag)).await?;
        Ok(values.into_iter().filter(|v| !v.is_empty()).collect())
    }

    /// Every song in the library. Matches on the file tag existing, which
    /// is true for all real entries.
    pub async fn all_songs(&self) -> color_eyre::Result<Vec<Song>> {
        let filter = Filter::tag_exists(Tag::Other("file".into()));
        Ok(self.client.command(commands::Find::new(filter)).await?)
    }

    pub async fn songs_of_artist(&self, artist: &str) -> color_eyre::Result<Vec<Song>> {
        let filter = Filter::new(Tag::Artist, Operator::Equal, artist);
        let find = commands::Find::new(filter).sort(Tag::Album);
        Ok(self.client.command(find).await?)
    }

    pub async fn songs_of_album(&self, artist: &str, album: &str) -> color_eyre::Result<Vec<Song>> {
        let filter = Filter::new(Tag::Artist, Operator::Equal, artist)
            .and(Filter::new(Tag::Album, Operator::Equal, album));
        Ok(self.client.command(commands::Find::new(filter)).await?)
    }

    pub async fn songs_of_genre(&self, genre: &str) -> color_eyre::Result<Vec<Song>> {
        let filter = Filter::new(Tag::Genre, Operator::Equal, genre);
        Ok(self.client.command(commands::Find::new(filter)).await?)
    }

    /// Current queue, ordered, each entry carrying its 0-based position.
    pub async fn queue(&self) -> color_eyre::Result<Vec<SongInQueue>> {
        Ok(self.client.command(commands::Queue).await?)
    }

    pub async fn current_song(&self) -> color_eyre::Result<Option<SongInQueue>> {
        Ok(self.client.command(commands::CurrentSong).await?)
    }
}
