mod client;

pub use client::Mpd;
