pub mod actions;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod format;
pub mod library;
pub mod logging;
pub mod mpd;
pub mod navigator;
pub mod picker;
pub mod tool;
