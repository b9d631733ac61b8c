pub mod binds;
pub mod config;
pub mod logging;
pub mod mpd;
pub mod picker;
pub mod ui;

pub use binds::BindsConfig;
pub use config::Config;
pub use logging::LoggingConfig;
pub use ui::StartView;
