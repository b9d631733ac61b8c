mod app;

use app::actions::KeyBindings;
use app::cli::{Args, ToolCommand};
use app::config::Config;
use app::mpd::Mpd;
use app::navigator::Navigator;
use app::picker::Picker;
use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Handle --generate-config option
    if let Some(path) = &args.generate_config {
        let config_path = if path.is_dir() || path.to_str() == Some(".") {
            path.join("config.toml")
        } else {
            path.clone()
        };
        Config::generate_default(config_path)?;
        return Ok(());
    }

    // Determine config path for logging later
    let config_path = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|d| d.join("fzmpd").join("config.toml"))
            .unwrap_or_default()
    });
    let config_existed = config_path.exists();

    let (mut config, config_warnings) = Config::load(args.config.clone())?;

    if let Some(ref addr) = args.address {
        config.mpd.address = addr.clone();
    }

    // Picker-side re-entry (inline execute / preview): best-effort, no
    // logger, always exits 0 so the interactive screen stays undisturbed
    if let Some(tool) = &args.tool {
        let code = match tool {
            ToolCommand::Enqueue { target } => app::tool::run_enqueue(&config, target).await,
            ToolCommand::Preview { target } => app::tool::run_preview(&config, target).await,
        };
        std::process::exit(code);
    }

    let logger_active = config.logging.enabled;
    if logger_active {
        app::logging::ensure_log_directory()?;
        app::logging::init_logger(&config.logging)?;
        app::logging::log_startup_info();
        app::logging::log_config_loading(&config_path, !config_existed);
    }
    app::logging::report_warnings(logger_active, &config_warnings);

    // Startup-fatal checks: the selector binary and the backend must both
    // be reachable before any screen is shown
    if let Err(e) = Picker::check_available() {
        eprintln!("fzmpd: {}", e);
        std::process::exit(1);
    }
    let mpd = match Mpd::connect(&config.mpd.address).await {
        Ok(mpd) => mpd,
        Err(e) => {
            eprintln!("fzmpd: cannot reach MPD at {}: {}", config.mpd.address, e);
            std::process::exit(1);
        }
    };

    let (binds, bind_warnings) = KeyBindings::from_config(&config.binds);
    app::logging::report_warnings(logger_active, &bind_warnings);

    let mut view_warnings = Vec::new();
    let start = args
        .start_view_override()
        .unwrap_or_else(|| config.ui.start_view(&mut view_warnings));
    app::logging::report_warnings(logger_active, &view_warnings);

    let picker = Picker::new(config.picker.resolve_extra_args());
    let navigator = Navigator::new(mpd, picker, binds, &config);

    let exit_code = navigator.run(start.into()).await?;

    app::logging::log_shutdown_info(exit_code);
    std::process::exit(exit_code);
}
