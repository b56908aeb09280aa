//! main.rs
//! Entry point for sgt

use sgt::app::AppState;
use sgt::config::Config;
use sgt::core::history::{default_history_path, default_session_path};
use sgt::core::{History, Session, terminal};
use sgt::logging;
use sgt::utils::cli::handle_args;
use sgt::utils::expand_home_path;

use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stderr = std::io::stderr();
        let _ = crossterm::execute!(
            stderr,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[sgt] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let args = match handle_args() {
        Ok(Some(args)) => args,
        Ok(None) => return Ok(()),
        Err(msg) => {
            eprintln!("[sgt] Error: {msg}");
            std::process::exit(2);
        }
    };

    let _log_guard = logging::default_log_dir().and_then(|dir| logging::init(&dir));

    let mut config = Config::load();
    if args.no_color || std::env::var_os("NO_COLOR").is_some() {
        config = config.without_colors();
    }

    let history = match default_history_path() {
        Some(file) => History::load(file, config.general().history_size()),
        None => History::in_memory(config.general().history_size()),
    };
    let session = Session::new(default_session_path());

    let restored = if args.restore || config.general().restore_session() {
        session.restore()
    } else {
        None
    };

    let start_dir = match (&args.path, restored) {
        (Some(raw), _) => {
            let target = expand_home_path(raw);
            if !target.is_dir() {
                eprintln!("[sgt] Error: '{}' is not a directory", raw);
                std::process::exit(1);
            }
            target
        }
        (None, Some(dir)) => dir,
        (None, None) => std::env::current_dir()?,
    };
    let start_dir = start_dir.canonicalize().unwrap_or(start_dir);

    let mut app = match AppState::new(&config, &start_dir, history, session) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("[sgt] Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(dir = %start_dir.display(), "sgt started");

    let final_dir: PathBuf = terminal::run_terminal(&mut app)?;
    println!("{}", final_dir.display());
    Ok(())
}
