use anyhow::Result;
use anyhow::anyhow;
use env_logger::{Env, Target};
use ftail::Ftail;
use log::LevelFilter;
use log::info;
use std::env;
use std::fs;

const LOGS_DIR: &str = ".logs";
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Stdout belongs to the monitoring system, so logs go to a file. If that
/// cannot be set up, fall back to stderr. Never fails the check.
pub fn init_logger(debug: bool) {
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };

    if let Err(e) = init_file_logger(level) {
        let default_filter = if debug { "debug" } else { "warn" };
        let fallback = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
            .target(Target::Stderr)
            .try_init();
        if fallback.is_ok() {
            log::warn!("Logging to stderr: {}", e);
        }
    }
}

fn init_file_logger(level: LevelFilter) -> Result<()> {
    let home_folder = match env::home_dir() {
        Some(h) => h,
        None => return Err(anyhow!("Could not determine $HOME")),
    };

    let logs_path = home_folder.join(LOGS_DIR).join(PKG_NAME);
    let logs_file = logs_path.join(format!("{}.log", PKG_NAME));

    match fs::create_dir_all(&logs_path) {
        Ok(_) => (),
        Err(e) => {
            return Err(anyhow!(
                "Could not create logs dir at {:#?}: {}",
                &logs_path,
                e
            ));
        }
    }

    match Ftail::new().single_file(&logs_file, true, level).init() {
        Ok(_) => {
            info!("Logger initialized.");
            Ok(())
        }
        Err(e) => Err(anyhow!("Could not initialize logger: {}", e)),
    }
}
