use std::env;
use std::path::PathBuf;

use crate::config;

pub fn load_settings() -> config::Settings {
    let cli_path = env::args_os().nth(1).map(PathBuf::from);
    match config::Settings::load(cli_path) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("reveal: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("reveal: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
