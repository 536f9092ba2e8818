use std::path::PathBuf;
use std::process::ExitCode;

use vitrine::ShowcaseConfig;

/// Environment variable naming a TOML config file.
const CONFIG_ENV: &str = "VITRINE_CONFIG";

fn load_config() -> ShowcaseConfig {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from);

    let Some(path) = path else {
        return ShowcaseConfig::default();
    };

    match ShowcaseConfig::from_toml_file(&path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            ShowcaseConfig::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match vitrine::run(load_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
