use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".groupsave";
const HOME_ENV: &str = "GROUPSAVE_HOME";
const DEFAULT_FILTER: &str = "groupsave_core=info";

/// Installs the global tracing subscriber. Callers go through [`crate::init`],
/// which runs this once; a second install is ignored.
///
/// `RUST_LOG` wins over `directives`, which win over the crate default.
pub fn init_tracing(directives: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = directives.unwrap_or(DEFAULT_FILTER);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}


/// Returns the application data directory, defaulting to `~/.groupsave`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
