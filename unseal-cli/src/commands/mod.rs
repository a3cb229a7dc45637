//! CLI command implementations

pub mod analyze;
pub mod recover;
pub mod run;

pub use analyze::AnalyzeArgs;
pub use recover::RecoverArgs;
pub use run::RunArgs;

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level),
    )
    .try_init();
}
