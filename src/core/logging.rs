//! Logging initialization

/// Logger builder shared by [`init`] and [`try_init`]: `info` by default,
/// overridable with `RUST_LOG`.
pub fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Initialize the logging system
///
/// # Example
/// ```no_run
/// terrasculpt::core::logging::init();
/// log::info!("Editor started");
/// ```
pub fn init() {
    builder().init();
}

/// Like [`init`], but safe to call more than once (tests, embedded hosts).
pub fn try_init() -> bool {
    builder().try_init().is_ok()
}
