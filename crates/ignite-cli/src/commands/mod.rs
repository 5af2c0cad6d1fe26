pub mod completions;
pub mod config;
pub mod run;
pub mod session;

/// Single-threaded runtime; the countdown is the only background task.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
