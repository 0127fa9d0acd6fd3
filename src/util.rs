use tokio::task::{spawn_blocking, JoinHandle};

/// Diesel has a synchronous API, so every call to the database is spawned on
/// tokio's blocking thread pool. The current span follows the closure.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    spawn_blocking(move || current_span.in_scope(f))
}
