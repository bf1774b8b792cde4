use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};
use std::sync::Arc;
use std::time::Instant;

const CHANNEL_SIZE: usize = 1024;

/// Root slog logger writing to the terminal through an async drain.
/// Colour is turned off when stdout feeds a log collector.
pub fn root_logger(color: bool) -> Logger {
    let mut decorator = TermDecorator::new();
    if color {
        decorator = decorator.force_color();
    }
    let drain = FullFormat::new(decorator.build()).build().fuse();
    let drain = Async::new(drain).chan_size(CHANNEL_SIZE).build().fuse();

    Logger::root(
        drain,
        o!("service" => env!("CARGO_PKG_NAME"), "version" => env!("CARGO_PKG_VERSION")),
    )
}

/// Logger that drops everything; used by tests and tools
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// Child logger tagged with the owning component
pub fn component_logger(base: &Logger, component: &'static str) -> Logger {
    base.new(o!("component" => component))
}

/// State struct for logging middleware
#[derive(Clone)]
pub struct LoggingState {
    logger: Logger,
}

impl LoggingState {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

/// Access-log middleware: one line per handled request, server errors at warn
pub async fn logging_middleware(
    State(state): State<Arc<LoggingState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        slog::warn!(state.logger, "request failed";
            "method" => method, "path" => path, "status" => status.as_u16(), "elapsed_ms" => elapsed_ms);
    } else {
        slog::info!(state.logger, "request";
            "method" => method, "path" => path, "status" => status.as_u16(), "elapsed_ms" => elapsed_ms);
    }

    response
}
