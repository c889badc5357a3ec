use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise crate logs at info (debug when verbose) and
/// dependencies at info.
fn launch_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "launch_board=debug,info"
    } else {
        "launch_board=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Human-readable logs on stderr, so stdout stays free for the launch table.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(launch_filter(verbose))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// JSON 格式，方便交給日誌收集器
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(launch_filter(verbose))
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}
