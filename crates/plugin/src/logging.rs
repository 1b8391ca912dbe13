//! Logging initialization for the host process.

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Level used unless `RUST_LOG` says otherwise
pub fn default_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install a console subscriber.
///
/// The host may load the library more than once per process; only the
/// first call installs a subscriber.
pub fn init(debug: bool) {
    let filter = EnvFilter::from_default_env().add_directive(default_level(debug).into());

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), Level::DEBUG);
        assert_eq!(default_level(false), Level::INFO);
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
