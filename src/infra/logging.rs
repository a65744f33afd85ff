use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. `RUST_LOG` wins over `level`; `verbose`
/// forces debug. Output goes to stderr so JSON on stdout stays clean.
pub fn init(
    level: &str,
    verbose: bool,
    no_color: bool,
) -> Result<()>
{
    let level = if verbose
    {
        tracing::Level::DEBUG
    }
    else
    {
        level
            .parse()
            .with_context(|| format!("Invalid log level '{level}'"))?
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    // A subscriber may already be installed when embedded; keep the first one
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false),
        )
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn rejects_unknown_level()
    {
        assert!(init("chatty", false, true).is_err());
    }

    #[test]
    fn repeated_init_is_harmless()
    {
        init("warn", false, true).unwrap();
        init("info", true, true).unwrap();
    }
}
