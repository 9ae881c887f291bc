//! Tracing subscriber setup shared by the binaries

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "heart_disease_predictor";

/// Install the global subscriber.
///
/// This crate and `extra_targets` (e.g. the binary's own crate name) log at
/// `config.level` unless `RUST_LOG` names them; `RUST_LOG` directives always
/// win for the targets they mention.
pub fn init(config: &LoggingConfig, extra_targets: &[&str]) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, extra_targets, rust_log.as_deref())?;

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn build_filter(
    config: &LoggingConfig,
    extra_targets: &[&str],
    rust_log: Option<&str>,
) -> Result<EnvFilter> {
    let rust_log = rust_log.unwrap_or_default();
    let mut filter = EnvFilter::new(rust_log);

    let defaults = std::iter::once((CRATE_TARGET, config.level.as_str()))
        .chain(std::iter::once(("actix_web", "info")))
        .chain(extra_targets.iter().map(|target| (*target, config.level.as_str())));

    for (target, level) in defaults {
        if !names_target(rust_log, target) {
            filter = filter.add_directive(format!("{}={}", target, level).parse()?);
        }
    }

    Ok(filter)
}

/// Whether a `RUST_LOG` string carries a directive for `target` or one of
/// its modules
fn names_target(rust_log: &str, target: &str) -> bool {
    rust_log.split(',').any(|directive| {
        let directive_target = directive
            .trim()
            .split(|c| c == '=' || c == '[')
            .next()
            .unwrap_or_default();
        directive_target == target || directive_target.starts_with(&format!("{}::", target))
    })
}
