use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Crates whose logs a bare level like `debug` applies to.
const CRATES: [&str; 2] = ["condwait", "condwait_core"];

/// Installs the global subscriber. Later calls are no-ops, so every test may call this.
///
/// A bare level like `debug` is scoped to the waiter crates, anything else is parsed as an
/// `EnvFilter` directive.
pub fn setup_tracing(filter: Option<String>) {
    let default = "condwait=INFO"
        .parse()
        .expect("hard-coded default directive should be valid");

    let filter = EnvFilter::builder()
        .with_default_directive(default)
        .parse_lossy(filter.map(directives).unwrap_or_default());

    tracing_subscriber::registry()
        .with(Layer::default())
        .with(filter)
        .try_init()
        .ok();
}

fn directives(filter: String) -> String {
    match Level::from_str(&filter) {
        Ok(level) => CRATES
            .iter()
            .map(|name| format!("{name}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Err(_) => filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_waiter_crates() {
        assert_eq!(
            directives("debug".into()),
            "condwait=DEBUG,condwait_core=DEBUG"
        );
        assert_eq!(directives("WARN".into()), "condwait=WARN,condwait_core=WARN");
    }

    #[test]
    fn other_filters_pass_through() {
        assert_eq!(directives("tokio=trace".into()), "tokio=trace");
        assert_eq!(
            directives("condwait::waiter=trace,info".into()),
            "condwait::waiter=trace,info"
        );
    }
}
