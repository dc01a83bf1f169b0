use std::fmt::Write;

use tracing_subscriber::prelude::*;

const TRACE_ENV: &str = "DIRCACHE_TRACE";

/// Installs a stderr subscriber when `DIRCACHE_TRACE` names a level.
/// Does nothing if a global subscriber is already set.
pub fn enable_by_env() {
    let is_enabled = std::env::var(TRACE_ENV).map_or(false, |var| {
        matches!(
            var.to_ascii_uppercase().as_str(),
            "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR"
        )
    });
    if !is_enabled {
        return;
    }
    let formatter = Formatter::default();
    let _ = tracing_subscriber::Registry::default()
        .with(formatter)
        .with(tracing_subscriber::EnvFilter::from_env(TRACE_ENV))
        .try_init();
}

#[derive(Default)]
struct Formatter {}

impl<S> tracing_subscriber::Layer<S> for Formatter
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let level = event.metadata().level();
        let mut line = match *level {
            tracing::Level::ERROR | tracing::Level::WARN => color::red(level),
            _ => color::cyan(level),
        };
        event.record(&mut Data(&mut line));
        eprintln!("{line}");
    }
}

struct Data<'a>(&'a mut String);

impl tracing::field::Visit for Data<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let _ = if field.name() == "message" {
            write!(self.0, " {value:?}")
        } else {
            write!(self.0, " {}={value:?}", color::bold(&field.name()))
        };
    }
}

mod color {
    const BOLD: &str = "\u{001b}[1m";
    const RED: &str = "\u{001b}[31m";
    const CYAN: &str = "\u{001b}[36m";
    const RESET: &str = "\u{001b}[0m";

    pub fn bold<T: core::fmt::Display>(s: &T) -> String {
        format!("{BOLD}{s}{RESET}")
    }

    pub fn red<T: core::fmt::Display>(s: &T) -> String {
        format!("{RED}{s}{RESET}")
    }

    pub fn cyan<T: core::fmt::Display>(s: &T) -> String {
        format!("{CYAN}{s}{RESET}")
    }
}
