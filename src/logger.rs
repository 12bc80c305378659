use std::fmt;

use tracing_core::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, format::Writer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::log_level::LogLevel;

const LOG_PREFIX: &str = "FILTER_MATCHER";

/// Writes events as `FILTER_MATCHER | LEVEL | message`, prefixed with the
/// names of the enclosing spans.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = event.metadata().level();
        write!(writer, "{LOG_PREFIX} | {level} | ")?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}: ", span.name())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber at `level`.
///
/// Fails when a global subscriber is already set.
pub fn init(level: LogLevel) -> Result<(), TryInitError> {
    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::new(level.as_ref().to_lowercase()))
        .with_level(true)
        .with_target(false)
        .event_format(Formatter)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::{debug, error, error_span};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: LogLevel, f: impl FnOnce()) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(EnvFilter::new(level.as_ref().to_lowercase()))
            .with_writer(move || writer.clone())
            .event_format(Formatter)
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_format_event() {
        let output = capture(LogLevel::Debug, || {
            debug!("compiled {} criteria", 3);
        });
        assert_eq!(output, "FILTER_MATCHER | DEBUG | compiled 3 criteria\n");
    }

    #[test]
    fn test_format_event_with_span() {
        let output = capture(LogLevel::Error, || {
            let span = error_span!("filter_stage");
            let _guard = span.enter();
            error!("bad pattern");
        });
        assert_eq!(output, "FILTER_MATCHER | ERROR | filter_stage: bad pattern\n");
    }

    #[test]
    fn test_level_filtering() {
        let output = capture(LogLevel::Warn, || {
            debug!("hidden");
            error!("shown");
        });
        assert_eq!(output, "FILTER_MATCHER | ERROR | shown\n");
    }
}
