use serde_json::Value;
use tracing::info;

use crate::acknowledgement::Acknowledgement;
use crate::errors::Result;
use crate::telemetry::Verbosity;

/// Entrypoint logic shared by every runner.
#[derive(Debug, Clone)]
pub struct Handler {
    verbosity: Verbosity,
}

impl Handler {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Resets log verbosity to INFO, then delegates to [`handle_event`].
    ///
    /// The only failure is the verbosity reset; it is returned as is so the
    /// invoking runtime reports it.
    pub fn handle(&self, event: &Value) -> Result<Acknowledgement> {
        self.verbosity.reset_to_info()?;
        Ok(handle_event(event))
    }
}

pub fn handle_event(event: &Value) -> Acknowledgement {
    info!("handling event {event}");
    Acknowledgement::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::errors::{HandlerError, TelemetryError};
    use crate::telemetry::subscriber;
    use crate::telemetry::tests::CapturedLogs;
    use serde_json::json;
    use std::io;

    #[test]
    fn test_scenarios_return_success() {
        let handler = Handler::new(Verbosity::detached());

        for event in [json!({"id": 1}), json!({}), Value::Null] {
            let ack = handler.handle(&event).unwrap();
            assert_eq!(serde_json::to_value(ack).unwrap(), json!({"result": "success"}));
        }
    }

    #[test]
    fn test_arbitrary_shapes_return_success() {
        let handler = Handler::new(Verbosity::detached());
        let events = [
            json!("plain string"),
            json!(42),
            json!(true),
            json!([1, "two", null]),
            json!({"nested": {"deep": [{"k": "v"}]}, "unicode": "héllo"}),
        ];

        for event in events {
            assert_eq!(handler.handle(&event).unwrap(), Acknowledgement::success());
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let handler = Handler::new(Verbosity::detached());
        let event = json!({"id": 1});

        let first = handler.handle(&event).unwrap();
        let second = handler.handle(&event).unwrap();

        assert_eq!(first, second);
        assert_eq!(event, json!({"id": 1}));
    }

    #[test]
    fn test_logs_event_at_info_despite_warn_filter() {
        let logs = CapturedLogs::default();
        let (subscriber, verbosity) =
            subscriber("warn", &LogConfig::default(), logs.clone()).unwrap();
        let handler = Handler::new(verbosity);

        tracing::subscriber::with_default(subscriber, || {
            handler.handle(&json!({"id": 1})).unwrap();
        });

        let output = logs.contents();
        assert!(output.contains(" INFO "));
        assert!(output.contains(r#"handling event {"id":1}"#));
        assert_eq!(output.matches("handling event").count(), 1);
    }

    #[test]
    fn test_null_event_is_rendered() {
        let logs = CapturedLogs::default();
        let (subscriber, _verbosity) =
            subscriber("info", &LogConfig::default(), logs.clone()).unwrap();

        let ack = tracing::subscriber::with_default(subscriber, || handle_event(&Value::Null));

        assert_eq!(ack, Acknowledgement::success());
        assert!(logs.contents().contains("handling event null"));
    }

    #[test]
    fn test_reset_keeps_handler_target_level() {
        let logs = CapturedLogs::default();
        let (subscriber, verbosity) = subscriber(
            "info,service_c_core::handler=error",
            &LogConfig::default(),
            logs.clone(),
        )
        .unwrap();
        let handler = Handler::new(verbosity);

        let ack = tracing::subscriber::with_default(subscriber, || {
            handler.handle(&json!({"after": 1})).unwrap()
        });

        assert_eq!(ack, Acknowledgement::success());
        assert!(!logs.contents().contains("handling event"));
    }

    #[test]
    fn test_reset_failure_propagates() {
        let (subscriber, verbosity) = subscriber("info", &LogConfig::default(), io::sink).unwrap();
        drop(subscriber);
        let handler = Handler::new(verbosity);

        let result = handler.handle(&json!({"id": 1}));

        assert!(matches!(
            result,
            Err(HandlerError::Telemetry(TelemetryError::Reload { .. }))
        ));
    }
}
