//! Observability
//!
//! Structured JSON logging of typed events.
//!
//! ```ignore
//! use itemsvc::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ItemCreated, &[("item_id", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{format_line, Logger, Severity};

/// Log an event with no fields
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event; severity follows from the event kind
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else if event.is_error() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::Serving);
        log_event_with_fields(Event::ItemDeleted, &[("item_id", "3")]);
    }
}
