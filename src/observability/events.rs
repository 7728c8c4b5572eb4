//! Lifecycle and data events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` field of a log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    StoreLoaded,
    StoreInitialized,
    Serving,
    ShutdownComplete,

    // Storage
    StoreFlushFailed,
    StoreCorruption,

    // Items
    ItemCreated,
    ItemUpdated,
    ItemDeleted,

    // Queries
    PageRequested,
    DefaultOrderApplied,

    // HTTP
    RequestRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreLoaded => "STORE_LOADED",
            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::Serving => "ITEMSVC_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::StoreFlushFailed => "STORE_FLUSH_FAILED",
            Event::StoreCorruption => "STORE_CORRUPTION",
            Event::ItemCreated => "ITEM_CREATED",
            Event::ItemUpdated => "ITEM_UPDATED",
            Event::ItemDeleted => "ITEM_DELETED",
            Event::PageRequested => "PAGE_REQUESTED",
            Event::DefaultOrderApplied => "DEFAULT_ORDER_APPLIED",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorruption)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::StoreFlushFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::DefaultOrderApplied.to_string(), "DEFAULT_ORDER_APPLIED");
        assert_eq!(Event::Serving.as_str(), "ITEMSVC_SERVING");
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::StoreCorruption.is_fatal());
        assert!(!Event::ItemCreated.is_fatal());
    }
}
