//! Structured diagnostics for graceful-degradation paths.
//!
//! The engine never fails a price computation because of bad catalog data.
//! Instead, each fallback produces a [`Diagnostic`] delivered to a
//! [`DiagnosticSink`]. Production code forwards them to `tracing`; tests
//! record them and assert on what degraded.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

use crate::catalog::CatalogKind;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected fallback (e.g., a product simply has no shapes).
    Debug,
    /// Data was malformed and replaced.
    Warn,
    /// A user-visible operation did not fully succeed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A fallback event observed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A serialized option catalog could not be parsed.
    CatalogParseFailed {
        product_id: String,
        catalog: CatalogKind,
        error: String,
    },
    /// No usable option source existed; the built-in default list was used.
    CatalogDefaulted {
        product_id: String,
        catalog: CatalogKind,
    },
    /// Neither the quantity field nor the label yielded a piece count.
    PieceCountDefaulted {
        option_id: String,
        label: String,
        pieces: u32,
    },
    /// A price field was not a usable number and was treated as zero.
    InvalidPrice { field: String, raw: String },
    /// A selection referenced an option id missing from the catalog.
    UnknownOption {
        catalog: CatalogKind,
        requested: String,
        substituted: String,
    },
    /// A mixed selection was requested for a product that does not offer it.
    MixedUnavailable { product_id: String },
    /// A fetch result arrived for a product that is no longer current.
    StaleProductDiscarded { expected: String, received: String },
    /// The persisted cart could not be read; an empty cart was used.
    CartHydrateFailed { key: String, error: String },
    /// The cart could not be written after a mutation.
    CartPersistFailed { key: String, error: String },
}

impl Diagnostic {
    /// Short machine-readable name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CatalogParseFailed { .. } => "catalog_parse_failed",
            Self::CatalogDefaulted { .. } => "catalog_defaulted",
            Self::PieceCountDefaulted { .. } => "piece_count_defaulted",
            Self::InvalidPrice { .. } => "invalid_price",
            Self::UnknownOption { .. } => "unknown_option",
            Self::MixedUnavailable { .. } => "mixed_unavailable",
            Self::StaleProductDiscarded { .. } => "stale_product_discarded",
            Self::CartHydrateFailed { .. } => "cart_hydrate_failed",
            Self::CartPersistFailed { .. } => "cart_persist_failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::CatalogDefaulted { .. }
            | Self::PieceCountDefaulted { .. }
            | Self::StaleProductDiscarded { .. } => Severity::Debug,
            Self::CartPersistFailed { .. } => Severity::Error,
            _ => Severity::Warn,
        }
    }

    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.kind().to_string())
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let payload = diagnostic.to_json();
        match diagnostic.severity() {
            Severity::Debug => {
                tracing::debug!(event = diagnostic.kind(), %payload, "pricing fallback")
            }
            Severity::Warn => {
                tracing::warn!(event = diagnostic.kind(), %payload, "pricing fallback")
            }
            Severity::Error => {
                tracing::error!(event = diagnostic.kind(), %payload, "cart operation degraded")
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Names of recorded events, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(Diagnostic::kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(diagnostic);
        }
    }
}
