//! Venue adapter contract.
//!
//! Every adapter translates one exchange's public market-data API into
//! canonical [`MarketRecord`]s. Adapters never panic and never leak raw
//! transport or parse failures: every failure mode is a typed
//! [`SourceError`], which the aggregator converts into an empty record
//! list plus a failure status. From the orchestrator's point of view an
//! adapter is therefore total.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ExchangeId, MarketRecord};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The venue's API could not be reached or answered with an error status.
    Unavailable,
    /// The venue answered but the payload could not be parsed into records.
    MalformedPayload,
    /// The fetch did not complete within the per-source deadline.
    Timeout,
    Internal,
}

/// Structured adapter error surfaced in per-venue status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedPayload,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::MalformedPayload => "source.malformed_payload",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; the aggregator shares them
/// across spawned fetch tasks.
///
/// # Contract
///
/// - One network round trip per fetch (or a small fixed number for venues
///   that split instrument metadata and rates across endpoints).
/// - Instruments that are not actively tradable (delisted, inactive) are
///   filtered out before records are emitted.
/// - Raw price/rate/interval values go through the shared normalizer;
///   adapters never compute `apr` themselves.
pub trait FundingSource: Send + Sync {
    /// Unique venue identifier.
    fn id(&self) -> ExchangeId;

    /// Fetch and normalize every tradable instrument on this venue.
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>>;
}
