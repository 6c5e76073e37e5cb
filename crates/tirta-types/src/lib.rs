//! Platform-agnostic types for tirta water-quality monitoring.
//!
//! This crate defines the data model shared by every other tirta crate:
//! the untrusted [`RawReading`] shape the backend API returns, the
//! normalized [`HistoryItem`] owned by the history store, and the
//! [`SensorKind`] / [`Severity`] enums used for classification.
//!
//! The backend's payloads are unreliable: numeric fields arrive as numbers,
//! numeric strings, garbage strings, or not at all. All coercion to
//! well-typed floats happens here, at the input boundary, so downstream
//! code never has to re-check.

pub mod types;

pub use types::{HistoryItem, RawReading, SensorKind, Severity, coerce_f64};
