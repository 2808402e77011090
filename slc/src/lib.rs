//! SLC - Speed limit resolution for a driving assistance control loop
//!
//! This library decides which of several independently updated speed limit
//! sources (dashboard sign recognition, offline map data, navigation) governs
//! the vehicle's target speed, adds a safety offset banded by limit
//! magnitude, and applies a fallback policy when no source reports a usable
//! limit.
//!
//! # Architecture
//!
//! ```text
//! live store ──► SourceReadings ─┐
//!                                ├──► SpeedLimitResolver ──► Resolution
//! param store ──► SlcConfig ─────┘          │
//!        ▲                                  │
//!        └──────── PreviousSpeedLimit ◄─────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use slc::params::{keys, MemoryParamStore, ParamStore};
//! use slc::resolver::SpeedLimitResolver;
//!
//! let params = Arc::new(MemoryParamStore::new());
//! let live = Arc::new(MemoryParamStore::new());
//! params.put(keys::PRIORITY_KEYS[0], "Dashboard").unwrap();
//! live.put_json_float(keys::CAR_SPEED_LIMIT, 20.0).unwrap();
//!
//! let mut resolver = SpeedLimitResolver::new(params, live);
//! resolver.update_source_readings();
//! assert_eq!(resolver.evaluate().speed_limit, 20.0);
//! ```

pub mod config;
pub mod logging;
pub mod offset;
pub mod params;
pub mod resolver;
pub mod source;
pub mod units;

pub use config::{FallbackMode, PriorityEntry, SlcConfig};
pub use offset::OffsetBands;
pub use params::{FileParamStore, MemoryParamStore, ParamStore, ParamsError};
pub use resolver::{LimitOrigin, Resolution, SpeedLimitResolver};
pub use source::{LimitSource, SourceReadings};
pub use units::UnitSystem;
