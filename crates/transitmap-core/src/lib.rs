#![forbid(unsafe_code)]
//! transitmap-core library.
//!
//! Turns the trips of each route into ordered service maps, one per
//! configured group, and indexes which routes serve each stop.
//!
//! # Conventions
//!
//! - **Errors**: configuration problems are [`error::ConfigError`] and fail
//!   fast. A cyclic stop graph is not an error at this level: the builder
//!   logs it and stores an empty map.
//! - **Logging**: `tracing` macros; per-route work runs inside
//!   `#[instrument]` spans carrying route and group.
//! - **I/O**: none, apart from [`config::load_config`].

pub mod builder;
pub mod config;
pub mod error;
pub mod matcher;
pub mod stations;
pub mod trip;
pub mod views;

pub use builder::{
    RouteGroupKey, RouteTrips, ServiceMap, ServiceMapBuilder, ServiceMapStop, ServiceMapUpdate,
    order_paths, paths_hash,
};
pub use config::{GroupConfig, ServiceMapsConfig, load_config};
pub use error::{ConfigError, ErrorCode};
pub use matcher::{Condition, TripMatcher, filter_trips_by_frequency};
pub use stations::{StopHierarchy, StopTree, collapse_to_stations};
pub use trip::{ServiceDays, Trip, TripSource};
pub use views::{GroupRoutes, StopRoutesIndex};
