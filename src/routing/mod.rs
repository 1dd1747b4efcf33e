//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     route definitions
//!     → pattern.rs (compile templates into segments)
//!     → table.rs (validate duplicates + cluster refs, freeze order)
//!     → immutable RouteTable
//!
//! Incoming Request (method, path):
//!     → table.rs (first-match scan in longest-static-prefix order)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (positional segment matching only)
//! - Deterministic: same input always matches the same rule
//! - Ambiguity resolved by longest static prefix, then registration order

pub mod pattern;
pub mod table;

pub use pattern::{PathPattern, PatternError, Segment};
pub use table::{RouteMatch, RouteRule, RouteTable, RouteTableError};
