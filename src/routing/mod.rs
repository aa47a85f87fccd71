//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, query, headers)
//!     → resolver.rs (ordered candidate keys: query param, Basic user, cookie)
//!     → cache.rs (per candidate: forced override, TTL cache, store lookup,
//!                 default fallback)
//!     → Return: resolved Route or none
//! ```
//!
//! # Design Decisions
//! - Candidate order is fixed; first key that resolves wins
//! - A hostname-scoped forced override pre-empts every explicit key
//! - Cache entries live 4 hours and are refreshed lazily, never evicted
//! - Default resolution is a bounded iteration over [host-scoped key,
//!   global sentinel], not recursion

pub mod cache;
pub mod resolver;

pub use cache::{Route, RouteCache};
pub use resolver::KeyResolver;
