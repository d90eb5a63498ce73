//! Index generation pipeline.
//!
//! ```text
//! scan ──► store (ledger, previous page) ──► reconcile ──► group ──► render
//! ```
//!
//! Every stage except `scan` and `store` is pure; the filesystem is only
//! touched at the edges.

pub mod classify;
pub mod entry;
pub mod group;
pub mod reconcile;
pub mod render;
pub mod scan;
pub mod scrape;
pub mod store;
