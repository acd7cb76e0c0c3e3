//! Asynchronous implementations of core components
//!
//! This module provides the concurrent counterpart of the sequential
//! `TokenRouter`, using DashMap for per-token locking.
//!
//! # Thread Safety
//!
//! - Transfers of different tokens proceed in parallel
//! - Transfers of the same token are applied one at a time, in order
//! - No global locks; one lock per token shard

pub mod shard_router;

pub use shard_router::{ProcessingResult, ShardRouter};
