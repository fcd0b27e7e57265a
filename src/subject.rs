//! Caller identity passed through store operations.
//!
//! The store does not interpret subjects; authorization happens in the layer
//! that owns the user database. Every operation still takes one so that
//! store implementations which do filter by owner share the same signature.

use std::fmt;

/// An authenticated (or deliberately anonymous) caller.
pub trait Subject: fmt::Debug + Send + Sync {}

/// Subject used by internal callers such as the scheduler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Anonymous;

impl Subject for Anonymous {}
