//! Error types for driftlab.

use crate::spawn::FanKind;
use thiserror::Error;

/// Errors raised by simulation operations and the render loop
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{fan} fan needs at least 2 particles, got {count}")]
    InvalidFanCount { fan: FanKind, count: usize },
    #[error("{fan} fan of {count} particles exceeds the limit of {max}")]
    FanTooLarge {
        fan: FanKind,
        count: usize,
        max: usize,
    },
    #[error("failed to start render loop: {0}")]
    LoopSpawn(#[from] std::io::Error),
    #[error("render loop panicked: {0}")]
    LoopPanicked(String),
}

/// Errors from parsing a textual spawn command such as `arc 3 10 10 0 3.14 5`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnParseError {
    #[error("empty spawn command")]
    Empty,
    #[error("unknown spawn kind '{0}' (expected single, line, arc or speeds)")]
    UnknownKind(String),
    #[error("'{kind}' takes {expected} arguments, got {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("argument '{0}' is not finite")]
    NotFinite(String),
    #[error("invalid particle count '{0}'")]
    InvalidCount(String),
    #[error("particle count {count} exceeds the limit of {max}")]
    CountTooLarge { count: usize, max: usize },
}
