use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
///
/// Errors raised by search or crawl callbacks are never converted into this type; they are
/// returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BvhError {
    #[error("Node size must be between 2 and 65535, got {0}.")]
    InvalidNodeSize(usize),

    #[error("Node {node} does not contain the bound of one of its children.")]
    BoundNotContained { node: usize },

    #[error("Node {node} has a parent link that disagrees with its owner.")]
    ParentMismatch { node: usize },

    #[error("Node {node} has a bound that is not the union of its children.")]
    StaleBound { node: usize },

    #[error("Non-root node {node} has no children.")]
    EmptyNode { node: usize },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, BvhError>;
