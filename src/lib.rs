#![doc = include_str!("../README.md")]

pub mod aabb;
pub mod bvh;
mod error;
mod r#type;

pub use error::{BvhError, Result};
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
