//! A dynamic bounding volume hierarchy, loosely modelled after X-trees.
//!
//! - arbitrary dimensions, through [`BoundTraits`]
//! - arbitrary queries (nearest neighbor, ray casting, collision detection) through [`Searcher`]
//! - fully dynamic: insertions, erasures and searches can be interleaved

mod index;
pub mod metric;
mod node;
mod split;
pub mod r#trait;
mod traversal;
mod util;

pub use index::{Bvh, DEFAULT_BVH_NODE_SIZE};
pub use metric::{furthest_distance_metric, Similarity};
pub use r#trait::{BoundTraits, Boundable, Crawler, Searcher};
