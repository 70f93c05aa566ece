//! Structural checks for the hierarchy.

use crate::bvh::index::Bvh;
use crate::bvh::node::{Child, NodeId};
use crate::bvh::r#trait::{BoundTraits, Boundable};
use crate::error::{BvhError, Result};

impl<T, Tr> Bvh<T, Tr>
where
    T: Boundable<Tr::Bound>,
    Tr: BoundTraits,
{
    /// Check the structural invariants of the hierarchy.
    ///
    /// - every node's bound is exactly the union of its children's bounds,
    /// - every child bound is contained in its node's bound,
    /// - every sub-node points back at the node owning it,
    /// - no node other than the root is empty,
    /// - the element count matches [`Bvh::len`].
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        let mut elements = 0;
        for (id, node) in self.arena.iter() {
            if id != NodeId::ROOT && node.children.is_empty() {
                return Err(BvhError::EmptyNode { node: id.index() });
            }

            if let Some(parent) = node.parent {
                let owned = self
                    .arena
                    .get(parent)
                    .children
                    .iter()
                    .any(|child| matches!(child, Child::Node(sub) if *sub == id));
                if !owned {
                    return Err(BvhError::ParentMismatch { node: id.index() });
                }
            } else if id != NodeId::ROOT {
                return Err(BvhError::ParentMismatch { node: id.index() });
            }

            let mut union: Option<Tr::Bound> = None;
            for child in &node.children {
                match child {
                    Child::Element(_) => elements += 1,
                    Child::Node(sub) => {
                        if self.arena.get(*sub).parent != Some(id) {
                            return Err(BvhError::ParentMismatch { node: sub.index() });
                        }
                    }
                }

                let Some(child_bound) = self.child_bound(child) else {
                    return Err(BvhError::StaleBound { node: id.index() });
                };
                let contained = node
                    .bound
                    .as_ref()
                    .is_some_and(|bound| self.contains(bound, &child_bound));
                if !contained {
                    return Err(BvhError::BoundNotContained { node: id.index() });
                }
                union = Some(match union {
                    Some(acc) => self.traits.union(&acc, &child_bound),
                    None => child_bound,
                });
            }

            let exact = match (&node.bound, &union) {
                (Some(bound), Some(union)) => self.same_extent(bound, union),
                (None, None) => true,
                // an emptied root keeps no bound
                _ => false,
            };
            if !exact {
                return Err(BvhError::StaleBound { node: id.index() });
            }
        }

        if elements != self.len() {
            return Err(BvhError::General(format!(
                "Found {} elements when expected {}.",
                elements,
                self.len()
            )));
        }
        Ok(())
    }

    /// Whether `inner` lies within `outer` on every axis.
    fn contains(&self, outer: &Tr::Bound, inner: &Tr::Bound) -> bool {
        (0..self.traits.dimensions(outer)).all(|dim| {
            let (outer_lo, outer_hi) = self.traits.interval_range(outer, dim);
            let (inner_lo, inner_hi) = self.traits.interval_range(inner, dim);
            outer_lo <= inner_lo && inner_hi <= outer_hi
        })
    }

    /// Whether two bounds have identical intervals on every axis.
    fn same_extent(&self, a: &Tr::Bound, b: &Tr::Bound) -> bool {
        (0..self.traits.dimensions(a))
            .all(|dim| self.traits.interval_range(a, dim) == self.traits.interval_range(b, dim))
    }
}
