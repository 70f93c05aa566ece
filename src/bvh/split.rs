//! Linear-time node splitting.
//!
//! A node is split whenever its child count reaches a positive multiple of the node size. Two
//! seed bounds are picked in a single greedy pass and every child goes to whichever seed it is
//! most similar to. Splits that would leave a side with at most one child are abandoned.

use tracing::debug;

use crate::bvh::index::Bvh;
use crate::bvh::metric::score;
use crate::bvh::node::{Child, Node, NodeId};
use crate::bvh::r#trait::{BoundTraits, Boundable};

impl<T, Tr> Bvh<T, Tr>
where
    T: Boundable<Tr::Bound>,
    Tr: BoundTraits,
{
    /// Split `start` if needed, then keep splitting upward while each committed split pushes
    /// the parent onto a multiple of the node size.
    pub(crate) fn split_node(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            let count = self.arena.get(current).children.len();
            if count == 0 || count % self.node_size != 0 {
                break;
            }

            if current == NodeId::ROOT {
                // splitting the root is a special case
                current = self.grow_root();
                continue;
            }

            let Some(parent) = self.arena.get(current).parent else {
                break;
            };

            let bounds: Option<Vec<Tr::Bound>> = self
                .arena
                .get(current)
                .children
                .iter()
                .map(|child| self.child_bound(child))
                .collect();
            let Some(bounds) = bounds else {
                break;
            };

            let (seed0, seed1) = self.split_seeds(&bounds);
            let to_new = self.partition(&bounds, &bounds[seed0], &bounds[seed1]);
            let moved = to_new.iter().filter(|m| **m).count();
            let kept = to_new.len() - moved;

            // if a minimally useful split occurred, commit; otherwise leave the node untouched
            if moved <= 1 || kept <= 1 {
                debug!(node = current.index(), moved, kept, "abandoned degenerate split");
                break;
            }

            let new_id = self.commit_split(current, parent, &to_new);
            debug!(
                node = current.index(),
                new_node = new_id.index(),
                parent = parent.index(),
                moved,
                kept,
                "split node"
            );

            current = parent;
        }
    }

    /// Move all children of the root into a new node, which becomes the root's only child.
    ///
    /// Returns the new node, which now needs splitting in place of the root.
    fn grow_root(&mut self) -> NodeId {
        let root = self.arena.get_mut(NodeId::ROOT);
        let children = std::mem::take(&mut root.children);
        let bound = root.bound.clone();

        let new_id = self.alloc_node(Node {
            bound,
            children,
            parent: Some(NodeId::ROOT),
        });
        self.fix_parent_links(new_id);
        self.arena
            .get_mut(NodeId::ROOT)
            .children
            .push(Child::Node(new_id));
        debug!(new_node = new_id.index(), "grew tree by one level");
        new_id
    }

    /// Pick the indices of two seed bounds that are far apart.
    ///
    /// Starts with the first two children and replaces a seed whenever a later child scores
    /// higher against the other seed than the best pair so far. A single pass, not all pairs.
    fn split_seeds(&self, bounds: &[Tr::Bound]) -> (usize, usize) {
        let (mut seed0, mut seed1) = (0, 1);
        let mut chosen = score(&self.traits, &bounds[0], &bounds[1]);

        for (index, bound) in bounds.iter().enumerate().skip(2) {
            let metric0 = score(&self.traits, bound, &bounds[seed1]);
            let metric1 = score(&self.traits, bound, &bounds[seed0]);

            if metric0 > metric1 && metric0 > chosen {
                chosen = metric0;
                seed0 = index;
            }

            if metric1 > metric0 && metric1 > chosen {
                chosen = metric1;
                seed1 = index;
            }
        }
        (seed0, seed1)
    }

    /// For every bound, whether it is strictly closer to `seed0` than to `seed1`.
    ///
    /// Children marked `true` move to the new node; ties stay in the original node.
    fn partition(&self, bounds: &[Tr::Bound], seed0: &Tr::Bound, seed1: &Tr::Bound) -> Vec<bool> {
        bounds
            .iter()
            .map(|bound| score(&self.traits, bound, seed0) < score(&self.traits, bound, seed1))
            .collect()
    }

    /// Move the children marked in `to_new` out of `node` into a new sibling under `parent`.
    fn commit_split(&mut self, node: NodeId, parent: NodeId, to_new: &[bool]) -> NodeId {
        let children = std::mem::take(&mut self.arena.get_mut(node).children);
        let mut moved = Vec::with_capacity(children.len());
        let mut kept = Vec::with_capacity(children.len());
        for (child, goes) in children.into_iter().zip(to_new) {
            if *goes {
                moved.push(child);
            } else {
                kept.push(child);
            }
        }
        self.arena.get_mut(node).children = kept;

        let new_id = self.alloc_node(Node {
            bound: None,
            children: moved,
            parent: Some(parent),
        });
        self.fix_parent_links(new_id);
        self.arena
            .get_mut(parent)
            .children
            .push(Child::Node(new_id));

        self.recalculate_bound(new_id);
        self.recalculate_bound(node);
        new_id
    }
}
