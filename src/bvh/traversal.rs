//! Utilities to traverse the hierarchy.

use tinyvec::TinyVec;

use crate::bvh::index::Bvh;
use crate::bvh::node::{Child, NodeId};
use crate::bvh::r#trait::{BoundTraits, Boundable, Crawler, Searcher};

/// Traversal stack of `(node, next child position)` frames.
type Stack = TinyVec<[(NodeId, usize); 32]>;

impl<T, Tr> Bvh<T, Tr>
where
    T: Boundable<Tr::Bound>,
    Tr: BoundTraits,
{
    /// Visit every element whose containing nodes all satisfy [`Searcher::intersects`].
    ///
    /// Use this when all elements touching a region are wanted and the region does not change
    /// during the search, as in collision detection. When the region of interest shrinks as
    /// better matches are found, prefer [`Bvh::find_nearest`].
    ///
    /// The first error returned by the searcher aborts the search and is returned as-is.
    pub fn find_all<S>(&self, searcher: &mut S) -> Result<(), S::Error>
    where
        S: Searcher<Tr::Bound, T>,
    {
        if self.arena.get(NodeId::ROOT).children.is_empty() {
            return Ok(());
        }
        self.find_down(searcher, NodeId::ROOT, None)
    }

    /// Search outward from the leaf closest to `here`.
    ///
    /// The leaf is searched first, then each ancestor up to the root, skipping the subtree
    /// already visited. Every element is still evaluated at most once, but elements near `here`
    /// are evaluated early, so a searcher that tightens [`Searcher::intersects`] as it goes (for
    /// example nearest neighbor search) prunes more of the tree.
    ///
    /// The first error returned by the searcher aborts the search and is returned as-is.
    pub fn find_nearest<S>(&self, searcher: &mut S, here: &Tr::Bound) -> Result<(), S::Error>
    where
        S: Searcher<Tr::Bound, T>,
    {
        // start at the leaf of the hierarchy and move up from the bottom
        let mut node = Some(self.choose_leaf(here));
        let mut skip = None;
        while let Some(id) = node {
            self.find_down(searcher, id, skip)?;
            skip = Some(id);
            node = self.arena.get(id).parent;
        }
        Ok(())
    }

    /// Iterate over the contents of the hierarchy.
    ///
    /// Sub-nodes are crawled before the elements held directly by a node. Only nodes holding at
    /// least one element produce a `begin_bound` / `end_bound` pair.
    ///
    /// The first error returned by the crawler aborts the crawl and is returned as-is.
    pub fn for_each<C>(&self, crawler: &mut C) -> Result<(), C::Error>
    where
        C: Crawler<Tr::Bound, T>,
    {
        let mut stack = Stack::new();
        stack.push((NodeId::ROOT, 0));

        while let Some(frame) = stack.last_mut() {
            let (id, cursor) = *frame;
            let node = self.arena.get(id);

            if let Some(child) = node.children.get(cursor) {
                frame.1 += 1;
                if let Child::Node(sub) = child {
                    stack.push((*sub, 0));
                }
                continue;
            }

            stack.pop();
            if !node.holds_elements() {
                continue;
            }
            if let Some(bound) = &node.bound {
                crawler.begin_bound(bound)?;
                for child in &node.children {
                    if let Child::Element(element) = child {
                        crawler.evaluate(element)?;
                    }
                }
                crawler.end_bound(bound)?;
            }
        }
        Ok(())
    }

    /// Depth-first search of the subtree at `start`, never entering `skip`.
    fn find_down<S>(
        &self,
        searcher: &mut S,
        start: NodeId,
        skip: Option<NodeId>,
    ) -> Result<(), S::Error>
    where
        S: Searcher<Tr::Bound, T>,
    {
        let mut stack = Stack::new();
        if self.is_relevant(searcher, start) {
            stack.push((start, 0));
        }

        while let Some(frame) = stack.last_mut() {
            let (id, cursor) = *frame;
            let Some(child) = self.arena.get(id).children.get(cursor) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match child {
                Child::Node(sub) => {
                    if Some(*sub) != skip && self.is_relevant(searcher, *sub) {
                        stack.push((*sub, 0));
                    }
                }
                Child::Element(element) => searcher.evaluate(element)?,
            }
        }
        Ok(())
    }

    #[inline]
    fn is_relevant<S>(&self, searcher: &mut S, id: NodeId) -> bool
    where
        S: Searcher<Tr::Bound, T>,
    {
        match &self.arena.get(id).bound {
            Some(bound) => searcher.intersects(bound),
            None => false,
        }
    }
}
