use std::fmt;

use tracing::{debug, trace};

use crate::bvh::metric::{furthest_distance_metric, score};
use crate::bvh::node::{Arena, Child, Node, NodeId};
use crate::bvh::r#trait::{BoundTraits, Boundable};
use crate::error::{BvhError, Result};

/// The default node size used by [`Bvh::new`]
pub const DEFAULT_BVH_NODE_SIZE: usize = 16;

/// A dynamic bounding volume hierarchy.
///
/// Insertions, erasures and searches may be freely interleaved. The bound type and all of its
/// geometry come from `Tr`; elements only have to report their bound.
///
/// ```
/// use dyn_bvh::aabb::{AabbTraits, Point};
/// use dyn_bvh::bvh::Bvh;
///
/// let mut bvh = Bvh::new(AabbTraits::<f64, 2>::new());
/// bvh.insert(Point([0., 0.]));
/// bvh.insert(Point([2., 1.]));
/// assert_eq!(bvh.len(), 2);
///
/// assert!(bvh.erase(&Point([0., 0.])));
/// assert!(!bvh.erase(&Point([0., 0.])));
/// ```
pub struct Bvh<T, Tr: BoundTraits> {
    pub(crate) arena: Arena<Tr::Bound, T>,
    pub(crate) traits: Tr,
    pub(crate) node_size: usize,
    len: usize,
}

impl<T, Tr> Bvh<T, Tr>
where
    T: Boundable<Tr::Bound>,
    Tr: BoundTraits,
{
    /// Create an empty hierarchy with the default node size.
    pub fn new(traits: Tr) -> Self {
        Self {
            arena: Arena::new(),
            traits,
            node_size: DEFAULT_BVH_NODE_SIZE,
            len: 0,
        }
    }

    /// Create an empty hierarchy with the provided node size.
    ///
    /// A node is split whenever its child count reaches a multiple of `node_size`.
    pub fn try_new_with_node_size(traits: Tr, node_size: usize) -> Result<Self> {
        if !(2..=65535).contains(&node_size) {
            return Err(BvhError::InvalidNodeSize(node_size));
        }
        Ok(Self {
            node_size,
            ..Self::new(traits)
        })
    }

    /// Access the geometry traits of this hierarchy.
    pub fn traits(&self) -> &Tr {
        &self.traits
    }

    /// The fan-out threshold that triggers splitting.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// The number of elements contained in this hierarchy.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bound of the entire hierarchy, or `None` when it is empty.
    pub fn bound(&self) -> Option<&Tr::Bound> {
        self.arena.get(NodeId::ROOT).bound.as_ref()
    }

    /// The number of nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.arena.len()
    }

    /// The number of node levels on the longest path from the root. An empty tree has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(NodeId::ROOT, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.arena.get(id).child_nodes().map(|sub| (sub, depth + 1)));
        }
        deepest
    }

    /// Remove every element, keeping the traits and node size.
    pub fn clear(&mut self) {
        self.arena = Arena::new();
        self.len = 0;
    }

    /// Iterate over all elements, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.arena.iter().flat_map(|(_, node)| {
            node.children.iter().filter_map(|child| match child {
                Child::Element(element) => Some(element),
                Child::Node(_) => None,
            })
        })
    }

    /// Insert an element.
    ///
    /// Usually `T` is a cheap handle (a reference, an `Rc`, or an id carrying its bound)
    /// rather than the object itself.
    pub fn insert(&mut self, element: T) {
        let elem_bound = element.bound();
        self.len += 1;

        let root = self.arena.get_mut(NodeId::ROOT);
        if root.children.is_empty() {
            // very first element goes straight into the root
            root.children.push(Child::Element(element));
            root.bound = Some(elem_bound);
            trace!(len = self.len, "inserted into empty root");
            return;
        }

        // find appropriate leaf and insert it there
        let chosen = self.choose_leaf(&elem_bound);
        let traits = &self.traits;
        let node = self.arena.get_mut(chosen);
        node.children.push(Child::Element(element));
        node.bound = Some(extend_bound(traits, node.bound.as_ref(), &elem_bound));

        // update ancestors' bounds
        let mut update = node.parent;
        while let Some(id) = update {
            let node = self.arena.get_mut(id);
            node.bound = Some(extend_bound(traits, node.bound.as_ref(), &elem_bound));
            update = node.parent;
        }
        trace!(leaf = chosen.index(), len = self.len, "inserted element");

        self.split_node(chosen);
    }

    /// Remove an element, looked up by equality.
    ///
    /// Returns `true` if the element was found and removed. Nodes left without children are
    /// removed from their parents, repeatedly, up to the first non-empty node or the root.
    pub fn erase(&mut self, element: &T) -> bool
    where
        T: PartialEq,
    {
        let elem_bound = element.bound();
        let (erased, mut site) = self.erase_child(NodeId::ROOT, element, &elem_bound);

        while let Some(id) = site {
            let node = self.arena.get(id);
            let (parent, empty) = (node.parent, node.children.is_empty());
            match parent {
                Some(parent) if empty => {
                    self.remove_empty_node(parent, id);
                    site = Some(parent);
                }
                _ => break,
            }
        }

        if erased {
            self.len -= 1;
            trace!(len = self.len, "erased element");
        }
        erased
    }

    /// Erase `element` from the subtree rooted at `id`, updating the bounds of the node it was
    /// removed from and of all its ancestors.
    ///
    /// Returns whether the element was removed and the node it was removed from.
    fn erase_child(
        &mut self,
        id: NodeId,
        element: &T,
        elem_bound: &Tr::Bound,
    ) -> (bool, Option<NodeId>)
    where
        T: PartialEq,
    {
        let overlaps = match &self.arena.get(id).bound {
            Some(bound) => furthest_distance_metric(&self.traits, elem_bound, bound).overlaps,
            None => false,
        };
        if !overlaps {
            return (false, None);
        }

        let mut erased = false;
        let mut container = None;
        let mut index = 0;
        while index < self.arena.get(id).children.len() {
            let (descend, found) = match &self.arena.get(id).children[index] {
                Child::Node(sub) => (Some(*sub), false),
                Child::Element(candidate) => (None, candidate == element),
            };
            if found {
                // order of children is not meaningful, so swap the last entry into the hole
                self.arena.get_mut(id).children.swap_remove(index);
                self.refresh_bounds_upward(id);
                return (true, Some(id));
            }
            if let Some(sub) = descend {
                (erased, container) = self.erase_child(sub, element, elem_bound);
                if erased {
                    break;
                }
            }
            index += 1;
        }
        (erased, container)
    }

    /// Drop the childless node `id` from its parent and release it.
    fn remove_empty_node(&mut self, parent: NodeId, id: NodeId) {
        let siblings = &mut self.arena.get_mut(parent).children;
        if let Some(pos) = siblings
            .iter()
            .position(|child| matches!(child, Child::Node(sub) if *sub == id))
        {
            siblings.swap_remove(pos);
        }
        self.arena.release(id);
        self.refresh_bounds_upward(parent);
        debug!(node = id.index(), parent = parent.index(), "compacted empty node");
    }

    /// From the root, select the node "closest" to `bound` at each level until reaching a node
    /// without sub-nodes. This is never an element, but the node containing elements.
    pub(crate) fn choose_leaf(&self, bound: &Tr::Bound) -> NodeId {
        let mut node = NodeId::ROOT;
        while let Some(chosen) = self.choose_child(node, bound) {
            node = chosen;
        }
        node
    }

    /// The sub-node of `id` minimizing the similarity score against `bound`. Ties go to the
    /// first one in children order; elements are ignored.
    fn choose_child(&self, id: NodeId, bound: &Tr::Bound) -> Option<NodeId> {
        let mut chosen: Option<(f64, NodeId)> = None;
        for sub in self.arena.get(id).child_nodes() {
            let Some(sub_bound) = &self.arena.get(sub).bound else {
                continue;
            };
            let metric = score(&self.traits, sub_bound, bound);
            if chosen.map_or(true, |(best, _)| metric < best) {
                chosen = Some((metric, sub));
            }
        }
        chosen.map(|(_, sub)| sub)
    }

    /// The current bound of a child entry.
    pub(crate) fn child_bound(&self, child: &Child<T>) -> Option<Tr::Bound> {
        match child {
            Child::Element(element) => Some(element.bound()),
            Child::Node(sub) => self.arena.get(*sub).bound.clone(),
        }
    }

    /// Recompute the bound of `id` from scratch out of its current children.
    pub(crate) fn recalculate_bound(&mut self, id: NodeId) {
        let mut bound: Option<Tr::Bound> = None;
        for child in &self.arena.get(id).children {
            if let Some(child_bound) = self.child_bound(child) {
                bound = Some(extend_bound(&self.traits, bound.as_ref(), &child_bound));
            }
        }
        self.arena.get_mut(id).bound = bound;
    }

    /// Recompute the bound of `id` and of every ancestor.
    fn refresh_bounds_upward(&mut self, id: NodeId) {
        let mut update = Some(id);
        while let Some(id) = update {
            self.recalculate_bound(id);
            update = self.arena.get(id).parent;
        }
    }

    /// Point the parent link of every sub-node of `id` back at `id`.
    pub(crate) fn fix_parent_links(&mut self, id: NodeId) {
        let subs: tinyvec::TinyVec<[NodeId; 16]> = self.arena.get(id).child_nodes().collect();
        for sub in subs {
            self.arena.get_mut(sub).parent = Some(id);
        }
    }

    pub(crate) fn alloc_node(&mut self, node: Node<Tr::Bound, T>) -> NodeId {
        self.arena.alloc(node)
    }
}

/// Union `bound` into an optional accumulated bound.
#[inline]
fn extend_bound<Tr: BoundTraits>(
    traits: &Tr,
    current: Option<&Tr::Bound>,
    bound: &Tr::Bound,
) -> Tr::Bound {
    match current {
        Some(current) => traits.union(current, bound),
        None => bound.clone(),
    }
}

impl<T, Tr> fmt::Debug for Bvh<T, Tr>
where
    Tr: BoundTraits + fmt::Debug,
    Tr::Bound: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bvh")
            .field("traits", &self.traits)
            .field("node_size", &self.node_size)
            .field("len", &self.len)
            .field("num_nodes", &self.arena.len())
            .field("bound", &self.arena.get(NodeId::ROOT).bound)
            .finish()
    }
}
