//! Arena storage for the nodes of the hierarchy.

/// A stable handle to a node in the arena.
///
/// The root is always [`NodeId::ROOT`]. Handles of freed nodes are recycled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node. It is never freed, only emptied.
    pub const ROOT: Self = Self(0);

    /// The arena slot of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An entry of a node's children list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Child<T> {
    /// A caller-supplied element.
    Element(T),
    /// A sub-node owned by the node holding this entry.
    Node(NodeId),
}

/// A node of the hierarchy.
#[derive(Debug, Clone)]
pub(crate) struct Node<B, T> {
    /// Union of the bounds of all children. `None` only while the node has no children.
    pub(crate) bound: Option<B>,
    /// Children in insertion order, except that erasure swaps the last entry into the hole.
    pub(crate) children: Vec<Child<T>>,
    /// The owning node; `None` for the root.
    pub(crate) parent: Option<NodeId>,
}

impl<B, T> Node<B, T> {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            bound: None,
            children: Vec::new(),
            parent,
        }
    }

    /// Iterate over the sub-node handles among the children.
    pub(crate) fn child_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|child| match child {
            Child::Node(id) => Some(*id),
            Child::Element(_) => None,
        })
    }

    /// Returns `true` if at least one child is an element.
    pub(crate) fn holds_elements(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, Child::Element(_)))
    }
}

/// Index-addressed node storage with a free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<B, T> {
    slots: Vec<Option<Node<B, T>>>,
    free: Vec<NodeId>,
}

impl<B, T> Arena<B, T> {
    /// An arena holding only an empty root.
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![Some(Node::new(None))],
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<B, T>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<B, T>> {
        debug_assert_ne!(id, NodeId::ROOT, "the root is never released");
        let node = self.slots.get_mut(id.0)?.take();
        if node.is_some() {
            self.free.push(id);
        }
        node
    }

    /// Access a live node.
    ///
    /// Panics on a released handle; the tree only ever holds handles of live nodes.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<B, T> {
        match &self.slots[id.0] {
            Some(node) => node,
            None => panic!("access to released node {}", id.0),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<B, T> {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => panic!("access to released node {}", id.0),
        }
    }

    /// Number of live nodes, root included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Iterate over live nodes and their handles.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<B, T>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }
}
