//! Arena-backed form tree.
//!
//! The forest is an ordered sequence of root nodes, each of which may own an ordered sequence
//! of children. Nodes are stored in a SlotMap and refer to each other by key:
//! - every node records its parent key (`None` for roots)
//! - an id index gives O(1) lookup from a [`NodeId`] to its key
//! - subtrees leave the arena as owned [`Node`] values and come back the same way
//!
//! Every mutating method either applies completely or leaves the tree untouched.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::{Map, Value};
use slotmap::{new_key_type, SlotMap};

use super::component::{ComponentKind, Node, NodeId, Props};
use super::drop_target::DropTarget;
use super::TreeError;

// ============================================================================
// SlotMap Key Types
// ============================================================================

new_key_type! {
    /// Key to reference a node in the arena.
    struct NodeKey;
}

// ============================================================================
// Tree Types
// ============================================================================

/// Where a node sits: at the root level or under another node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parent {
    Root,
    Node(NodeId),
}

impl Parent {
    pub fn node(id: impl Into<NodeId>) -> Self {
        Parent::Node(id.into())
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Root => f.write_str("(root)"),
            Parent::Node(id) => write!(f, "{id}"),
        }
    }
}

/// Node stored in the arena.
#[derive(Debug, Clone)]
struct NodeData {
    id: NodeId,
    kind: ComponentKind,
    props: Props,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

/// The design tree.
#[derive(Debug, Clone)]
pub struct FormTree {
    /// SlotMap storing all nodes in the tree
    nodes: SlotMap<NodeKey, NodeData>,
    /// Root sequence, in order
    roots: Vec<NodeKey>,
    /// Id to key lookup
    index: HashMap<NodeId, NodeKey>,
}

/// Borrowed view of a node inside a [`FormTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a FormTree,
    data: &'a NodeData,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        &self.data.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.data.kind
    }

    pub fn props(&self) -> &'a Props {
        &self.data.props
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        let data = self.data;
        data.children
            .iter()
            .filter_map(move |&key| tree.node_ref(key))
    }

    pub fn child_count(&self) -> usize {
        self.data.children.len()
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.data.parent.and_then(|key| tree.node_ref(key))
    }

    /// Owned copy of this node and its subtree.
    pub fn to_node(&self) -> Node {
        Node {
            id: self.data.id.clone(),
            kind: self.data.kind,
            props: self.data.props.clone(),
            children: self.children().map(|child| child.to_node()).collect(),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.data.id)
            .field("kind", &self.data.kind)
            .field("children", &self.data.children.len())
            .finish()
    }
}

impl Default for FormTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a tree from owned root nodes, validating id uniqueness.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for node in nodes {
            tree.insert(node, &Parent::Root, None)?;
        }
        Ok(tree)
    }

    // ========================================================================
    // Internal SlotMap helpers
    // ========================================================================

    fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    fn node_ref(&self, key: NodeKey) -> Option<NodeRef<'_>> {
        let data = self.nodes.get(key)?;
        Some(NodeRef { tree: self, data })
    }

    /// Sequence that holds the children of `parent` (`None` for the roots)
    fn siblings(&self, parent: Option<NodeKey>) -> &[NodeKey] {
        match parent {
            None => &self.roots,
            Some(key) => self
                .nodes
                .get(key)
                .map(|data| data.children.as_slice())
                .unwrap_or_default(),
        }
    }

    fn parent_ref(&self, parent: Option<NodeKey>) -> Parent {
        match parent.and_then(|key| self.nodes.get(key)) {
            Some(data) => Parent::Node(data.id.clone()),
            None => Parent::Root,
        }
    }

    fn ancestor_keys(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        let start = self.nodes.get(key).and_then(|data| data.parent);
        std::iter::successors(start, move |&key| {
            self.nodes.get(key).and_then(|data| data.parent)
        })
    }

    fn collect_keys(&self, key: NodeKey, out: &mut Vec<NodeKey>) {
        out.push(key);
        if let Some(data) = self.nodes.get(key) {
            for &child in &data.children {
                self.collect_keys(child, out);
            }
        }
    }

    /// Put a detached subtree into the arena, returning the key of its root.
    ///
    /// The new root is not linked into any sibling sequence yet.
    fn insert_subtree(&mut self, node: Node, parent: Option<NodeKey>) -> NodeKey {
        let Node {
            id,
            kind,
            props,
            children,
        } = node;

        let key = self.nodes.insert(NodeData {
            id: id.clone(),
            kind,
            props,
            parent,
            children: Vec::new(),
        });
        self.index.insert(id, key);

        let child_keys: Vec<_> = children
            .into_iter()
            .map(|child| self.insert_subtree(child, Some(key)))
            .collect();
        if let Some(data) = self.nodes.get_mut(key) {
            data.children = child_keys;
        }

        key
    }

    /// Remove a subtree from the arena and the id index.
    ///
    /// The caller unlinks the root from its sibling sequence first.
    fn extract_subtree(&mut self, key: NodeKey) -> Option<Node> {
        let data = self.nodes.remove(key)?;
        self.index.remove(&data.id);

        let children = data
            .children
            .into_iter()
            .filter_map(|child| self.extract_subtree(child))
            .collect();

        Some(Node {
            id: data.id,
            kind: data.kind,
            props: data.props,
            children,
        })
    }

    /// Link `key` into the children of `parent` at `index`, clamped; appends without an index.
    fn link(&mut self, key: NodeKey, parent: Option<NodeKey>, index: Option<usize>) -> usize {
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent_key) => match self.nodes.get_mut(parent_key) {
                Some(data) => &mut data.children,
                None => return 0,
            },
        };

        let idx = index.map_or(siblings.len(), |idx| idx.min(siblings.len()));
        siblings.insert(idx, key);
        idx
    }

    fn unlink(&mut self, key: NodeKey) {
        let parent = self.nodes.get(key).and_then(|data| data.parent);
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent_key) => match self.nodes.get_mut(parent_key) {
                Some(data) => &mut data.children,
                None => return,
            },
        };
        siblings.retain(|&child| child != key);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Total number of nodes at all levels.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().filter_map(move |&key| self.node_ref(key))
    }

    pub fn root_len(&self) -> usize {
        self.roots.len()
    }

    /// All nodes, depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        let mut keys = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_keys(root, &mut keys);
        }
        keys.into_iter().filter_map(move |key| self.node_ref(key))
    }

    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.node_ref(self.key_of(id)?)
    }

    /// Parent of `id`: [`Parent::Root`] for root nodes, `None` if `id` is not in the tree.
    pub fn find_parent(&self, id: &str) -> Option<Parent> {
        let data = self.nodes.get(self.key_of(id)?)?;
        Some(self.parent_ref(data.parent))
    }

    /// Parent of `id` and its index among the parent's children.
    pub fn position(&self, id: &str) -> Option<(Parent, usize)> {
        let key = self.key_of(id)?;
        let parent = self.nodes.get(key)?.parent;
        let idx = self.siblings(parent).iter().position(|&child| child == key)?;
        Some((self.parent_ref(parent), idx))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.key_of(id)
            .into_iter()
            .flat_map(move |key| self.ancestor_keys(key))
            .filter_map(move |key| self.node_ref(key))
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let (Some(ancestor_key), Some(key)) = (self.key_of(ancestor), self.key_of(id)) else {
            return false;
        };
        self.ancestor_keys(key).any(|key| key == ancestor_key)
    }

    /// Owned copy of the whole forest.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.roots().map(|node| node.to_node()).collect()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Insert a node (with its subtree) under `parent` at `index`, or append without an index.
    ///
    /// Indices past the end append. Inserting under a leaf is allowed but logged; the editor
    /// never does it.
    pub fn insert(
        &mut self,
        node: Node,
        parent: &Parent,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let parent_key = match parent {
            Parent::Root => None,
            Parent::Node(parent_id) => {
                let key = self
                    .key_of(parent_id.as_str())
                    .ok_or_else(|| TreeError::ParentNotFound(parent_id.clone()))?;
                Some(key)
            }
        };

        let mut incoming = HashSet::new();
        for id in node.ids() {
            if self.index.contains_key(id) || !incoming.insert(id) {
                return Err(TreeError::DuplicateNodeId(id.clone()));
            }
        }

        if let Some(data) = parent_key.and_then(|key| self.nodes.get(key)) {
            if !data.kind.is_container() {
                warn!(
                    "inserting {} under {} which is a {}, not a container",
                    node.id, data.id, data.kind
                );
            }
        }

        let id = node.id.clone();
        let key = self.insert_subtree(node, parent_key);
        let idx = self.link(key, parent_key, index);
        debug!("inserted {id} under {parent} at {idx}");
        Ok(())
    }

    /// Remove a node and its subtree, returning them. Missing ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let Some(key) = self.key_of(id) else {
            debug!("remove: {id} is not in the tree");
            return None;
        };

        self.unlink(key);
        let removed = self.extract_subtree(key);
        if let Some(node) = &removed {
            debug!("removed {id} with {} node(s)", node.ids().len());
        }
        removed
    }

    /// Shallow-merge `patch` into the props of `id`. Returns `false` if `id` is missing.
    pub fn update(&mut self, id: &str, patch: Props) -> bool {
        let Some(data) = self.key_of(id).and_then(|key| self.nodes.get_mut(key)) else {
            debug!("update: {id} is not in the tree");
            return false;
        };
        data.props.merge(patch);
        true
    }

    /// Merge `patch` into the `style` map of `id`. Returns `false` if `id` is missing.
    pub fn update_style(&mut self, id: &str, patch: Map<String, Value>) -> bool {
        let Some(data) = self.key_of(id).and_then(|key| self.nodes.get_mut(key)) else {
            debug!("update_style: {id} is not in the tree");
            return false;
        };
        data.props.merge_style(patch);
        true
    }

    /// Relocate `active` (with its subtree) relative to `over`.
    ///
    /// The subtree is detached first and the destination is looked up in what remains:
    /// - the canvas appends to the root sequence
    /// - a container appends to its children
    /// - a leaf gets the node inserted right before it
    /// - an id that is not in the remaining tree appends to the root sequence
    ///
    /// Moving a node into its own subtree is refused and leaves the tree unchanged. Returns
    /// whether anything moved.
    pub fn move_node(&mut self, active: &str, over: &DropTarget) -> bool {
        let Some(active_key) = self.key_of(active) else {
            debug!("move: {active} is not in the tree");
            return false;
        };

        if let DropTarget::Node(over_id) = over {
            if self.is_ancestor(active, over_id.as_str()) {
                debug!("move: refusing to move {active} into its descendant {over_id}");
                return false;
            }
        }

        self.unlink(active_key);
        let Some(subtree) = self.extract_subtree(active_key) else {
            return false;
        };

        let (parent, index) = match over {
            DropTarget::Canvas => (None, None),
            DropTarget::Node(over_id) => {
                match self
                    .key_of(over_id.as_str())
                    .and_then(|key| self.nodes.get(key).map(|data| (key, data)))
                {
                    Some((over_key, data)) if data.kind.is_container() => (Some(over_key), None),
                    Some((over_key, data)) => {
                        let parent = data.parent;
                        let idx = self
                            .siblings(parent)
                            .iter()
                            .position(|&child| child == over_key);
                        (parent, idx)
                    }
                    None => {
                        warn!("move: target {over_id} not found, appending {active} to the root");
                        (None, None)
                    }
                }
            }
        };

        let key = self.insert_subtree(subtree, parent);
        let idx = self.link(key, parent, index);
        debug!(
            "moved {active} under {} at {idx}",
            self.parent_ref(parent)
        );
        true
    }

    // ========================================================================
    // Debugging
    // ========================================================================

    /// Indented text rendering, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if self.roots.is_empty() {
            out.push_str("(empty)\n");
            return out;
        }

        for &root in &self.roots {
            self.outline_node(root, 0, &mut out);
        }
        out
    }

    fn outline_node(&self, key: NodeKey, depth: usize, out: &mut String) {
        use std::fmt::Write as _;

        let indent = "  ".repeat(depth);
        let Some(data) = self.nodes.get(key) else {
            let _ = writeln!(out, "{indent}(missing)");
            return;
        };

        let _ = match data.props.label() {
            Some(label) => writeln!(out, "{indent}{:?} {} {label:?}", data.kind, data.id),
            None => writeln!(out, "{indent}{:?} {}", data.kind, data.id),
        };
        for &child in &data.children {
            self.outline_node(child, depth + 1, out);
        }
    }
}
