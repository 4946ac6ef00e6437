//! Selected node and active tab panes.
//!
//! Neither is part of the tree: switching tabs or selecting a node never mutates it.

use std::collections::{HashMap, HashSet};

use super::component::{Node, NodeId};
use super::forest::{FormTree, NodeRef, Parent};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected node, possibly stale
    selected: Option<NodeId>,
    /// Active pane per tabbed container, possibly stale
    active_tabs: HashMap<NodeId, NodeId>,
    /// Keep the selection when only an ancestor of it is removed
    keep_stale_descendant: bool,
}

impl Selection {
    pub fn new(keep_stale_descendant: bool) -> Self {
        Self {
            keep_stale_descendant,
            ..Self::default()
        }
    }

    /// Select `id`, or clear the selection. The id is not checked against the tree.
    pub fn select(&mut self, id: Option<NodeId>) {
        trace!("select {id:?}");
        self.selected = id;
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|selected| selected.as_str() == id)
    }

    /// Selected node if it is still in `tree`; a stale selection reads as nothing selected.
    pub fn selected_in<'a>(&self, tree: &'a FormTree) -> Option<NodeRef<'a>> {
        tree.find_node(self.selected.as_ref()?.as_str())
    }

    /// Forget state that referred to the removed subtree.
    pub fn on_removed(&mut self, removed: &Node) {
        if let Some(selected) = &self.selected {
            let cleared = if self.keep_stale_descendant {
                removed.id == *selected
            } else {
                removed.contains(selected.as_str())
            };
            if cleared {
                debug!("clearing selection of removed node {selected}");
                self.selected = None;
            }
        }

        let gone: HashSet<&NodeId> = removed.ids().into_iter().collect();
        self.active_tabs
            .retain(|tabs, pane| !gone.contains(tabs) && !gone.contains(pane));
    }

    /// Active pane of a tabbed container.
    ///
    /// Falls back to the first child when no pane was activated or the activated one is gone.
    /// `None` when the container has no panes or is not in the tree.
    pub fn active_tab(&self, tree: &FormTree, tabs: &str) -> Option<NodeId> {
        let node = tree.find_node(tabs)?;
        if let Some(active) = self.active_tabs.get(tabs) {
            if node.children().any(|child| child.id() == active) {
                return Some(active.clone());
            }
        }
        node.first_child().map(|child| child.id().clone())
    }

    /// Make `pane` the visible child of `tabs`. Returns `false` if `pane` is not a child of a
    /// tabbed container `tabs`.
    pub fn set_active_tab(&mut self, tree: &FormTree, tabs: &str, pane: &str) -> bool {
        let Some(node) = tree.find_node(tabs) else {
            debug!("set_active_tab: {tabs} is not in the tree");
            return false;
        };
        if !node.kind().is_tabbed() || !node.children().any(|child| child.id().as_str() == pane) {
            debug!("set_active_tab: {pane} is not a pane of {tabs}");
            return false;
        }

        self.active_tabs
            .insert(node.id().clone(), NodeId::from(pane));
        true
    }

    /// Drop active-tab entries whose pane is no longer a child of its container.
    pub fn normalize(&mut self, tree: &FormTree) {
        self.active_tabs.retain(|tabs, pane| {
            tree.find_parent(pane.as_str()) == Some(Parent::Node(tabs.clone()))
        });
    }

    /// Whether `id` is rendered: every tab pane on its path is the active one.
    pub fn is_visible(&self, tree: &FormTree, id: &str) -> bool {
        let Some(mut current) = tree.find_node(id) else {
            return false;
        };

        while let Some(parent) = current.parent() {
            if parent.kind().is_tabbed()
                && self.active_tab(tree, parent.id().as_str()).as_ref() != Some(current.id())
            {
                return false;
            }
            current = parent;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::component::ComponentKind;

    fn tabs_tree() -> FormTree {
        FormTree::from_nodes([Node::with_id("tabs", ComponentKind::Tabs).with_children([
            Node::with_id("t1", ComponentKind::TabPane)
                .with_children([Node::with_id("a", ComponentKind::Input)]),
            Node::with_id("t2", ComponentKind::TabPane)
                .with_children([Node::with_id("b", ComponentKind::Input)]),
        ])])
        .unwrap()
    }

    #[test]
    fn active_tab_defaults_to_first_pane() {
        let tree = tabs_tree();
        let selection = Selection::default();
        assert_eq!(selection.active_tab(&tree, "tabs"), Some(NodeId::from("t1")));
        assert!(selection.is_visible(&tree, "a"));
        assert!(!selection.is_visible(&tree, "b"));
        assert!(!selection.is_visible(&tree, "t2"));
    }

    #[test]
    fn activating_a_pane_switches_visibility() {
        let tree = tabs_tree();
        let mut selection = Selection::default();
        assert!(selection.set_active_tab(&tree, "tabs", "t2"));
        assert_eq!(selection.active_tab(&tree, "tabs"), Some(NodeId::from("t2")));
        assert!(!selection.is_visible(&tree, "a"));
        assert!(selection.is_visible(&tree, "b"));
    }

    #[test]
    fn only_children_of_tabbed_containers_can_be_activated() {
        let tree = tabs_tree();
        let mut selection = Selection::default();
        assert!(!selection.set_active_tab(&tree, "tabs", "a"));
        assert!(!selection.set_active_tab(&tree, "t1", "a"));
        assert!(!selection.set_active_tab(&tree, "missing", "t1"));
    }

    #[test]
    fn removed_active_pane_falls_back_to_first() {
        let mut tree = tabs_tree();
        let mut selection = Selection::default();
        assert!(selection.set_active_tab(&tree, "tabs", "t2"));

        let removed = tree.remove("t2").unwrap();
        selection.on_removed(&removed);
        assert_eq!(selection.active_tab(&tree, "tabs"), Some(NodeId::from("t1")));
    }

    #[test]
    fn normalize_drops_panes_moved_elsewhere() {
        let mut tree = tabs_tree();
        let mut selection = Selection::default();
        assert!(selection.set_active_tab(&tree, "tabs", "t2"));

        let pane = tree.remove("t2").unwrap();
        tree.insert(pane, &Parent::Root, None).unwrap();
        selection.normalize(&tree);
        assert_eq!(selection.active_tab(&tree, "tabs"), Some(NodeId::from("t1")));
    }

    #[test]
    fn removing_selected_node_clears_selection() {
        let mut tree = tabs_tree();
        let mut selection = Selection::default();
        selection.select(Some(NodeId::from("a")));

        let removed = tree.remove("b").unwrap();
        selection.on_removed(&removed);
        assert!(selection.is_selected("a"));

        let removed = tree.remove("a").unwrap();
        selection.on_removed(&removed);
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn removing_an_ancestor_clears_selection_unless_configured() {
        let mut tree = tabs_tree();
        let mut selection = Selection::default();
        selection.select(Some(NodeId::from("a")));
        let removed = tree.remove("t1").unwrap();
        selection.on_removed(&removed);
        assert_eq!(selection.selected(), None);

        let mut tree = tabs_tree();
        let mut selection = Selection::new(true);
        selection.select(Some(NodeId::from("a")));
        let removed = tree.remove("t1").unwrap();
        selection.on_removed(&removed);
        assert!(selection.is_selected("a"));
        assert!(selection.selected_in(&tree).is_none());
    }
}
