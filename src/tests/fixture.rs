use std::collections::HashSet;

use formcraft_config::Config;

use crate::editor::{DropOutcome, Editor};
use crate::tree::{DragSource, DropTarget, Node, NodeId};

pub struct Fixture {
    pub editor: Editor,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(mut config: Config) -> Self {
        config.ids.seed.get_or_insert(1);
        Self {
            editor: Editor::new(config),
        }
    }

    pub fn with_tree(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self::with_tree_and_config(nodes, Config::default())
    }

    pub fn with_tree_and_config(nodes: impl IntoIterator<Item = Node>, config: Config) -> Self {
        let snapshot = nodes.into_iter().map(|node| node.to_ipc()).collect();
        let editor = Editor::from_snapshot(config, snapshot).unwrap();
        let f = Self { editor };
        f.check();
        f
    }

    /// Drop a palette item of type `name` over `over`.
    pub fn drop_new(&mut self, name: &str, over: Option<&str>) -> DropOutcome {
        let target = over.map(DropTarget::from_id);
        let outcome = self
            .editor
            .handle_drag_end(&DragSource::Palette(name.to_owned()), target.as_ref())
            .unwrap();
        self.check();
        outcome
    }

    /// Like [`Self::drop_new`], expecting the drop to create a node.
    #[track_caller]
    pub fn add(&mut self, name: &str, over: &str) -> NodeId {
        match self.drop_new(name, Some(over)) {
            DropOutcome::Inserted(id) => id,
            outcome => panic!("expected {name} to be inserted over {over}, got {outcome:?}"),
        }
    }

    /// Drag the existing node `id` over `over`.
    pub fn drag(&mut self, id: &str, over: Option<&str>) -> DropOutcome {
        let target = over.map(DropTarget::from_id);
        let outcome = self
            .editor
            .handle_drag_end(&DragSource::Node(NodeId::from(id)), target.as_ref())
            .unwrap();
        self.check();
        outcome
    }

    pub fn root_ids(&self) -> Vec<String> {
        self.editor
            .tree()
            .roots()
            .map(|node| node.id().to_string())
            .collect()
    }

    pub fn child_ids(&self, id: &str) -> Vec<String> {
        self.editor
            .tree()
            .find_node(id)
            .unwrap()
            .children()
            .map(|node| node.id().to_string())
            .collect()
    }

    pub fn selected(&self) -> Option<String> {
        self.editor.selection().selected().map(NodeId::to_string)
    }

    #[track_caller]
    pub fn check(&self) {
        let tree = self.editor.tree();

        let mut seen = HashSet::new();
        for node in tree.iter() {
            let id = node.id().as_str();
            assert!(seen.insert(id), "duplicate id {id}");
            assert!(tree.ancestors(id).count() < tree.len(), "{id} is part of a cycle");
            if node.child_count() > 0 {
                assert!(node.kind().is_container(), "{id} is a leaf with children");
            }

            if node.kind().is_tabbed() {
                if let Some(active) = self.editor.active_tab(id) {
                    assert!(node.children().any(|child| child.id() == &active));
                }
            }
        }
        assert_eq!(seen.len(), tree.len());

        if !self.editor.config().selection.keep_stale_descendant {
            if let Some(selected) = self.editor.selection().selected() {
                assert!(
                    tree.contains(selected.as_str()),
                    "selection {selected} is stale"
                );
            }
        }
    }
}
