//! Editor state driven by a UI shell.
//!
//! The editor owns the design tree together with the selection, the id generator and the
//! config. Drag gestures go through [`Editor::handle_drag_end`]; the remaining methods back
//! the properties panel.

use formcraft_config::Config;
use formcraft_ipc::{Action, FormTreeNode, Script};
use serde_json::{json, Map, Value};

use crate::tree::drop_target::{self, DragSource, DropAction, DropTarget};
use crate::tree::{
    ComponentKind, FormTree, IdGenerator, Node, NodeId, NodeRef, Parent, Props, Selection,
    SortingStrategy, TreeError,
};

/// Largest vertical padding the panel slider allows, in pixels.
pub const MAX_VERTICAL_PADDING: u32 = 64;

/// Result of a finished drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changed.
    Ignored,
    /// A palette item was created with this id.
    Inserted(NodeId),
    /// This node was relocated.
    Moved(NodeId),
}

#[derive(Debug)]
pub struct Editor {
    tree: FormTree,
    selection: Selection,
    ids: IdGenerator,
    config: Config,
}

impl Editor {
    pub fn new(config: Config) -> Self {
        let prefix = config.ids.prefix.clone();
        let ids = match config.ids.seed {
            Some(seed) => IdGenerator::with_seed(prefix, seed),
            None => IdGenerator::new(prefix),
        };

        Self {
            tree: FormTree::new(),
            selection: Selection::new(config.selection.keep_stale_descendant),
            ids,
            config,
        }
    }

    /// Load a saved tree. Its ids are never issued again.
    ///
    /// Leaves with children and nodes named like the canvas are refused.
    pub fn from_snapshot(config: Config, snapshot: Vec<FormTreeNode>) -> Result<Self, TreeError> {
        let nodes: Vec<_> = snapshot.into_iter().map(Node::from_ipc).collect();
        for node in &nodes {
            check_loaded(node)?;
        }

        let mut editor = Self::new(config);
        editor.tree = FormTree::from_nodes(nodes)?;
        for node in editor.tree.iter() {
            editor.ids.reserve(node.id());
        }
        debug!("loaded snapshot with {} node(s)", editor.tree.len());
        Ok(editor)
    }

    /// Load the script's tree and apply its actions in order.
    pub fn replay(config: Config, script: Script) -> Result<Self, TreeError> {
        let mut editor = Self::from_snapshot(config, script.tree)?;
        for action in script.actions {
            editor.apply(action)?;
        }
        Ok(editor)
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Saved form of the tree.
    pub fn snapshot(&self) -> Vec<FormTreeNode> {
        self.tree.to_nodes().iter().map(Node::to_ipc).collect()
    }

    // ========================================================================
    // Tree edits
    // ========================================================================

    /// Create a component under `parent` and select it.
    pub fn add_component(
        &mut self,
        kind: ComponentKind,
        parent: &Parent,
        index: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        if let Parent::Node(parent_id) = parent {
            let node = self
                .tree
                .find_node(parent_id.as_str())
                .ok_or_else(|| TreeError::ParentNotFound(parent_id.clone()))?;
            if !node.kind().is_container() {
                return Err(TreeError::NotAContainer(parent_id.clone()));
            }
        }

        let node = self.ids.create_node(kind);
        let id = node.id.clone();
        self.tree.insert(node, parent, index)?;
        self.selection.select(Some(id.clone()));
        Ok(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let removed = self.tree.remove(id)?;
        self.selection.on_removed(&removed);
        Some(removed)
    }

    pub fn update_props(&mut self, id: &str, patch: Props) -> bool {
        self.tree.update(id, patch)
    }

    pub fn update_style(&mut self, id: &str, patch: Map<String, Value>) -> bool {
        self.tree.update_style(id, patch)
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.selection.select(id);
    }

    /// Selected node, or `None` when nothing is selected or the selection is stale.
    pub fn selected_node(&self) -> Option<NodeRef<'_>> {
        self.selection.selected_in(&self.tree)
    }

    // ========================================================================
    // Properties panel
    // ========================================================================

    /// Set the grid of a container, clamped to the configured limits.
    ///
    /// Returns `false` if `id` is missing or its kind has no grid.
    pub fn set_grid(&mut self, id: &str, columns: u32, gap: u32) -> bool {
        let Some(node) = self.tree.find_node(id) else {
            debug!("set_grid: {id} is not in the tree");
            return false;
        };
        if !node.kind().has_grid() {
            debug!("set_grid: {id} is a {} which has no grid", node.kind());
            return false;
        }

        let limits = &self.config.grid;
        let columns = columns.clamp(1, limits.max_columns.max(1));
        let gap = gap.min(limits.max_gap);
        self.tree.update(
            id,
            Props::from_iter([("columns", json!(columns)), ("gap", json!(gap))]),
        )
    }

    /// Set equal top and bottom padding.
    pub fn set_vertical_padding(&mut self, id: &str, px: u32) -> bool {
        let value = format!("{}px", px.min(MAX_VERTICAL_PADDING));
        let patch = Map::from_iter([
            (String::from("paddingTop"), json!(value)),
            (String::from("paddingBottom"), json!(value)),
        ]);
        self.tree.update_style(id, patch)
    }

    /// Append `{label: "Option N", value: "N"}` to a select.
    pub fn add_select_option(&mut self, id: &str) -> bool {
        let Some(node) = self.tree.find_node(id) else {
            debug!("add_select_option: {id} is not in the tree");
            return false;
        };
        if node.kind() != ComponentKind::Select {
            debug!("add_select_option: {id} is a {}, not a select", node.kind());
            return false;
        }

        let mut options = node.props().options().to_vec();
        let n = options.len() + 1;
        options.push(json!({ "label": format!("Option {n}"), "value": n.to_string() }));
        self.tree
            .update(id, Props::from_iter([("options", Value::Array(options))]))
    }

    /// Append a pane labeled "Tab N" to a tabbed container and activate it.
    pub fn add_tab(&mut self, tabs: &str) -> Option<NodeId> {
        let Some(node) = self.tree.find_node(tabs) else {
            debug!("add_tab: {tabs} is not in the tree");
            return None;
        };
        if !node.kind().is_tabbed() {
            debug!("add_tab: {tabs} is a {}, not tabs", node.kind());
            return None;
        }

        let mut pane = self.ids.create_node(ComponentKind::TabPane);
        pane.props
            .set("label", format!("Tab {}", node.child_count() + 1));
        let id = pane.id.clone();

        if let Err(err) = self.tree.insert(pane, &Parent::node(tabs), None) {
            warn!("add_tab: {err}");
            return None;
        }
        self.selection.set_active_tab(&self.tree, tabs, id.as_str());
        Some(id)
    }

    pub fn activate_tab(&mut self, tabs: &str, pane: &str) -> bool {
        self.selection.set_active_tab(&self.tree, tabs, pane)
    }

    pub fn active_tab(&self, tabs: &str) -> Option<NodeId> {
        self.selection.active_tab(&self.tree, tabs)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.selection.is_visible(&self.tree, id)
    }

    /// Drag feedback layout for the children of `container`, or of the root with `None`.
    pub fn sorting_strategy(&self, container: Option<&str>) -> SortingStrategy {
        container
            .and_then(|id| self.tree.find_node(id))
            .map_or(SortingStrategy::VerticalList, SortingStrategy::for_container)
    }

    // ========================================================================
    // Drag and drop
    // ========================================================================

    /// Apply the end of a drag gesture.
    pub fn handle_drag_end(
        &mut self,
        source: &DragSource,
        target: Option<&DropTarget>,
    ) -> Result<DropOutcome, TreeError> {
        let action = drop_target::resolve(
            &self.tree,
            &self.selection,
            source,
            target,
            self.config.drop.palette_insert,
        )?;

        let Some(action) = action else {
            debug!("drop of {source:?} over {target:?} ignored");
            return Ok(DropOutcome::Ignored);
        };

        match action {
            DropAction::Insert {
                kind,
                parent,
                index,
            } => {
                let missing = matches!(
                    &parent,
                    Parent::Node(id) if !self.tree.contains(id.as_str())
                );
                let (parent, index) = if missing {
                    warn!("drop parent {parent} not found, appending to the root");
                    (Parent::Root, None)
                } else {
                    (parent, index)
                };

                let node = self.ids.create_node(kind);
                let id = node.id.clone();
                self.tree.insert(node, &parent, index)?;
                self.selection.select(Some(id.clone()));
                Ok(DropOutcome::Inserted(id))
            }
            DropAction::Move { active, over } => {
                if self.tree.move_node(active.as_str(), &over) {
                    self.selection.normalize(&self.tree);
                    Ok(DropOutcome::Moved(active))
                } else {
                    Ok(DropOutcome::Ignored)
                }
            }
        }
    }

    /// Apply one scripted action.
    pub fn apply(&mut self, action: Action) -> Result<(), TreeError> {
        trace!("applying {action:?}");
        match action {
            Action::DragEnd(event) => {
                let source = DragSource::from(event.active);
                let target = event.over.as_deref().map(DropTarget::from_id);
                let outcome = self.handle_drag_end(&source, target.as_ref())?;
                debug!("drag end: {outcome:?}");
            }
            Action::Select { id } => self.select(id.map(NodeId::from)),
            Action::Remove { id } => {
                self.remove(&id);
            }
            Action::Update { id, props } => {
                self.update_props(&id, Props::from(props));
            }
            Action::UpdateStyle { id, style } => {
                self.update_style(&id, style);
            }
            Action::SetGrid { id, columns, gap } => {
                self.set_grid(&id, columns, gap);
            }
            Action::SetVerticalPadding { id, px } => {
                self.set_vertical_padding(&id, px);
            }
            Action::AddSelectOption { id } => {
                self.add_select_option(&id);
            }
            Action::AddTab { tabs } => {
                self.add_tab(&tabs);
            }
            Action::ActivateTab { tabs, pane } => {
                self.activate_tab(&tabs, &pane);
            }
        }
        Ok(())
    }
}

fn check_loaded(node: &Node) -> Result<(), TreeError> {
    if DropTarget::CANVAS_IDS.contains(&node.id.as_str()) {
        return Err(TreeError::ReservedNodeId(node.id.clone()));
    }
    if !node.children.is_empty() && !node.kind.is_container() {
        return Err(TreeError::NotAContainer(node.id.clone()));
    }
    node.children.iter().try_for_each(check_loaded)
}
