//! Drop-target resolution.
//!
//! A drag gesture ends with a source (a palette item or an existing node) and an optional
//! hover target. [`resolve`] turns that pair into a [`DropAction`] against the current tree
//! without touching it; the editor applies the action.

use formcraft_config::PaletteInsert;
use formcraft_ipc::DragData;

use super::component::{ComponentKind, NodeId};
use super::forest::{FormTree, NodeRef, Parent};
use super::selection::Selection;
use super::TreeError;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// New component of the named type, dragged from the palette.
    Palette(String),
    /// Existing node.
    Node(NodeId),
}

impl From<DragData> for DragSource {
    fn from(data: DragData) -> Self {
        match data {
            DragData::SidebarItem { component_type } => DragSource::Palette(component_type),
            DragData::CanvasItem { id } => DragSource::Node(NodeId::from(id)),
        }
    }
}

/// What the pointer was over when the drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas background, outside any node.
    Canvas,
    Node(NodeId),
}

impl DropTarget {
    /// Ids that name the canvas rather than a node.
    pub const CANVAS_IDS: [&'static str; 2] = ["root", "canvas-droppable"];

    pub fn from_id(id: &str) -> Self {
        if Self::CANVAS_IDS.contains(&id) {
            DropTarget::Canvas
        } else {
            DropTarget::Node(NodeId::from(id))
        }
    }
}

/// Tree change a drop resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Create a node of `kind` and insert it under `parent`; `None` appends.
    Insert {
        kind: ComponentKind,
        parent: Parent,
        index: Option<usize>,
    },
    /// Relocate an existing node with [`FormTree::move_node`].
    Move { active: NodeId, over: DropTarget },
}

/// Resolve the end of a drag gesture.
///
/// `Ok(None)` means the drop is ignored. Only an unknown palette type is an error; an unknown
/// target id falls back to the root sequence so a dragged item is never lost.
pub fn resolve(
    tree: &FormTree,
    selection: &Selection,
    source: &DragSource,
    target: Option<&DropTarget>,
    palette_insert: PaletteInsert,
) -> Result<Option<DropAction>, TreeError> {
    let Some(target) = target else {
        trace!("drop of {source:?} over nothing, ignoring");
        return Ok(None);
    };

    match source {
        DragSource::Palette(name) => {
            let kind = name.parse::<ComponentKind>()?;
            Ok(resolve_palette(tree, selection, kind, target, palette_insert))
        }
        DragSource::Node(active) => Ok(resolve_move(tree, selection, active, target)),
    }
}

fn resolve_palette(
    tree: &FormTree,
    selection: &Selection,
    kind: ComponentKind,
    target: &DropTarget,
    palette_insert: PaletteInsert,
) -> Option<DropAction> {
    let over_id = match target {
        DropTarget::Canvas => {
            trace!("palette {kind} over the canvas, appending to the root");
            return Some(DropAction::Insert {
                kind,
                parent: Parent::Root,
                index: Some(tree.root_len()),
            });
        }
        DropTarget::Node(over_id) => over_id,
    };

    let Some(over) = tree.find_node(over_id.as_str()) else {
        trace!("palette {kind} over unknown {over_id}, appending to the root");
        return Some(DropAction::Insert {
            kind,
            parent: Parent::Root,
            index: None,
        });
    };

    if !selection.is_visible(tree, over_id.as_str()) {
        trace!("palette {kind} over hidden {over_id}, ignoring");
        return None;
    }

    if over.kind().is_tabbed() {
        if kind == ComponentKind::TabPane {
            trace!("palette {kind} over {over_id}, adding a pane");
            return Some(append_to(kind, over));
        }
        if let Some(pane) = selection.active_tab(tree, over_id.as_str()) {
            trace!("palette {kind} over {over_id}, appending to active pane {pane}");
            return Some(DropAction::Insert {
                kind,
                parent: Parent::Node(pane),
                index: None,
            });
        }
        // Without panes there is nothing to drop into.
    } else if over.kind().is_container() {
        trace!("palette {kind} over container {over_id}, appending");
        return Some(append_to(kind, over));
    }

    let (parent, idx) = tree.position(over_id.as_str())?;
    let index = match palette_insert {
        PaletteInsert::After => idx + 1,
        PaletteInsert::Before => idx,
    };
    trace!("palette {kind} over leaf {over_id}, inserting under {parent} at {index}");
    Some(DropAction::Insert {
        kind,
        parent,
        index: Some(index),
    })
}

fn append_to(kind: ComponentKind, container: NodeRef<'_>) -> DropAction {
    DropAction::Insert {
        kind,
        parent: Parent::Node(container.id().clone()),
        index: None,
    }
}

fn resolve_move(
    tree: &FormTree,
    selection: &Selection,
    active: &NodeId,
    target: &DropTarget,
) -> Option<DropAction> {
    let Some(active_node) = tree.find_node(active.as_str()) else {
        debug!("drag of {active} which is not in the tree, ignoring");
        return None;
    };

    let over_id = match target {
        DropTarget::Canvas => {
            return Some(DropAction::Move {
                active: active.clone(),
                over: DropTarget::Canvas,
            })
        }
        DropTarget::Node(over_id) => over_id,
    };

    if over_id == active {
        trace!("{active} dropped on itself, ignoring");
        return None;
    }

    let Some(over) = tree.find_node(over_id.as_str()) else {
        trace!("{active} over unknown {over_id}, the move appends to the root");
        return Some(DropAction::Move {
            active: active.clone(),
            over: target.clone(),
        });
    };

    if !selection.is_visible(tree, over_id.as_str()) {
        trace!("{active} over hidden {over_id}, ignoring");
        return None;
    }

    let over = if over.kind().is_tabbed() && active_node.kind() != ComponentKind::TabPane {
        let Some(pane) = selection.active_tab(tree, over_id.as_str()) else {
            trace!("{active} over {over_id} which has no panes, ignoring");
            return None;
        };
        trace!("{active} over {over_id}, redirecting to active pane {pane}");
        DropTarget::Node(pane)
    } else {
        target.clone()
    };

    Some(DropAction::Move {
        active: active.clone(),
        over,
    })
}
