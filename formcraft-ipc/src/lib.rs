//! Types exchanged between the formcraft editor core and its presentation layer.
//!
//! Everything here is plain serde data: the tree snapshot produced on save, the drag payloads
//! attached to draggable items, and the scripted actions understood by the `formcraft replay`
//! command.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Component type as it appears on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Generic box.
    Container,
    /// Form wrapper.
    Form,
    /// Tabbed container whose children are tab items.
    Tabs,
    /// A single tab pane.
    TabItem,
    /// Single-line text input.
    Input,
    /// Multi-line text input.
    Textarea,
    /// Dropdown.
    Select,
    /// Checkbox with a caption.
    Checkbox,
    /// Button.
    Button,
    /// Static text block.
    Text,
    /// Image.
    Image,
    /// Heading.
    Header,
}

/// One node of a saved form tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FormTreeNode {
    /// Unique node id.
    pub id: String,
    /// Component type.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Type-specific properties.
    #[serde(default)]
    pub props: Map<String, Value>,
    /// Child nodes, in order.
    #[serde(default)]
    pub children: Vec<FormTreeNode>,
}

/// Payload attached to a draggable item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragData {
    /// A new component dragged from the palette.
    SidebarItem {
        /// Name of the component type to create.
        #[serde(rename = "componentType")]
        component_type: String,
    },
    /// An existing node dragged on the canvas.
    CanvasItem {
        /// Id of the dragged node.
        id: String,
    },
}

/// End of a drag gesture.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DragEndEvent {
    /// What was dragged.
    pub active: DragData,
    /// Id of the hover target, or `None` when released over nothing.
    ///
    /// `"root"` and `"canvas-droppable"` name the canvas itself.
    #[serde(default)]
    pub over: Option<String>,
}

/// Editor action, as issued by the presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// A drag gesture ended.
    DragEnd(DragEndEvent),
    /// Change the selected node.
    Select {
        /// Node to select, or `None` to clear.
        #[serde(default)]
        id: Option<String>,
    },
    /// Remove a node and its subtree.
    Remove {
        /// Node to remove.
        id: String,
    },
    /// Merge properties into a node.
    Update {
        /// Node to update.
        id: String,
        /// Properties to overwrite.
        props: Map<String, Value>,
    },
    /// Merge entries into a node's style map.
    UpdateStyle {
        /// Node to update.
        id: String,
        /// Style entries to overwrite.
        style: Map<String, Value>,
    },
    /// Change a container's grid settings.
    SetGrid {
        /// Container to update.
        id: String,
        /// Column count.
        columns: u32,
        /// Gap between cells in pixels.
        gap: u32,
    },
    /// Set equal top and bottom padding.
    SetVerticalPadding {
        /// Node to update.
        id: String,
        /// Padding in pixels.
        px: u32,
    },
    /// Append an option to a select.
    AddSelectOption {
        /// Select node.
        id: String,
    },
    /// Append a new pane to a tabbed container.
    AddTab {
        /// Tabbed container.
        tabs: String,
    },
    /// Make a pane the visible one.
    ActivateTab {
        /// Tabbed container.
        tabs: String,
        /// Pane to show.
        pane: String,
    },
}

/// A starting tree plus actions to replay on it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Initial tree.
    #[serde(default)]
    pub tree: Vec<FormTreeNode>,
    /// Actions applied in order.
    #[serde(default)]
    pub actions: Vec<Action>,
}
