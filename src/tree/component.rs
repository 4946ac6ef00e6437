//! Component kinds, their default properties, and detached nodes.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use formcraft_ipc::{ComponentType, FormTreeNode};
use serde_json::{json, Map, Value};

use super::TreeError;

/// Kind of a component in the design tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    // Layout
    Container,
    Form,
    Tabs,
    TabPane,

    // Form controls
    Input,
    TextArea,
    Select,
    Checkbox,
    Button,

    // Display
    Text,
    Image,
    Header,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 12] = [
        ComponentKind::Container,
        ComponentKind::Form,
        ComponentKind::Tabs,
        ComponentKind::TabPane,
        ComponentKind::Input,
        ComponentKind::TextArea,
        ComponentKind::Select,
        ComponentKind::Checkbox,
        ComponentKind::Button,
        ComponentKind::Text,
        ComponentKind::Image,
        ComponentKind::Header,
    ];

    /// Name used in drag payloads and saved trees.
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Container => "container",
            ComponentKind::Form => "form",
            ComponentKind::Tabs => "tabs",
            ComponentKind::TabPane => "tab_item",
            ComponentKind::Input => "input",
            ComponentKind::TextArea => "textarea",
            ComponentKind::Select => "select",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::Button => "button",
            ComponentKind::Text => "text",
            ComponentKind::Image => "image",
            ComponentKind::Header => "header",
        }
    }

    /// Whether nodes of this kind may own children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentKind::Container
                | ComponentKind::Form
                | ComponentKind::Tabs
                | ComponentKind::TabPane
        )
    }

    /// Whether the children are tab panes with a single visible one.
    pub fn is_tabbed(self) -> bool {
        self == ComponentKind::Tabs
    }

    /// Whether the `columns` and `gap` grid settings apply.
    pub fn has_grid(self) -> bool {
        matches!(
            self,
            ComponentKind::Container | ComponentKind::Form | ComponentKind::TabPane
        )
    }

    /// Fresh copy of the properties a new node of this kind starts with.
    pub fn default_props(self) -> Props {
        match self {
            ComponentKind::Container => props([
                (
                    "style",
                    json!({
                        "padding": "20px",
                        "border": "1px dashed #cbd5e1",
                        "borderRadius": "8px",
                        "backgroundColor": "#ffffff",
                        "minHeight": "100px",
                    }),
                ),
                ("columns", json!(1)),
                ("gap", json!(16)),
            ]),
            ComponentKind::Form => props([
                ("label", json!("My Form")),
                (
                    "style",
                    json!({
                        "padding": "24px",
                        "border": "1px solid #e2e8f0",
                        "borderRadius": "8px",
                        "backgroundColor": "#ffffff",
                        "width": "100%",
                        "minHeight": "150px",
                    }),
                ),
                ("columns", json!(1)),
                ("gap", json!(16)),
            ]),
            ComponentKind::Tabs => props([(
                "style",
                json!({
                    "width": "100%",
                    "backgroundColor": "#ffffff",
                    "borderRadius": "8px",
                    "border": "1px solid #e2e8f0",
                }),
            )]),
            ComponentKind::TabPane => props([
                ("label", json!("Tab")),
                ("style", json!({ "padding": "20px", "minHeight": "100px" })),
                ("columns", json!(1)),
                ("gap", json!(16)),
            ]),
            ComponentKind::Input => props([
                ("label", json!("Text Input")),
                ("placeholder", json!("Enter text here...")),
                ("required", json!(false)),
            ]),
            ComponentKind::TextArea => props([
                ("label", json!("Text Area")),
                ("placeholder", json!("Enter long text here...")),
                ("required", json!(false)),
            ]),
            ComponentKind::Select => props([
                ("label", json!("Dropdown")),
                ("required", json!(false)),
                (
                    "options",
                    json!([
                        { "label": "Option 1", "value": "1" },
                        { "label": "Option 2", "value": "2" },
                        { "label": "Option 3", "value": "3" },
                    ]),
                ),
            ]),
            ComponentKind::Checkbox => props([
                ("label", json!("Checkbox")),
                ("required", json!(false)),
                ("content", json!("I agree to terms")),
            ]),
            ComponentKind::Button => props([
                ("content", json!("Submit")),
                ("buttonType", json!("submit")),
                (
                    "style",
                    json!({
                        "backgroundColor": "#3b82f6",
                        "color": "white",
                        "padding": "8px 16px",
                        "borderRadius": "4px",
                    }),
                ),
            ]),
            ComponentKind::Text => props([
                (
                    "content",
                    json!("This is a text block. You can edit this content."),
                ),
                ("style", json!({ "color": "#64748b", "fontSize": "14px" })),
            ]),
            ComponentKind::Header => props([
                ("content", json!("Form Header")),
                (
                    "style",
                    json!({ "fontSize": "24px", "fontWeight": "bold", "color": "#1e293b" }),
                ),
            ]),
            ComponentKind::Image => props([
                ("src", json!("https://picsum.photos/400/200")),
                ("alt", json!("Placeholder Image")),
                (
                    "style",
                    json!({
                        "borderRadius": "8px",
                        "width": "100%",
                        "height": "auto",
                        "objectFit": "cover",
                    }),
                ),
            ]),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TreeError::InvalidComponentType(s.to_owned()))
    }
}

impl From<ComponentKind> for ComponentType {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Container => ComponentType::Container,
            ComponentKind::Form => ComponentType::Form,
            ComponentKind::Tabs => ComponentType::Tabs,
            ComponentKind::TabPane => ComponentType::TabItem,
            ComponentKind::Input => ComponentType::Input,
            ComponentKind::TextArea => ComponentType::Textarea,
            ComponentKind::Select => ComponentType::Select,
            ComponentKind::Checkbox => ComponentType::Checkbox,
            ComponentKind::Button => ComponentType::Button,
            ComponentKind::Text => ComponentType::Text,
            ComponentKind::Image => ComponentType::Image,
            ComponentKind::Header => ComponentType::Header,
        }
    }
}

impl From<ComponentType> for ComponentKind {
    fn from(ty: ComponentType) -> Self {
        match ty {
            ComponentType::Container => ComponentKind::Container,
            ComponentType::Form => ComponentKind::Form,
            ComponentType::Tabs => ComponentKind::Tabs,
            ComponentType::TabItem => ComponentKind::TabPane,
            ComponentType::Input => ComponentKind::Input,
            ComponentType::Textarea => ComponentKind::TextArea,
            ComponentType::Select => ComponentKind::Select,
            ComponentType::Checkbox => ComponentKind::Checkbox,
            ComponentType::Button => ComponentKind::Button,
            ComponentType::Text => ComponentKind::Text,
            ComponentType::Image => ComponentKind::Image,
            ComponentType::Header => ComponentKind::Header,
        }
    }
}

fn props<const N: usize>(entries: [(&str, Value); N]) -> Props {
    Props(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect(),
    )
}

/// Unique, immutable node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Type-specific configuration of a node.
///
/// Any key may be stored. Keys outside a kind's default set are kept but not interpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(Map<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwrites every key present in `patch`, keeping the others.
    pub fn merge(&mut self, patch: Props) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Merges `patch` into the `style` map, creating it if needed.
    ///
    /// A non-object `style` value is replaced.
    pub fn merge_style(&mut self, patch: Map<String, Value>) {
        let style = self
            .0
            .entry("style")
            .or_insert_with(|| Value::Object(Map::new()));
        if !style.is_object() {
            *style = Value::Object(Map::new());
        }
        if let Value::Object(style) = style {
            style.extend(patch);
        }
    }

    pub fn style(&self) -> Option<&Map<String, Value>> {
        self.0.get("style").and_then(Value::as_object)
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get("label").and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(Value::as_str)
    }

    /// Column count, at least 1.
    pub fn columns(&self) -> u32 {
        self.0
            .get("columns")
            .and_then(Value::as_u64)
            .map_or(1, |columns| columns.clamp(1, u64::from(u32::MAX)) as u32)
    }

    pub fn gap(&self) -> u32 {
        self.0
            .get("gap")
            .and_then(Value::as_u64)
            .map_or(16, |gap| gap.min(u64::from(u32::MAX)) as u32)
    }

    pub fn options(&self) -> &[Value] {
        self.0
            .get("options")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A node that is not part of a tree: freshly created, or detached with its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: ComponentKind,
    pub props: Props,
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with default props and a caller-chosen id.
    ///
    /// Prefer [`IdGenerator::create_node`], which guarantees the id is fresh.
    pub fn with_id(id: impl Into<NodeId>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            props: kind.default_props(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Ids of this node and all its descendants, pre-order.
    pub fn ids(&self) -> Vec<&NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a NodeId>) {
        ids.push(&self.id);
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id.as_str() == id || self.children.iter().any(|child| child.contains(id))
    }

    pub fn to_ipc(&self) -> FormTreeNode {
        FormTreeNode {
            id: self.id.to_string(),
            component_type: self.kind.into(),
            props: self.props.as_map().clone(),
            children: self.children.iter().map(Node::to_ipc).collect(),
        }
    }

    pub fn from_ipc(node: FormTreeNode) -> Self {
        Self {
            id: NodeId::from(node.id),
            kind: node.component_type.into(),
            props: Props::from(node.props),
            children: node.children.into_iter().map(Node::from_ipc).collect(),
        }
    }
}

const ID_SUFFIX_LEN: usize = 9;

/// Issues node ids that are unique for the lifetime of the generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    rng: fastrand::Rng,
    issued: HashSet<NodeId>,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_rng(prefix, fastrand::Rng::new())
    }

    pub fn with_seed(prefix: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(prefix, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(prefix: impl Into<String>, rng: fastrand::Rng) -> Self {
        Self {
            prefix: prefix.into(),
            rng,
            issued: HashSet::new(),
        }
    }

    pub fn next_id(&mut self) -> NodeId {
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN).map(|_| self.rng.digit(36)).collect();
            let id = NodeId(format!("{}_{suffix}", self.prefix));
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Marks an id that came from elsewhere (e.g. a loaded snapshot) as taken.
    pub fn reserve(&mut self, id: &NodeId) {
        self.issued.insert(id.clone());
    }

    /// Creates a node of `kind` with a fresh id, default props and no children.
    pub fn create_node(&mut self, kind: ComponentKind) -> Node {
        Node {
            id: self.next_id(),
            kind,
            props: kind.default_props(),
            children: Vec::new(),
        }
    }

    /// Like [`Self::create_node`], for a kind given by its wire name.
    pub fn create_named(&mut self, name: &str) -> Result<Node, TreeError> {
        let kind = name.parse::<ComponentKind>()?;
        Ok(self.create_node(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.name().parse::<ComponentKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            "carousel".parse::<ComponentKind>(),
            Err(TreeError::InvalidComponentType(String::from("carousel")))
        );

        let mut ids = IdGenerator::with_seed("node", 1);
        assert!(matches!(
            ids.create_named("Input"),
            Err(TreeError::InvalidComponentType(_))
        ));
    }

    #[test]
    fn only_layout_kinds_are_containers() {
        let containers: Vec<_> = ComponentKind::ALL
            .into_iter()
            .filter(|kind| kind.is_container())
            .collect();
        assert_eq!(
            containers,
            [
                ComponentKind::Container,
                ComponentKind::Form,
                ComponentKind::Tabs,
                ComponentKind::TabPane
            ]
        );
        assert!(ComponentKind::Tabs.is_tabbed());
        assert!(!ComponentKind::Tabs.has_grid());
    }

    #[test]
    fn form_defaults() {
        let props = ComponentKind::Form.default_props();
        assert_eq!(props.label(), Some("My Form"));
        assert_eq!(props.columns(), 1);
        assert_eq!(props.gap(), 16);
    }

    #[test]
    fn created_nodes_do_not_share_props() {
        let mut ids = IdGenerator::with_seed("node", 3);
        let mut a = ids.create_node(ComponentKind::Select);
        let b = ids.create_node(ComponentKind::Select);

        a.props.set("label", "Country");
        a.props.merge_style(Map::from_iter([(
            String::from("color"),
            json!("red"),
        )]));

        assert_eq!(b.props, ComponentKind::Select.default_props());
        assert_eq!(ComponentKind::Select.default_props().label(), Some("Dropdown"));
        assert!(b.children.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn ids_are_unique_and_prefixed() {
        let mut ids = IdGenerator::with_seed("node", 42);
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!(id.as_str().starts_with("node_"));
            assert_eq!(id.as_str().len(), "node_".len() + ID_SUFFIX_LEN);
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn merge_is_shallow() {
        let mut props = ComponentKind::Input.default_props();
        props.merge(Props::from_iter([("label", json!("Email")), ("custom", json!(3))]));

        assert_eq!(props.label(), Some("Email"));
        assert_eq!(props.get("placeholder"), Some(&json!("Enter text here...")));
        assert_eq!(props.get("custom"), Some(&json!(3)));
    }

    #[test]
    fn merge_style_keeps_other_entries() {
        let mut props = ComponentKind::Header.default_props();
        props.merge_style(Map::from_iter([(String::from("color"), json!("#ef4444"))]));

        let style = props.style().unwrap();
        assert_eq!(style.get("color"), Some(&json!("#ef4444")));
        assert_eq!(style.get("fontSize"), Some(&json!("24px")));
    }
}
