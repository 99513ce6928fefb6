//! Tree operations over JSON documents.
//!
//! Field names (id, parent id, children) come from [`Settings`]; payloads are
//! arbitrary JSON objects and pass through every operation untouched.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, ResultExt};
use crate::config::Settings;
use crate::domain::{
    self, BuildOptions, DropIntent, ExpandedState, Field, FlatRow, FlattenOptions, Node,
    TreeArena, TreeBuilder,
};

/// A JSON tree: object payloads, ids selected by a configured field.
pub type JsonTree = Vec<Node<Value>>;

/// Entry point for the command line; one instance per loaded configuration.
#[derive(Debug, Clone)]
pub struct TreeService {
    settings: Settings,
    id: Field,
    parent_id: Field,
}

/// How [`TreeService::flatten`] treats collapsed nodes.
#[derive(Debug, Clone, Default)]
pub struct FlattenRequest {
    /// Ids whose children are hidden
    pub collapsed: Vec<String>,
    /// Ignore `collapsed` and emit every node
    pub all: bool,
    /// Id of the node being dragged, marks its descendants
    pub drag_root: Option<String>,
}

impl TreeService {
    pub fn new(settings: Settings) -> Self {
        let id = Field::new(settings.id_field.clone());
        let parent_id = Field::new(settings.parent_field.clone());
        Self {
            settings,
            id,
            parent_id,
        }
    }

    /// Read a JSON document from a file, or from stdin when `path` is `-`.
    #[instrument(level = "debug", skip(self))]
    pub fn read_document(&self, path: &Path) -> ApplicationResult<Value> {
        let content = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .with_path_context("read document", path)?;
            buf
        } else {
            std::fs::read_to_string(path).with_path_context("read document", path)?
        };
        serde_json::from_str(&content).with_path_context("parse document", path)
    }

    /// Write a JSON document, pretty printed.
    pub fn write_document(&self, path: &Path, value: &Value) -> ApplicationResult<()> {
        let rendered = self.render(value)?;
        std::fs::write(path, rendered + "\n").with_path_context("write document", path)
    }

    pub fn render(&self, value: &Value) -> ApplicationResult<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Flat records: a JSON array of objects.
    pub fn records_from_value(&self, value: Value) -> ApplicationResult<Vec<Value>> {
        match value {
            Value::Array(items) => {
                if let Some(position) = items.iter().position(|item| !item.is_object()) {
                    return Err(invalid(format!("record at position {position} is not an object")));
                }
                Ok(items)
            }
            other => Err(invalid(format!(
                "expected an array of records, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Nested tree: a JSON array of objects with optional children arrays.
    pub fn tree_from_value(&self, value: Value) -> ApplicationResult<JsonTree> {
        match value {
            Value::Array(items) => items.into_iter().map(|item| self.node_from_value(item)).collect(),
            other => Err(invalid(format!(
                "expected an array of root nodes, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn node_from_value(&self, value: Value) -> ApplicationResult<Node<Value>> {
        let Value::Object(mut fields) = value else {
            return Err(invalid(format!("expected a node object, found {}", kind_of(&value))));
        };
        let children = match fields.remove(&self.settings.children_field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(children)) => children
                .into_iter()
                .map(|child| self.node_from_value(child))
                .collect::<ApplicationResult<_>>()?,
            Some(other) => {
                return Err(invalid(format!(
                    "'{}' must be an array, found {}",
                    self.settings.children_field,
                    kind_of(&other)
                )))
            }
        };
        Ok(Node::with_children(Value::Object(fields), children))
    }

    /// Inverse of [`tree_from_value`](Self::tree_from_value); leaves get no children field.
    pub fn tree_to_value(&self, roots: &[Node<Value>]) -> Value {
        Value::Array(roots.iter().map(|node| self.node_to_value(node)).collect())
    }

    fn node_to_value(&self, node: &Node<Value>) -> Value {
        let mut fields = match &node.data {
            Value::Object(fields) => fields.clone(),
            other => {
                let mut fields = Map::new();
                fields.insert("value".into(), other.clone());
                fields
            }
        };
        if !node.children.is_empty() {
            fields.insert(
                self.settings.children_field.clone(),
                self.tree_to_value(&node.children),
            );
        }
        Value::Object(fields)
    }

    /// Split a command-line path like `1/1-1` into ids.
    pub fn parse_path(&self, raw: &str) -> Vec<String> {
        raw.split(self.settings.path_separator.as_str())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn format_path(&self, ids: &[String]) -> String {
        ids.join(&self.settings.path_separator)
    }

    /// Nest flat records; `strict` adds to (never relaxes) the configured strictness.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: &[Value], strict: bool) -> ApplicationResult<JsonTree> {
        let options = BuildOptions {
            throw_on_invalid_tree: strict || self.settings.strict,
        };
        let roots = TreeBuilder::new(&self.id, &self.parent_id)
            .with_options(options)
            .build(records)?;
        info!(roots = roots.len(), nodes = domain::count_nodes(&roots), "built tree");
        Ok(roots)
    }

    /// Id where the parent links of `records` loop, if anywhere.
    pub fn find_cycle(&self, records: &[Value]) -> Option<String> {
        domain::find_cycle(records, &self.id, &self.parent_id)
    }

    pub fn flatten<'a>(
        &self,
        roots: &'a [Node<Value>],
        request: &FlattenRequest,
    ) -> ApplicationResult<Vec<FlatRow<'a, Value, String>>> {
        let state: ExpandedState<String> = request
            .collapsed
            .iter()
            .map(|id| (id.clone(), false))
            .collect();
        let options = FlattenOptions {
            expanded: (!request.all).then_some(&state),
            drag_root: request.drag_root.clone(),
        };
        Ok(domain::flatten_with(roots, &self.id, &options)?)
    }

    /// Apply one drag gesture and return the new tree.
    #[instrument(level = "debug", skip(self, roots))]
    pub fn apply_drop(
        &self,
        roots: &[Node<Value>],
        dragged: &[String],
        intent: &DropIntent<String>,
    ) -> ApplicationResult<JsonTree> {
        let updated = domain::apply_drop(roots, &self.id, dragged, intent)?;
        if updated == roots {
            debug!("drop left the tree unchanged");
        }
        Ok(updated)
    }

    /// Load a tree into an arena for inspection.
    pub fn arena(&self, roots: &[Node<Value>]) -> ApplicationResult<TreeArena<Value, String>> {
        Ok(TreeArena::from_nodes(roots, &self.id)?)
    }

    /// Display label: the id, followed by the first other string field.
    pub fn label(&self, id: &str, data: &Value) -> String {
        let extra = data.as_object().and_then(|fields| {
            fields
                .iter()
                .filter(|(name, _)| {
                    **name != self.settings.id_field && **name != self.settings.parent_field
                })
                .find_map(|(_, value)| value.as_str())
        });
        match extra {
            Some(text) => format!("{id} {text}"),
            None => id.to_string(),
        }
    }
}

fn invalid(message: String) -> ApplicationError {
    ApplicationError::InvalidDocument { message }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
