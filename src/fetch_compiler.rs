//! Fetch compiler that serializes the entity tree into a query document.
//!
//! The document is a `<fetch>` element wrapping the root `<entity>`; related entities
//! become inner-joined `<link-entity>` blocks. Each criterion becomes its own
//! `<filter type="or">` holding the conditions it produces.

use crate::criterion::{scalar_literal, Criterion, CriterionValue};
use crate::entity::{EntityDescriptor, EntityId, EntityTree};
use crate::search_event::Operator;
use crate::xml::Element;
use std::fmt;
use tracing::{debug, info};

/// Join type of every link-entity. There is no outer-join mode.
pub const LINK_TYPE: &str = "inner";

/// The compiled query document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDocument {
    pub root: Element,
    /// Names of direct children left out because their whole branch was empty.
    pub pruned: Vec<String>,
}

impl FetchDocument {
    /// The root `<entity>` element.
    pub fn entity(&self) -> Option<&Element> {
        self.root.children_named("entity").next()
    }

    /// Finds a link-entity anywhere in the document by alias.
    pub fn find_link(&self, alias: &str) -> Option<&Element> {
        fn walk<'a>(element: &'a Element, alias: &str) -> Option<&'a Element> {
            for link in element.children_named("link-entity") {
                if link.get_attr("alias") == Some(alias) {
                    return Some(link);
                }
                if let Some(found) = walk(link, alias) {
                    return Some(found);
                }
            }
            None
        }
        self.entity().and_then(|entity| walk(entity, alias))
    }

    pub fn to_pretty_string(&self) -> String {
        self.root.to_pretty_string()
    }
}

impl fmt::Display for FetchDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Compiles an [`EntityTree`] into a [`FetchDocument`]. Reads the tree only.
pub struct FetchCompiler<'a> {
    tree: &'a EntityTree,
}

impl<'a> FetchCompiler<'a> {
    pub fn new(tree: &'a EntityTree) -> Self {
        Self { tree }
    }

    /// Compile the current tree state
    pub fn compile(&self, include_root_identifier: bool) -> FetchDocument {
        let mut pruned = Vec::new();
        let root = self.tree.root();

        let mut entity = Element::new("entity").attr("name", root.name.clone());
        let row_identifier = self.tree.row_identifier();
        if include_root_identifier {
            entity.push(attribute(row_identifier));
        }
        for field in &root.output_fields {
            // Already forced in first.
            if include_root_identifier && field == row_identifier {
                continue;
            }
            entity.push(attribute(field));
        }
        compile_criteria(root, &mut entity);

        for child in &root.children {
            // Only direct children are pruned; see compile_link for grandchildren.
            if !self.tree.has_content(*child) {
                debug!(entity = %self.tree.get(*child).name, "empty branch pruned");
                pruned.push(self.tree.get(*child).name.clone());
                continue;
            }
            entity.push(self.compile_link(*child));
        }

        let fetch = Element::new("fetch")
            .attr("version", "1.0")
            .attr("output-format", "xml-platform")
            .attr("mapping", "logical")
            .child(entity);

        info!(
            criteria = self.tree.criteria_count(),
            pruned = pruned.len(),
            include_root_identifier,
            "compiled fetch document"
        );

        FetchDocument { root: fetch, pruned }
    }

    /// Emit a link-entity and everything below it.
    ///
    /// Once a direct child passes the pruning test its own children are always emitted,
    /// even when they are empty themselves.
    fn compile_link(&self, id: EntityId) -> Element {
        let node = self.tree.get(id);
        let mut link = Element::new("link-entity")
            .attr("name", node.link_name.clone())
            .attr("from", node.join_from.clone())
            .attr("to", node.join_to.clone())
            .attr("alias", node.alias.clone())
            .attr("link-type", LINK_TYPE);

        for field in &node.output_fields {
            link.push(attribute(field));
        }
        compile_criteria(node, &mut link);
        for child in &node.children {
            link.push(self.compile_link(*child));
        }
        link
    }
}

/// One filter per productive criterion.
fn compile_criteria(node: &EntityDescriptor, parent: &mut Element) {
    for criterion in node.criteria.values() {
        if let Some(filter) = compile_filter(criterion) {
            parent.push(filter);
        }
    }
}

fn attribute(name: &str) -> Element {
    Element::new("attribute").attr("name", name)
}

/// Wraps a criterion's conditions in a disjunctive filter, `None` if it produces nothing.
pub fn compile_filter(criterion: &Criterion) -> Option<Element> {
    let conditions = compile_conditions(criterion);
    if conditions.is_empty() {
        return None;
    }
    let mut filter = Element::new("filter").attr("type", "or");
    for condition in conditions {
        filter.push(condition);
    }
    Some(filter)
}

/// Serialize a single criterion by data kind and operator
pub fn compile_conditions(criterion: &Criterion) -> Vec<Element> {
    let field = criterion.field_name.as_str();
    let op = criterion.operator;

    match (&criterion.value, op) {
        (
            CriterionValue::Text(raw) | CriterionValue::Lookup(raw),
            Operator::Equal | Operator::BeginsWith | Operator::EndsWith,
        ) => vec![condition(field, op).attr("value", raw.clone())],

        (CriterionValue::Text(raw) | CriterionValue::Lookup(raw), Operator::Contains) => raw
            .split(',')
            .map(|token| condition(field, op).attr("value", format!("%{}%", token)))
            .collect(),

        (
            CriterionValue::Text(_)
            | CriterionValue::Lookup(_)
            | CriterionValue::Date(_)
            | CriterionValue::Number(_),
            Operator::Null | Operator::NotNull,
        ) => vec![condition(field, op)],

        // A stale two-date between value may still be present; only the first date counts.
        (CriterionValue::Date(raw), Operator::Equal) => {
            let first = raw.split(' ').next().unwrap_or_default();
            vec![condition(field, op).attr("value", first)]
        }

        (CriterionValue::Date(raw), Operator::Between) => {
            let tokens: Vec<&str> = raw.split(' ').collect();
            if tokens.len() != 2 {
                return Vec::new();
            }
            vec![with_values(condition(field, op), tokens.into_iter().map(str::to_string))]
        }

        (CriterionValue::Number(Some(range)), Operator::Equal) => {
            vec![condition(field, op).attr("value", scalar_literal(range.number1.as_ref()))]
        }

        (CriterionValue::Number(Some(range)), Operator::Between) => {
            let values = [
                scalar_literal(range.number1.as_ref()),
                scalar_literal(range.number2.as_ref()),
            ];
            vec![with_values(condition(field, op), values)]
        }

        (CriterionValue::OptionSet(Some(entries)), Operator::In | Operator::NotIn) => {
            let values = entries.iter().map(|entry| scalar_literal(Some(&entry.value)));
            vec![with_values(condition(field, op), values)]
        }

        // The operator of a checkbox is ignored, it is always an `in` over the ticked keys.
        // With nothing ticked the `in` is still emitted, with no values.
        (CriterionValue::Checkbox(flags), _) => {
            let values = flags.selected_keys().into_iter().map(str::to_string);
            vec![with_values(condition(field, Operator::In), values)]
        }

        // NotEqual / NotIn on text and lookups, and anything else not listed above.
        _ => Vec::new(),
    }
}

fn condition(field: &str, op: Operator) -> Element {
    Element::new("condition")
        .attr("attribute", field)
        .attr("operator", op.wire_token())
}

fn with_values(mut condition: Element, values: impl IntoIterator<Item = String>) -> Element {
    for value in values {
        condition.push(Element::new("value").text(value));
    }
    condition
}
