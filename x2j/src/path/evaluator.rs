use super::ast::{Axis, LocationPath, NodeTest, Predicate, Step};
use roxmltree::Node;

/// One member of a node-set.
///
/// roxmltree keeps attributes inside their owning element, so an attribute is
/// addressed through its owner and its position in the owner's attribute list.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a, 'input> {
    Node(Node<'a, 'input>),
    Attribute {
        owner: Node<'a, 'input>,
        index: usize,
        name: &'a str,
        value: &'a str,
    },
}

impl<'a, 'input> Item<'a, 'input> {
    /// XPath string-value of the item.
    pub fn string_value(&self) -> String {
        match self {
            Item::Node(node) => node_string_value(*node),
            Item::Attribute { value, .. } => (*value).to_string(),
        }
    }

    pub fn as_node(&self) -> Option<Node<'a, 'input>> {
        match self {
            Item::Node(node) => Some(*node),
            Item::Attribute { .. } => None,
        }
    }

    /// Sort key placing every item in document order.
    fn order_key(&self) -> (u32, usize) {
        match self {
            Item::Node(node) => (node.id().get(), 0),
            Item::Attribute { owner, index, .. } => (owner.id().get(), index + 1),
        }
    }
}

/// Concatenated text of a node and its descendants.
pub fn node_string_value(node: Node<'_, '_>) -> String {
    if node.is_text() || node.is_comment() {
        return node.text().unwrap_or_default().to_string();
    }
    if node.is_pi() {
        return node
            .pi()
            .and_then(|pi| pi.value)
            .unwrap_or_default()
            .to_string();
    }
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

pub struct Evaluator<'a, 'input> {
    context: Node<'a, 'input>,
}

impl<'a, 'input> Evaluator<'a, 'input> {
    pub fn new(context: Node<'a, 'input>) -> Self {
        Evaluator { context }
    }

    /// Evaluates a compiled path and returns the selected items in document order.
    pub fn evaluate(&self, path: &LocationPath) -> Vec<Item<'a, 'input>> {
        let start = if path.absolute {
            self.context.document().root()
        } else {
            self.context
        };

        let mut current = vec![Item::Node(start)];
        for step in &path.steps {
            let mut next = Vec::new();
            for item in &current {
                next.extend(self.evaluate_step(item, step));
            }
            current = document_order(next);
        }
        current
    }

    fn evaluate_step(&self, item: &Item<'a, 'input>, step: &Step) -> Vec<Item<'a, 'input>> {
        match item {
            Item::Node(node) => {
                if step.descendant {
                    node.descendants()
                        .flat_map(|base| self.apply_step(base, step))
                        .collect()
                } else {
                    self.apply_step(*node, step)
                }
            }
            // Attributes have no children; only `.` and `..` lead anywhere.
            Item::Attribute { owner, .. } => {
                let candidates = match step.axis {
                    Axis::SelfNode => vec![*item],
                    Axis::Parent => vec![Item::Node(*owner)],
                    Axis::Child | Axis::Attribute => Vec::new(),
                };
                apply_predicates(candidates, &step.predicates)
            }
        }
    }

    /// Selects the step's axis from a single base node, then filters by predicates.
    fn apply_step(&self, base: Node<'a, 'input>, step: &Step) -> Vec<Item<'a, 'input>> {
        let candidates: Vec<Item<'a, 'input>> = match step.axis {
            Axis::Child => base
                .children()
                .filter(|child| matches_node(*child, &step.test))
                .map(Item::Node)
                .collect(),
            Axis::Attribute => base
                .attributes()
                .enumerate()
                .filter(|(_, attr)| matches_attribute(attr.name(), &step.test))
                .map(|(index, attr)| Item::Attribute {
                    owner: base,
                    index,
                    name: attr.name(),
                    value: attr.value(),
                })
                .collect(),
            Axis::SelfNode => {
                if matches_self(base, &step.test) {
                    vec![Item::Node(base)]
                } else {
                    Vec::new()
                }
            }
            Axis::Parent => base
                .parent()
                .filter(|parent| matches_self(*parent, &step.test))
                .map(Item::Node)
                .into_iter()
                .collect(),
        };
        apply_predicates(candidates, &step.predicates)
    }
}

fn matches_node(node: Node<'_, '_>, test: &NodeTest) -> bool {
    match test {
        NodeTest::Name(name) => node.is_element() && node.tag_name().name() == name.as_str(),
        NodeTest::Wildcard => node.is_element(),
        NodeTest::Text => node.is_text(),
        NodeTest::AnyNode => true,
    }
}

/// `self::` and `parent::` also reach the document root, which `node()` accepts.
fn matches_self(node: Node<'_, '_>, test: &NodeTest) -> bool {
    match test {
        NodeTest::AnyNode => true,
        other => matches_node(node, other),
    }
}

fn matches_attribute(name: &str, test: &NodeTest) -> bool {
    match test {
        NodeTest::Name(expected) => name == expected.as_str(),
        NodeTest::Wildcard | NodeTest::AnyNode => true,
        NodeTest::Text => false,
    }
}

fn apply_predicates<'a, 'input>(
    mut items: Vec<Item<'a, 'input>>,
    predicates: &[Predicate],
) -> Vec<Item<'a, 'input>> {
    for predicate in predicates {
        let size = items.len();
        items = items
            .into_iter()
            .enumerate()
            .filter(|(index, item)| matches_predicate(item, predicate, index + 1, size))
            .map(|(_, item)| item)
            .collect();
    }
    items
}

fn matches_predicate(item: &Item<'_, '_>, predicate: &Predicate, position: usize, size: usize) -> bool {
    let node = item.as_node();
    match predicate {
        Predicate::Position(expected) => position == *expected,
        Predicate::Last => position == size,
        Predicate::SelfEquals(value) => item.string_value() == *value,
        Predicate::HasAttribute(name) => {
            node.is_some_and(|n| n.attributes().any(|a| a.name() == name.as_str()))
        }
        Predicate::AttributeEquals(name, value) => node.is_some_and(|n| {
            n.attributes()
                .any(|a| a.name() == name.as_str() && a.value() == value.as_str())
        }),
        Predicate::HasChild(name) => node.is_some_and(|n| child_elements(n, name).next().is_some()),
        Predicate::ChildEquals(name, value) => node.is_some_and(|n| {
            child_elements(n, name).any(|c| node_string_value(c) == *value)
        }),
        Predicate::TextEquals(value) => node.is_some_and(|n| {
            n.children()
                .any(|c| c.is_text() && c.text() == Some(value.as_str()))
        }),
    }
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn document_order<'a, 'input>(mut items: Vec<Item<'a, 'input>>) -> Vec<Item<'a, 'input>> {
    items.sort_by_key(|item| item.order_key());
    items.dedup_by_key(|item| item.order_key());
    items
}
