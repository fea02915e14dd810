//! Abstract syntax tree types for location paths.

/// Direction a step moves from its context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `name`, `*`, `text()`
    Child,
    /// `@name`, `@*`
    Attribute,
    /// `.`
    SelfNode,
    /// `..`
    Parent,
}

/// Which nodes on the axis a step keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Local name match (prefixes are ignored)
    Name(String),
    /// `*`: any element (or any attribute on the attribute axis)
    Wildcard,
    /// `text()`
    Text,
    /// `node()`
    AnyNode,
}

/// Filter applied to the nodes selected by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]` (1-based)
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name]`
    HasAttribute(String),
    /// `[@name='value']`
    AttributeEquals(String, String),
    /// `[child]`
    HasChild(String),
    /// `[child='value']`
    ChildEquals(String, String),
    /// `[text()='value']`
    TextEquals(String),
    /// `[.='value']`
    SelfEquals(String),
}

/// A single location step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
    /// Preceded by `//`: the step applies to every descendant-or-self of the context.
    pub descendant: bool,
}

impl Step {
    pub fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: Vec::new(),
            descendant: false,
        }
    }
}

/// A compiled location path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    /// Starts at the document root rather than the context node.
    pub absolute: bool,
    pub steps: Vec<Step>,
}

impl LocationPath {
    pub fn new(absolute: bool, steps: Vec<Step>) -> Self {
        Self { absolute, steps }
    }

    /// True when the final step selects attributes.
    pub fn targets_attribute(&self) -> bool {
        self.steps
            .last()
            .is_some_and(|step| step.axis == Axis::Attribute)
    }

    /// True when the final step selects attributes or text nodes rather than elements.
    pub fn targets_value(&self) -> bool {
        self.targets_attribute()
            || self
                .steps
                .last()
                .is_some_and(|step| step.axis == Axis::Child && step.test == NodeTest::Text)
    }
}
