//! Location path parser.
//!
//! Accepts the abbreviated XPath 1.0 location-path syntax:
//!
//! - `/A/B`, `B/C`, `//C`, `/` - absolute, relative and descendant paths
//! - `.`, `..`, `*`, `text()`, `node()` - step shortcuts
//! - `@name`, `@*` - attribute steps
//! - `child::`, `attribute::`, `self::`, `parent::` - explicit axes
//! - `[n]`, `[last()]`, `[@a]`, `[@a='v']`, `[b]`, `[b='v']`, `[text()='v']`, `[.='v']`

use super::ast::{Axis, LocationPath, NodeTest, Predicate, Step};
use super::error::PathError;

/// Parser for location path strings.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given path string.
    pub fn new(path: &str) -> Self {
        Self {
            input: path.chars().collect(),
            position: 0,
        }
    }

    /// Parses the path string into a LocationPath.
    pub fn parse(path: &str) -> Result<LocationPath, PathError> {
        let mut parser = Parser::new(path);
        let parsed = parser.parse_path()?;
        parser.skip_whitespace();
        if let Some(ch) = parser.peek() {
            return Err(PathError::UnexpectedToken {
                position: parser.position,
                found: ch.to_string(),
                expected: "end of path".to_string(),
            });
        }
        Ok(parsed)
    }

    fn parse_path(&mut self) -> Result<LocationPath, PathError> {
        self.skip_whitespace();
        if self.is_eof() {
            return Err(PathError::UnexpectedEnd {
                expected: "location path".to_string(),
            });
        }

        let mut absolute = false;
        let mut descendant = false;
        if self.starts_with("//") {
            self.position += 2;
            absolute = true;
            descendant = true;
        } else if self.peek() == Some('/') {
            self.next();
            absolute = true;
            self.skip_whitespace();
            // A lone "/" selects the document root
            if self.is_eof() {
                return Ok(LocationPath::new(true, Vec::new()));
            }
        }

        let mut steps = Vec::new();
        loop {
            let mut step = self.parse_step()?;
            step.descendant = descendant;
            steps.push(step);

            self.skip_whitespace();
            if self.starts_with("//") {
                self.position += 2;
                descendant = true;
            } else if self.peek() == Some('/') {
                self.next();
                descendant = false;
            } else {
                break;
            }
        }

        Ok(LocationPath::new(absolute, steps))
    }

    fn parse_step(&mut self) -> Result<Step, PathError> {
        self.skip_whitespace();
        let mut step = match self.peek() {
            None => {
                return Err(PathError::UnexpectedEnd {
                    expected: "location step".to_string(),
                })
            }
            Some('.') => {
                self.next();
                if self.peek() == Some('.') {
                    self.next();
                    Step::new(Axis::Parent, NodeTest::AnyNode)
                } else {
                    Step::new(Axis::SelfNode, NodeTest::AnyNode)
                }
            }
            Some('@') => {
                self.next();
                Step::new(Axis::Attribute, self.parse_node_test()?)
            }
            Some(_) => {
                let axis = self.parse_axis()?;
                Step::new(axis, self.parse_node_test()?)
            }
        };

        loop {
            self.skip_whitespace();
            if self.peek() != Some('[') {
                break;
            }
            step.predicates.push(self.parse_predicate()?);
        }

        Ok(step)
    }

    /// Parses an optional `axis::` prefix, defaulting to the child axis.
    fn parse_axis(&mut self) -> Result<Axis, PathError> {
        let saved = self.position;
        if let Some(name) = self.try_name() {
            if self.starts_with("::") {
                self.position += 2;
                return match name.as_str() {
                    "child" => Ok(Axis::Child),
                    "attribute" => Ok(Axis::Attribute),
                    "self" => Ok(Axis::SelfNode),
                    "parent" => Ok(Axis::Parent),
                    other => Err(PathError::InvalidSyntax {
                        message: format!("unsupported axis '{other}'"),
                    }),
                };
            }
        }
        self.position = saved;
        Ok(Axis::Child)
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, PathError> {
        if self.peek() == Some('*') {
            self.next();
            return Ok(NodeTest::Wildcard);
        }
        let position = self.position;
        let name = self.parse_name()?;
        if self.starts_with("()") {
            self.position += 2;
            return match name.as_str() {
                "text" => Ok(NodeTest::Text),
                "node" => Ok(NodeTest::AnyNode),
                other => Err(PathError::UnexpectedToken {
                    position,
                    found: format!("{other}()"),
                    expected: "text() or node()".to_string(),
                }),
            };
        }
        Ok(NodeTest::Name(local_name(&name).to_string()))
    }

    fn parse_predicate(&mut self) -> Result<Predicate, PathError> {
        self.expect('[')?;
        self.skip_whitespace();

        let predicate = match self.peek() {
            Some(ch) if ch.is_ascii_digit() => {
                let position = self.position;
                let digits = self.take_while(|c| c.is_ascii_digit());
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| PathError::UnexpectedToken {
                        position,
                        found: digits.clone(),
                        expected: "position index".to_string(),
                    })?;
                Predicate::Position(index)
            }
            Some('@') => {
                self.next();
                let name = local_name(&self.parse_name()?).to_string();
                match self.parse_comparison()? {
                    Some(value) => Predicate::AttributeEquals(name, value),
                    None => Predicate::HasAttribute(name),
                }
            }
            Some('.') => {
                self.next();
                match self.parse_comparison()? {
                    Some(value) => Predicate::SelfEquals(value),
                    None => {
                        return Err(PathError::InvalidSyntax {
                            message: "'.' predicate needs a comparison".to_string(),
                        })
                    }
                }
            }
            Some(_) => {
                let position = self.position;
                let name = self.parse_name()?;
                if self.starts_with("()") {
                    self.position += 2;
                    match name.as_str() {
                        "last" => Predicate::Last,
                        "text" => match self.parse_comparison()? {
                            Some(value) => Predicate::TextEquals(value),
                            None => {
                                return Err(PathError::InvalidSyntax {
                                    message: "text() predicate needs a comparison".to_string(),
                                })
                            }
                        },
                        other => {
                            return Err(PathError::UnexpectedToken {
                                position,
                                found: format!("{other}()"),
                                expected: "last() or text()".to_string(),
                            })
                        }
                    }
                } else {
                    let name = local_name(&name).to_string();
                    match self.parse_comparison()? {
                        Some(value) => Predicate::ChildEquals(name, value),
                        None => Predicate::HasChild(name),
                    }
                }
            }
            None => {
                return Err(PathError::UnexpectedEnd {
                    expected: "predicate".to_string(),
                })
            }
        };

        self.expect(']')?;
        Ok(predicate)
    }

    /// Parses `= literal` if present.
    fn parse_comparison(&mut self) -> Result<Option<String>, PathError> {
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok(None);
        }
        self.next();
        self.skip_whitespace();
        self.parse_literal().map(Some)
    }

    /// Parses a quoted string or a bare numeric literal.
    fn parse_literal(&mut self) -> Result<String, PathError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.next();
                let value = self.take_while(|c| c != quote);
                if self.next() != Some(quote) {
                    return Err(PathError::UnexpectedEnd {
                        expected: format!("closing {quote}"),
                    });
                }
                Ok(value)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '.' => {
                Ok(self.take_while(|c| c.is_ascii_digit() || c == '-' || c == '.'))
            }
            Some(ch) => Err(PathError::UnexpectedToken {
                position: self.position,
                found: ch.to_string(),
                expected: "string or number literal".to_string(),
            }),
            None => Err(PathError::UnexpectedEnd {
                expected: "literal".to_string(),
            }),
        }
    }

    fn parse_name(&mut self) -> Result<String, PathError> {
        match self.try_name() {
            Some(name) => Ok(name),
            None => match self.peek() {
                Some(ch) => Err(PathError::UnexpectedToken {
                    position: self.position,
                    found: ch.to_string(),
                    expected: "name".to_string(),
                }),
                None => Err(PathError::UnexpectedEnd {
                    expected: "name".to_string(),
                }),
            },
        }
    }

    /// Reads a (possibly prefixed) XML name. A `::` axis separator is not part of it.
    fn try_name(&mut self) -> Option<String> {
        let first = self.peek()?;
        if !(first.is_alphabetic() || first == '_') {
            return None;
        }
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            let is_prefix_colon = ch == ':' && !self.starts_with("::");
            if ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.' || is_prefix_colon {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        Some(name)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn starts_with(&self, token: &str) -> bool {
        let mut offset = self.position;
        for expected in token.chars() {
            if self.input.get(offset) != Some(&expected) {
                return false;
            }
            offset += 1;
        }
        true
    }

    fn take_while(&mut self, mut keep: impl FnMut(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(ch) = self.peek() {
            if !keep(ch) {
                break;
            }
            taken.push(ch);
            self.next();
        }
        taken
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), PathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(PathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(PathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(name: &str) -> Step {
        Step::new(Axis::Child, NodeTest::Name(name.to_string()))
    }

    #[test]
    fn parses_absolute_path() {
        let path = Parser::parse("/A/B").unwrap();
        assert!(path.absolute);
        assert_eq!(path.steps, vec![child("A"), child("B")]);
    }

    #[test]
    fn parses_relative_path_with_attribute() {
        let path = Parser::parse("Item/@id").unwrap();
        assert!(!path.absolute);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(
            path.steps[1],
            Step::new(Axis::Attribute, NodeTest::Name("id".to_string()))
        );
        assert!(path.targets_attribute());
    }

    #[test]
    fn parses_root_only() {
        let path = Parser::parse("/").unwrap();
        assert!(path.absolute);
        assert!(path.steps.is_empty());
    }

    #[test]
    fn parses_descendant_steps() {
        let path = Parser::parse("//Line//Item").unwrap();
        assert!(path.absolute);
        assert!(path.steps[0].descendant);
        assert!(path.steps[1].descendant);
    }

    #[test]
    fn parses_predicates() {
        let path = Parser::parse("/A/Item[2][@type='x']/B[last()]").unwrap();
        assert_eq!(
            path.steps[1].predicates,
            vec![
                Predicate::Position(2),
                Predicate::AttributeEquals("type".to_string(), "x".to_string()),
            ]
        );
        assert_eq!(path.steps[2].predicates, vec![Predicate::Last]);
    }

    #[test]
    fn parses_child_and_text_predicates() {
        let path = Parser::parse("/A[B=\"1\"]/C[text()='z'][D]").unwrap();
        assert_eq!(
            path.steps[0].predicates,
            vec![Predicate::ChildEquals("B".to_string(), "1".to_string())]
        );
        assert_eq!(
            path.steps[1].predicates,
            vec![
                Predicate::TextEquals("z".to_string()),
                Predicate::HasChild("D".to_string())
            ]
        );
    }

    #[test]
    fn parses_explicit_axes_and_kind_tests() {
        let path = Parser::parse("child::A/attribute::b").unwrap();
        assert_eq!(path.steps[0].axis, Axis::Child);
        assert_eq!(path.steps[1].axis, Axis::Attribute);

        let path = Parser::parse("A/text()").unwrap();
        assert_eq!(path.steps[1].test, NodeTest::Text);

        let path = Parser::parse("../*").unwrap();
        assert_eq!(path.steps[0].axis, Axis::Parent);
        assert_eq!(path.steps[1].test, NodeTest::Wildcard);
    }

    #[test]
    fn prefixed_names_match_by_local_name() {
        let path = Parser::parse("/ns:A/@xlink:href").unwrap();
        assert_eq!(path.steps[0].test, NodeTest::Name("A".to_string()));
        assert_eq!(path.steps[1].test, NodeTest::Name("href".to_string()));
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(Parser::parse("").is_err());
        assert!(Parser::parse("/A/").is_err());
        assert!(Parser::parse("/MyShipments/Shipment/#@Shipment_Key").is_err());
        assert!(Parser::parse("/A[1").is_err());
        assert!(Parser::parse("/A[@b='x]").is_err());
        assert!(Parser::parse("/A/count()").is_err());
        assert!(Parser::parse("following::A").is_err());
    }

    #[test]
    fn error_reports_position() {
        let err = Parser::parse("/A/#").unwrap_err();
        assert_eq!(
            err,
            PathError::UnexpectedToken {
                position: 3,
                found: "#".to_string(),
                expected: "name".to_string(),
            }
        );
    }
}
