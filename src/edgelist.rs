//! Parsing of textual edge lists.
//!
//! The accepted syntax is the literal form clients already send: an outer
//! list or tuple holding two-element lists or tuples, e.g. `[(0, 1), (1, 2)]`
//! or `[["a", "b"]]`, or an outer set of tuples such as `{(0, 1), (1, 2)}`.
//! Node ids are integers or quoted strings.

use std::fmt::{Display, Formatter};
use crate::errors::EdgeListError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl NodeId {
    fn kind(&self) -> &'static str {
        match self {
            NodeId::Int(_) => "int",
            NodeId::Str(_) => "str",
        }
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Int(i) => write!(f, "{}", i),
            NodeId::Str(s) => write!(f, "{:?}", s),
        }
    }
}

pub type Edge = (NodeId, NodeId);

pub fn parse_edge_list(text: &str) -> Result<Vec<Edge>, EdgeListError> {
    let mut parser = Parser { text, pos: 0 };
    let edges = parser.parse_sequence()?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    check_node_kinds(&edges)?;
    Ok(edges)
}

// Node ids are sorted later on, so they have to share a single kind.
fn check_node_kinds(edges: &[Edge]) -> Result<(), EdgeListError> {
    let mut nodes = edges.iter().flat_map(|(u, v)| [u, v]);
    if let Some(first) = nodes.next() {
        if let Some(other) = nodes.find(|n| n.kind() != first.kind()) {
            return Err(EdgeListError::MalformedInput {
                reason: format!(
                    "cannot order node ids of different kinds ({} and {})",
                    first.kind(), other.kind()
                )
            });
        }
    }
    Ok(())
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> EdgeListError {
        EdgeListError::MalformedInput {
            reason: format!("{} at position {}", message, self.pos)
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn open_bracket(&mut self) -> Result<char, EdgeListError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => { self.bump(); Ok(']') }
            Some('(') => { self.bump(); Ok(')') }
            Some(_) => Err(self.error("expected '[' or '('")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parses comma separated items up to `close`, allowing a trailing comma.
    fn parse_items<T>(&mut self,
                      close: char,
                      mut item: impl FnMut(&mut Self) -> Result<T, EdgeListError>)
        -> Result<Vec<T>, EdgeListError>
    {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(item(self)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => { self.bump(); }
                Some(c) if c == close => {}
                Some(_) => return Err(self.error(&format!("expected ',' or '{}'", close))),
                None => return Err(self.error("unexpected end of input")),
            }
        }
    }

    fn parse_sequence(&mut self) -> Result<Vec<Edge>, EdgeListError> {
        self.skip_whitespace();
        if self.peek() == Some('{') {
            self.bump();
            // Set members are hashable, so lists cannot appear inside braces.
            return self.parse_items('}', |p| {
                p.skip_whitespace();
                if p.peek() != Some('(') {
                    return Err(p.error("expected '(' inside a set"));
                }
                p.parse_pair()
            });
        }
        let close = self.open_bracket()?;
        self.parse_items(close, |p| p.parse_pair())
    }

    fn parse_pair(&mut self) -> Result<Edge, EdgeListError> {
        let start = self.pos;
        let close = self.open_bracket()?;
        let ends: [NodeId; 2] = self.parse_items(close, |p| p.parse_node())?
            .try_into()
            .map_err(|ends: Vec<NodeId>| EdgeListError::MalformedInput {
                reason: format!(
                    "edge at position {} has {} elements, expected 2", start, ends.len()
                )
            })?;
        let [u, v] = ends;
        Ok((u, v))
    }

    fn parse_node(&mut self) -> Result<NodeId, EdgeListError> {
        self.skip_whitespace();
        match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.bump();
                self.parse_string(q).map(NodeId::Str)
            }
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => {
                self.parse_int().map(NodeId::Int)
            }
            Some(_) => Err(self.error("expected an integer or a quoted string")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_int(&mut self) -> Result<i64, EdgeListError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => { self.bump(); true }
            Some('+') => { self.bump(); false }
            _ => false,
        };
        self.skip_whitespace();
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.text[digits_start..self.pos];
        if digits.is_empty() {
            return Err(self.error("expected digits"));
        }
        // Reject things like `1.5` or `0x1` instead of silently splitting them.
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '.' || c == '_') {
            return Err(self.error("unsupported numeric literal"));
        }
        let value = if negative { format!("-{}", digits) } else { digits.to_string() };
        value.parse::<i64>().map_err(|e| EdgeListError::MalformedInput {
            reason: format!("invalid integer at position {}: {}", start, e)
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, EdgeListError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(_) => return Err(self.error("unsupported escape sequence")),
                        None => return Err(self.error("unterminated string")),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(pairs: &[(i64, i64)]) -> Vec<Edge> {
        pairs.iter().map(|(u, v)| (NodeId::Int(*u), NodeId::Int(*v))).collect()
    }

    #[test]
    fn parses_tuple_pairs() {
        let edges = parse_edge_list("[(0,1),(1,2),(2,0)]").unwrap();
        assert_eq!(edges, ints(&[(0, 1), (1, 2), (2, 0)]));
    }

    #[test]
    fn parses_list_pairs_with_whitespace_and_trailing_commas() {
        let edges = parse_edge_list(" ( [ 3 , -4 ], [5,6,] , ) ").unwrap();
        assert_eq!(edges, ints(&[(3, -4), (5, 6)]));
    }

    #[test]
    fn parses_string_nodes() {
        let edges = parse_edge_list(r#"[("a", 'b'), ('it\'s', "c")]"#).unwrap();
        assert_eq!(edges[0], (NodeId::Str("a".into()), NodeId::Str("b".into())));
        assert_eq!(edges[1].0, NodeId::Str("it's".into()));
    }

    #[test]
    fn parses_set_of_tuples() {
        let edges = parse_edge_list("{(0,1), (1,2)}").unwrap();
        assert_eq!(edges, ints(&[(0, 1), (1, 2)]));
        assert!(parse_edge_list("{}").unwrap().is_empty());

        let err = parse_edge_list("{[0,1]}").unwrap_err();
        assert!(err.to_string().contains("inside a set"), "{}", err);
        assert!(parse_edge_list("[{(0,1)}]").is_err());
        assert!(parse_edge_list("{(0,1)").is_err());
    }

    #[test]
    fn empty_list_has_no_edges() {
        assert!(parse_edge_list("[]").unwrap().is_empty());
        assert!(parse_edge_list("()").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_literals() {
        for text in ["not-a-list", "0,1;1,2;2,3", "", "[(0,1)", "[(0,1)] x", "[(0,1]]"] {
            let err = parse_edge_list(text).unwrap_err();
            assert!(err.to_string().starts_with("Malformed edgelist"), "{}: {}", text, err);
        }
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = parse_edge_list("[(0,1,2)]").unwrap_err();
        assert!(err.to_string().contains("3 elements"));
        assert!(parse_edge_list("[(0,)]").is_err());
        assert!(parse_edge_list("(0,1)").is_err());
    }

    #[test]
    fn rejects_floats_and_mixed_kinds() {
        assert!(parse_edge_list("[(0.5,1)]").is_err());
        let err = parse_edge_list("[(0,'a')]").unwrap_err();
        assert!(err.to_string().contains("different kinds"));
    }
}
