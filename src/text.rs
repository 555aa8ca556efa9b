//! Plain-text problem files.
//!
//! A problem is a list of `key = value;` statements. Values are integers
//! or arrays written `{1, 2, 3}` or `[1, 2, 3]`. `//` starts a comment
//! that runs to the end of the line.
//!
//! ```text
//! // one destination
//! graph_size = 4;
//! start = 1;
//! n_dests = 1;
//! dest = {4};
//! n_edges = 3;
//! from = {1, 2, 3};
//! to = {2, 3, 4};
//! cost = {1, 1, 1};
//! ```
//!
//! `n_dests` and `n_edges` are optional; when given they must match the
//! array lengths.

use crate::network::{Graph, GraphError, GraphSpec};
use std::collections::HashMap;
use std::fmt;

const KEYS: [&str; 8] = [
    "graph_size",
    "start",
    "n_dests",
    "dest",
    "n_edges",
    "from",
    "to",
    "cost",
];

/// A problem file could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required key is absent.
    MissingKey(&'static str),
    /// A key is assigned twice.
    DuplicateKey(String),
    /// A value does not parse, or a statement has no `=`.
    BadValue { key: String, value: String },
    /// A key is not part of the format.
    UnknownKey(String),
    /// A declared count disagrees with its array.
    CountMismatch {
        key: &'static str,
        declared: usize,
        actual: usize,
    },
    /// The arrays parse but do not form a valid graph.
    Graph(GraphError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingKey(key) => write!(f, "missing key `{key}`"),
            ParseError::DuplicateKey(key) => write!(f, "key `{key}` is assigned twice"),
            ParseError::BadValue { key, value } => {
                write!(f, "bad value for `{key}`: `{value}`")
            }
            ParseError::UnknownKey(key) => write!(f, "unknown key `{key}`"),
            ParseError::CountMismatch {
                key,
                declared,
                actual,
            } => write!(f, "`{key}` declares {declared} entries but has {actual}"),
            ParseError::Graph(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for ParseError {
    fn from(e: GraphError) -> Self {
        ParseError::Graph(e)
    }
}

/// Reads the raw arrays without validating the graph.
pub fn parse_spec(input: &str) -> Result<GraphSpec, ParseError> {
    let stripped: String = input
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    let mut values: HashMap<&'static str, String> = HashMap::new();
    for statement in stripped.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((key, value)) = statement.split_once('=') else {
            return Err(ParseError::BadValue {
                key: statement.to_string(),
                value: String::new(),
            });
        };
        let key = key.trim();
        let Some(&known) = KEYS.iter().find(|&&k| k == key) else {
            return Err(ParseError::UnknownKey(key.to_string()));
        };
        if values.insert(known, value.trim().to_string()).is_some() {
            return Err(ParseError::DuplicateKey(key.to_string()));
        }
    }

    let raw = |key: &'static str| values.get(key).ok_or(ParseError::MissingKey(key));

    let spec = GraphSpec {
        graph_size: scalar(raw("graph_size")?, "graph_size")?,
        start: scalar(raw("start")?, "start")?,
        dest: array(raw("dest")?, "dest")?,
        from: array(raw("from")?, "from")?,
        to: array(raw("to")?, "to")?,
        cost: array(raw("cost")?, "cost")?,
    };

    if let Some(value) = values.get("n_dests") {
        check_count(scalar(value, "n_dests")?, "dest", spec.dest.len())?;
    }
    if let Some(value) = values.get("n_edges") {
        let declared = scalar(value, "n_edges")?;
        check_count(declared, "from", spec.from.len())?;
        check_count(declared, "to", spec.to.len())?;
        check_count(declared, "cost", spec.cost.len())?;
    }
    Ok(spec)
}

/// Reads and validates a problem.
///
/// # Examples
///
/// ```
/// use u_flowpath::text::parse_graph;
///
/// let input = "graph_size = 2; start = 1; dest = {2}; from = {1}; to = {2}; cost = {7};";
/// let graph = parse_graph(input).unwrap();
/// assert_eq!(graph.total_edge_cost(), 7);
/// ```
pub fn parse_graph(input: &str) -> Result<Graph, ParseError> {
    Ok(Graph::try_from(parse_spec(input)?)?)
}

/// Writes a graph in the format [`parse_graph`] reads.
pub fn write_graph(graph: &Graph) -> String {
    let spec = graph.to_spec();
    let lines = [
        format!("graph_size = {};", spec.graph_size),
        format!("start = {};", spec.start),
        format!("n_dests = {};", spec.dest.len()),
        format!("dest = {};", braces(&spec.dest)),
        format!("n_edges = {};", spec.from.len()),
        format!("from = {};", braces(&spec.from)),
        format!("to = {};", braces(&spec.to)),
        format!("cost = {};", braces(&spec.cost)),
    ];
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn braces<T: fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("{{{}}}", items.join(", "))
}

fn bad_value(key: &str, value: &str) -> ParseError {
    ParseError::BadValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn scalar<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| bad_value(key, value))
}

fn array<T: std::str::FromStr>(value: &str, key: &str) -> Result<Vec<T>, ParseError> {
    let inner = value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .or_else(|| value.strip_prefix('[').and_then(|v| v.strip_suffix(']')))
        .ok_or_else(|| bad_value(key, value))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|item| scalar(item.trim(), key))
        .collect()
}

fn check_count(declared: usize, key: &'static str, actual: usize) -> Result<(), ParseError> {
    if declared == actual {
        Ok(())
    } else {
        Err(ParseError::CountMismatch {
            key,
            declared,
            actual,
        })
    }
}
