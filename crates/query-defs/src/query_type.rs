use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::loader::LoaderError;

/// The query language a definition file encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Sparql,
    Tpf,
    Json,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sparql => write!(f, "sparql"),
            Self::Tpf => write!(f, "tpf"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for QueryType {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sparql" | "rq" => Ok(Self::Sparql),
            "tpf" => Ok(Self::Tpf),
            "json" => Ok(Self::Json),
            other => Err(LoaderError::UnrecognizedQueryType(other.to_owned())),
        }
    }
}

/// File suffixes that mark a query file, checked in order.
const SUFFIXES: &[(&str, QueryType)] = &[
    (".rq", QueryType::Sparql),
    (".sparql", QueryType::Sparql),
    (".tpf", QueryType::Tpf),
    (".json", QueryType::Json),
];

/// Name tokens that hint at a query type when no suffix matches.
const TOKENS: &[(&str, QueryType)] = &[
    ("rq", QueryType::Sparql),
    ("sparql", QueryType::Sparql),
    ("tpf", QueryType::Tpf),
    ("json", QueryType::Json),
];

const SPARQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "CONSTRUCT",
    "ASK",
    "DESCRIBE",
    "PREFIX",
    "BASE",
    "INSERT",
    "DELETE",
    "WITH",
];

impl QueryType {
    /// Match a file name against the suffix table only.
    ///
    /// This is the rule listings use to decide whether a file is a query at all.
    pub fn from_suffix(name: &str) -> Option<QueryType> {
        SUFFIXES
            .iter()
            .find(|(suffix, _)| strip_suffix_ignore_case(name, suffix).is_some())
            .map(|(_, kind)| *kind)
    }

    fn from_tokens(name: &str) -> Option<QueryType> {
        name.to_lowercase()
            .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
            .find_map(|token| {
                TOKENS
                    .iter()
                    .find(|(t, _)| *t == token)
                    .map(|(_, kind)| *kind)
            })
    }

    fn from_content(content: &str) -> Option<QueryType> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{')
            && serde_json::from_str::<serde_json::Value>(trimmed).is_ok_and(|v| v.is_object())
        {
            return Some(QueryType::Json);
        }

        // Decorator lines (`#+ ...`) and plain comments precede the query body.
        let first = trimmed
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))?;
        let keyword = first
            .split(|c: char| c.is_whitespace() || c == '{')
            .next()
            .unwrap_or_default()
            .to_uppercase();

        SPARQL_KEYWORDS
            .contains(&keyword.as_str())
            .then_some(QueryType::Sparql)
    }
}

/// Classify a file by name, falling back to its content when given.
///
/// Rules run in this order, first hit wins:
/// 1. suffix table (`.rq`, `.sparql`, `.tpf`, `.json`)
/// 2. a name token such as `sparql` or `tpf` in `test-tpf`
/// 3. content sniffing: a JSON object, or a leading SPARQL keyword
pub fn classify(name: &str, content: Option<&str>) -> Result<QueryType, LoaderError> {
    QueryType::from_suffix(name)
        .or_else(|| QueryType::from_tokens(name))
        .or_else(|| content.and_then(QueryType::from_content))
        .ok_or_else(|| LoaderError::UnrecognizedQueryType(name.to_owned()))
}

/// Strip a recognized query suffix, leaving the logical name.
///
/// Names without a recognized suffix come back unchanged.
pub fn base_name(name: &str) -> &str {
    SUFFIXES
        .iter()
        .find_map(|(suffix, _)| strip_suffix_ignore_case(name, suffix))
        .unwrap_or(name)
}

/// Strip an ASCII suffix regardless of case. A name that is only the
/// suffix (e.g. `.rq`) does not count.
fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if split == 0 {
        return None;
    }
    let (stem, tail) = (name.get(..split)?, name.get(split..)?);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}
