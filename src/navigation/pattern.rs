use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::PatternError;

/// Characters escaped when a parameter value is written back into a path
/// segment. Everything outside the RFC 3986 `pchar` set, plus `/`, `?` and
/// `#` which would otherwise split the segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// RoutePattern
///
/// A parsed URL pattern such as `/books/:id`, kept alongside the raw text it
/// was registered with so listings and error messages show what the author
/// wrote.
///
/// *Matching rules*: literal segments compare case-insensitively, `:name`
/// segments capture exactly one non-empty segment and hand it to the page
/// percent-decoded. A path either has the same number of segments as the
/// pattern or does not match at all; there are no optional or catch-all
/// segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// PathParams
///
/// Named values captured from the matched path, e.g. `id -> "42"` for
/// `/books/42`. Values are stored decoded (`/books/a%20b` gives `"a b"`);
/// `RoutePattern::build` encodes them again when a path is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl RoutePattern {
    /// parse
    ///
    /// Accepts `/`, `/login`, `/books/:id` and the like. A single trailing
    /// slash is ignored.
    ///
    /// # Errors
    /// Rejects patterns without a leading slash, with empty segments
    /// (`/books//x`), with an unnamed parameter (`/books/:`) or with the same
    /// parameter name twice. These are authoring mistakes, caught once when
    /// the table is built at startup.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let body = raw
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(raw.to_string()))?;
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for piece in body.split('/') {
                if piece.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                match piece.strip_prefix(':') {
                    Some("") => {
                        return Err(PatternError::UnnamedParam {
                            pattern: raw.to_string(),
                        });
                    }
                    Some(name) => {
                        let taken = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(p) if p == name));
                        if taken {
                            return Err(PatternError::DuplicateParam {
                                pattern: raw.to_string(),
                                param: name.to_string(),
                            });
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Literal(piece.to_string())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// matches
    ///
    /// Tests `path` against the pattern and returns the captured parameters,
    /// percent-decoded. Query strings and fragments are ignored.
    ///
    /// A parameter whose decoded bytes are not valid UTF-8 makes the whole
    /// path a non-match, so the caller reports `NotFound` rather than handing
    /// a mangled value to the page.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let pieces = split_path(path)?;
        if pieces.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, piece) in self.segments.iter().zip(pieces) {
            match segment {
                Segment::Literal(lit) if lit.eq_ignore_ascii_case(piece) => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(piece).decode_utf8().ok()?;
                    params.insert(name.as_str(), value);
                }
            }
        }
        Some(params)
    }

    /// overlaps
    ///
    /// True when some concrete path would match both patterns. A parameter
    /// position overlaps with anything; two literals overlap only when equal.
    ///
    /// Used by `RouteTable::new` to refuse tables whose outcome would depend
    /// on registration order.
    pub fn overlaps(&self, other: &RoutePattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a.eq_ignore_ascii_case(b),
                    _ => true,
                })
    }

    /// build
    ///
    /// Substitutes `params` into the pattern, percent-encoding each value so
    /// the result resolves back to the same parameters. Returns the name of
    /// the first missing parameter on failure.
    pub fn build(&self, params: &PathParams) -> Result<String, String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => path.push_str(&encode_segment(value)),
                    _ => return Err(name.clone()),
                },
            }
        }
        Ok(path)
    }
}

/// Percent-encodes `value` for use as a single path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Splits a request path into raw segments, dropping the query, the fragment
/// and one trailing slash. Paths with empty inner segments (`/books//1`) or
/// without a leading slash never match.
fn split_path(path: &str) -> Option<Vec<&str>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let body = path.strip_prefix('/')?;
    let body = body.strip_suffix('/').unwrap_or(body);
    if body.is_empty() {
        return Some(Vec::new());
    }

    let pieces: Vec<&str> = body.split('/').collect();
    if pieces.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(pieces)
}
