//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route templates into segments at startup
//! - Match request paths positionally against compiled segments
//! - Capture named parameters for the forwarder (never re-validated here)
//!
//! # Design Decisions
//! - Patterns compile once, eagerly; malformed templates refuse startup
//! - No regex: segment-by-segment comparison, O(path length)
//! - `{name}` matches exactly one non-empty segment
//! - `{**name}` is allowed only as the final segment and matches one or
//!   more remaining segments, separators included

use std::fmt;

/// One compiled segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches the exact segment text (case-sensitive).
    Literal(String),
    /// Matches any single non-empty segment, captured under the name.
    Param(String),
    /// Matches one or more remaining segments, captured under the name.
    CatchAll(String),
}

/// Why a path template failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("pattern has an empty segment: {0}")]
    EmptySegment(String),

    #[error("parameter segment has no name: {0}")]
    EmptyParameterName(String),

    #[error("catch-all segment must be the final segment: {0}")]
    CatchAllNotLast(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    static_prefix_len: usize,
}

impl PathPattern {
    /// Compile a template such as `/api/users/{id}` or
    /// `/api/payment/qr-image/{**rest}`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        }

        let mut segments = Vec::new();
        for (index, part) in raw[1..].split('/').enumerate() {
            if index > 0 || !part.is_empty() {
                segments.push(parse_segment(raw, part)?);
            } else if raw == "/" {
                break;
            } else {
                return Err(PatternError::EmptySegment(raw.to_string()));
            }
        }

        // Anything after a catch-all can never match.
        if let Some(pos) = segments
            .iter()
            .position(|s| matches!(s, Segment::CatchAll(_)))
        {
            if pos + 1 != segments.len() {
                return Err(PatternError::CatchAllNotLast(raw.to_string()));
            }
        }

        let static_prefix_len = segments
            .iter()
            .take_while(|s| matches!(s, Segment::Literal(_)))
            .count();

        Ok(Self {
            raw: raw.to_string(),
            segments,
            static_prefix_len,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of literal segments before the first variable segment.
    /// Used for longest-static-prefix ordering.
    pub fn static_prefix_len(&self) -> usize {
        self.static_prefix_len
    }

    /// Match a request path, returning captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let path = path.strip_prefix('/')?;
        let path = path.strip_suffix('/').unwrap_or(path);
        let mut parts = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect::<Vec<_>>()
        };

        let mut captures = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(expected) => {
                    if parts.get(index) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => match parts.get(index) {
                    Some(value) if !value.is_empty() => {
                        captures.push((name.clone(), (*value).to_string()));
                    }
                    _ => return None,
                },
                Segment::CatchAll(name) => {
                    // One or more remaining segments.
                    if parts.len() <= index {
                        return None;
                    }
                    let rest = parts.split_off(index).join("/");
                    captures.push((name.clone(), rest));
                    return Some(captures);
                }
            }
        }

        if parts.len() == self.segments.len() {
            Some(captures)
        } else {
            None
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(raw: &str, part: &str) -> Result<Segment, PatternError> {
    if part.is_empty() {
        return Err(PatternError::EmptySegment(raw.to_string()));
    }

    if let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
        if let Some(name) = inner.strip_prefix("**") {
            if name.is_empty() {
                return Err(PatternError::EmptyParameterName(raw.to_string()));
            }
            return Ok(Segment::CatchAll(name.to_string()));
        }
        if inner.is_empty() {
            return Err(PatternError::EmptyParameterName(raw.to_string()));
        }
        return Ok(Segment::Param(inner.to_string()));
    }

    Ok(Segment::Literal(part.to_string()))
}
