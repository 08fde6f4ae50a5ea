use std::fmt;
use std::str::FromStr;

use ndf_errors::PathError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object property or a map key.
    Name(String),
    Index(usize),
    /// `[*]`
    Wildcard,
}

/// A sequence of segments written as `A.B[3].C`. The empty path addresses
/// the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, PathError> {
        let error = |reason| PathError::Syntax { path: text.to_owned(), reason };

        let mut segments = Vec::new();
        let mut rest = text.trim();
        if rest.is_empty() {
            return Ok(Self::root());
        }
        let mut expect_name = !rest.starts_with('[');

        while !rest.is_empty() || expect_name {
            if let Some(after) = rest.strip_prefix('[') {
                let Some((inside, after)) = after.split_once(']') else {
                    return Err(error("unclosed `[`"));
                };
                let segment = match inside.trim() {
                    "*" => Segment::Wildcard,
                    index => match index.parse() {
                        Ok(index) => Segment::Index(index),
                        Err(_) => return Err(error("invalid index")),
                    },
                };
                segments.push(segment);
                rest = after;
                expect_name = false;
                if let Some(after) = rest.strip_prefix('.') {
                    rest = after;
                    expect_name = true;
                } else if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(error("expected `.` or `[`"));
                }
                continue;
            }

            let end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() {
                return Err(error(if rest.starts_with(']') { "unexpected `]`" } else { "empty segment" }));
            }
            segments.push(Segment::Name(name.to_owned()));
            rest = &rest[end..];
            expect_name = false;
            if let Some(after) = rest.strip_prefix('.') {
                rest = after;
                expect_name = true;
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether no segment is a wildcard.
    pub fn is_concrete(&self) -> bool {
        !self.segments.contains(&Segment::Wildcard)
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Self { segments: self.segments[..len.min(self.segments.len())].to_vec() }
    }

    #[must_use]
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Name(name.into()));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Name(name) if index == 0 => write!(f, "{name}")?,
                Segment::Name(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Wildcard => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}
