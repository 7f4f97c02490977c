//! Purpose: Normalize both path input forms into one segment sequence.
//! Exports: `Path`, `Segment`, `IntoPath`, `PATH_DELIMITERS`.
//! Role: Input boundary for the resolver; knows nothing about values or shapes.
//! Invariants: The string form splits on runs of `.`, `[`, `]` and drops empty tokens.
//! Invariants: The pre-split form keeps every segment verbatim (no re-tokenizing).
//! Invariants: A segment is an index iff it parses whole as a non-negative base-10 integer.

use std::fmt;

/// Characters that separate segments in the string form.
pub const PATH_DELIMITERS: [char; 3] = ['.', '[', ']'];

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path; resolving it yields the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the single-string form (`a.b[2]`, `items[0].name`).
    ///
    /// Input without any delimiter is one segment taken as-is, so `parse("")`
    /// looks up the empty key rather than addressing the root.
    pub fn parse(input: &str) -> Self {
        if !input.contains(PATH_DELIMITERS) {
            return Self {
                segments: vec![input.to_string()],
            };
        }
        let segments = input
            .split(PATH_DELIMITERS)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Accept already-split segments verbatim; keys may contain delimiters.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|segment| segment.as_ref().to_string())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = Segment<'_>> {
        self.segments.iter().map(|raw| Segment::classify(raw))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.iter().enumerate() {
            match segment {
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Segment<'a> {
    Index(usize),
    Key(&'a str),
}

impl<'a> Segment<'a> {
    /// Negative numbers and overflowing digit runs fall back to key lookups.
    pub fn classify(raw: &'a str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Key(raw),
        }
    }
}

/// Anything an accessor accepts as a path.
///
/// String-like inputs use [`Path::parse`]; slices, arrays and vectors of
/// strings use [`Path::from_segments`].
pub trait IntoPath {
    fn into_path(self) -> Path;
}

impl IntoPath for Path {
    fn into_path(self) -> Path {
        self
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Path {
        self.clone()
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Path {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Path {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Path {
        Path::parse(self)
    }
}

impl<S: AsRef<str>> IntoPath for &[S] {
    fn into_path(self) -> Path {
        Path::from_segments(self)
    }
}

impl<S: AsRef<str>, const N: usize> IntoPath for [S; N] {
    fn into_path(self) -> Path {
        Path::from_segments(self)
    }
}

impl<S: AsRef<str>, const N: usize> IntoPath for &[S; N] {
    fn into_path(self) -> Path {
        Path::from_segments(self)
    }
}

impl<S: AsRef<str>> IntoPath for &Vec<S> {
    fn into_path(self) -> Path {
        Path::from_segments(self)
    }
}

impl<S: AsRef<str>> IntoPath for Vec<S> {
    fn into_path(self) -> Path {
        Path::from_segments(self)
    }
}
