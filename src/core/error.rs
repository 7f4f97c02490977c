use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    NotAnArray,
    IndexOutOfBounds,
    NotAnObject,
    KeyNotFound,
    NilValue,
    TypeMismatch,
    Decode,
    Io,
    Usage,
}

impl ErrorKind {
    /// Message used when an error carries no explicit one.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal error",
            ErrorKind::NotAnArray => "array index on non-array value",
            ErrorKind::IndexOutOfBounds => "array index out of bounds",
            ErrorKind::NotAnObject => "object lookup on non-object value",
            ErrorKind::KeyNotFound => "object does not contain field",
            ErrorKind::NilValue => "null value found",
            ErrorKind::TypeMismatch => "value has the wrong type",
            ErrorKind::Decode => "invalid json input",
            ErrorKind::Io => "i/o error",
            ErrorKind::Usage => "usage error",
        }
    }

    /// True for the kinds produced while walking a path.
    pub fn is_resolution(self) -> bool {
        matches!(
            self,
            ErrorKind::NotAnArray
                | ErrorKind::IndexOutOfBounds
                | ErrorKind::NotAnObject
                | ErrorKind::KeyNotFound
                | ErrorKind::NilValue
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    segment: Option<String>,
    index: Option<usize>,
    shape: Option<&'static str>,
    actual: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            segment: None,
            index: None,
            shape: None,
            actual: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn shape(&self) -> Option<&'static str> {
        self.shape
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    /// Explicit message, or the kind's default.
    pub fn message_text(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_shape(mut self, shape: &'static str) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message_text())?;
        if let Some(segment) = &self.segment {
            write!(f, " (segment: {segment})")?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {index})")?;
        }
        if let Some(shape) = self.shape {
            write!(f, " (shape: {shape})")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, " (got: {actual})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotAnArray
        | ErrorKind::IndexOutOfBounds
        | ErrorKind::NotAnObject
        | ErrorKind::KeyNotFound
        | ErrorKind::NilValue => 3,
        ErrorKind::TypeMismatch => 4,
        ErrorKind::Decode => 5,
        ErrorKind::Io => 8,
    }
}
