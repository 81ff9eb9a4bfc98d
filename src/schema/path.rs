//! Field paths, built lazily on the stack and only rendered on failure

use super::ValidationError;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Position of the value under validation, relative to the document root
#[derive(Debug, Clone, Copy)]
pub struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    segment: Option<Segment<'a>>,
}

impl Path<'static> {
    pub fn root() -> Self {
        Self { parent: None, segment: None }
    }
}

impl<'a> Path<'a> {
    pub fn key<'b>(&'b self, key: &'b str) -> Path<'b> {
        Path { parent: Some(self), segment: Some(Segment::Key(key)) }
    }

    pub fn index<'b>(&'b self, index: usize) -> Path<'b> {
        Path { parent: Some(self), segment: Some(Segment::Index(index)) }
    }

    /// Dot-joined keys and indices, empty for the root
    pub fn render(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            match path.segment {
                Some(Segment::Key(key)) => segments.push(key.to_string()),
                Some(Segment::Index(index)) => segments.push(index.to_string()),
                None => {}
            }
            current = path.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    pub fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError {
            path: self.render(),
            message: message.into(),
        }
    }
}
