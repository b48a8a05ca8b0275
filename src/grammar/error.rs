use thiserror::Error;

/// A rule line that could not be admitted into the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Line {line}: missing \"->\" in `{raw}`")]
    MissingArrow { line: usize, raw: String },

    #[error("Line {line}: empty left side in `{raw}`")]
    EmptyLeftSide { line: usize, raw: String },

    #[error("Line {line}: left side contains whitespace in `{raw}`")]
    LeftSideWhitespace { line: usize, raw: String },

    #[error("Line {line}: cannot find left side for `{raw}`")]
    DanglingAlternative { line: usize, raw: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingArrow { line, .. }
            | ParseError::EmptyLeftSide { line, .. }
            | ParseError::LeftSideWhitespace { line, .. }
            | ParseError::DanglingAlternative { line, .. } => *line,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ParseError::MissingArrow { raw, .. }
            | ParseError::EmptyLeftSide { raw, .. }
            | ParseError::LeftSideWhitespace { raw, .. }
            | ParseError::DanglingAlternative { raw, .. } => raw,
        }
    }
}
