use std::fmt;
use std::path::PathBuf;

/// Represents any failure that can occur while parsing, validating, or
/// encoding custom instruction models.
#[derive(Debug)]
pub enum ExtError {
    Io(std::io::Error),
    /// The reference source failed the structural syntax check.
    Compile { file: PathBuf, message: String },
    /// A parsed model violates the instruction-format contract.
    Consistency { subject: String, message: String },
    /// A numeric field lies outside its legal domain.
    Value { subject: String, message: String },
    /// The encoding oracle produced inconsistent output, or two
    /// instructions collide in the encoding space.
    Opcode(String),
}

impl From<std::io::Error> for ExtError {
    fn from(err: std::io::Error) -> Self {
        ExtError::Io(err)
    }
}

impl fmt::Display for ExtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtError::Io(err) => write!(f, "I/O error: {err}"),
            ExtError::Compile { file, message } => {
                write!(f, "compile error in {}: {message}", file.display())
            }
            ExtError::Consistency { subject, message } => {
                write!(f, "consistency error ({subject}): {message}")
            }
            ExtError::Value { subject, message } => {
                write!(f, "value error ({subject}): {message}")
            }
            ExtError::Opcode(message) => write!(f, "opcode error: {message}"),
        }
    }
}

impl std::error::Error for ExtError {}
