// Function reference parsing
//
// A reference names a callable as `[path/]<file>.<ext>[:[Class.]method]`.
// The canonical string form doubles as the function identifier used for
// registry lookup and error-topic derivation.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use courier_error::{TypesError, TypesResult};

lazy_static! {
    // (path/to/file/)(file).(extension)[:[Class.]method]
    static ref REFERENCE_PATTERN: Regex =
        Regex::new(r"^(?:(.*/))?([^./]+)\.([^.:]+)(?::(?:([^:.]+)\.)?([^:.]+))?$")
            .expect("reference pattern is valid");
}

/// A parsed function reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionReference {
    /// Directory portion, trailing slash preserved
    pub path: Option<String>,
    /// Source file stem
    pub file: String,
    /// Source file extension
    pub ext: String,
    /// Optional class owning the method
    pub class: Option<String>,
    /// Optional method name; absent means the file itself is the target
    pub method: Option<String>,
}

impl FunctionReference {
    /// Parse a reference string.
    ///
    /// Fails with `InvalidFunctionReference` when the string does not
    /// match the grammar.
    pub fn parse(reference: &str) -> TypesResult<Self> {
        let captures = REFERENCE_PATTERN
            .captures(reference)
            .ok_or_else(|| TypesError::invalid_reference(reference))?;

        Ok(FunctionReference {
            path: captures.get(1).map(|m| m.as_str().to_string()),
            file: captures[2].to_string(),
            ext: captures[3].to_string(),
            class: captures.get(4).map(|m| m.as_str().to_string()),
            method: captures.get(5).map(|m| m.as_str().to_string()),
        })
    }

    /// The canonical identifier for this reference.
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FunctionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}", path)?;
        }
        write!(f, "{}.{}", self.file, self.ext)?;
        if let Some(method) = &self.method {
            write!(f, ":")?;
            if let Some(class) = &self.class {
                write!(f, "{}.", class)?;
            }
            write!(f, "{}", method)?;
        }
        Ok(())
    }
}

impl FromStr for FunctionReference {
    type Err = TypesError;

    fn from_str(reference: &str) -> TypesResult<Self> {
        FunctionReference::parse(reference)
    }
}
