//! Field-level validation of raw tool arguments.
//!
//! Every tool declares its fields by calling the [`Validator`] checks in schema order
//! (see [`crate::tools`]). All checks run; failures are collected and rendered
//! together, so the same input always produces the same message.

use std::fmt;

use serde_json::Value;

use crate::pagination::{self, PaginationWindow};
use crate::repo_resolver::ResolutionError;
use crate::target::{self, RepositoryTarget, TargetSource};
use crate::tools::{ToolCall, ToolName};

pub type JsonObject = serde_json::Map<String, Value>;

/// A single problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered, non-empty set of field errors, rendered as `a: x; b: y.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str(".")
    }
}

/// Why a tool call was rejected before reaching the Forge API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    Invalid(ValidationErrors),

    #[error("Failed to resolve directory: {0}")]
    Resolution(ResolutionError),
}

/// A request whose fields passed validation and whose repository is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub target: RepositoryTarget,
    pub call: ToolCall,
}

/// Validate raw arguments for `tool` and resolve its repository target.
///
/// Git metadata is only read once every field check has passed.
pub fn validate(tool: ToolName, args: &JsonObject) -> Result<ValidatedRequest, RequestError> {
    let (source, call) = tool.parse_args(args).map_err(RequestError::Invalid)?;
    let target = source.resolve().map_err(|e| match e {
        ResolutionError::InvalidDirectory { .. } => RequestError::Invalid(ValidationErrors(
            vec![FieldError::new("directory", "invalid directory")],
        )),
        other => RequestError::Resolution(other),
    })?;
    Ok(ValidatedRequest { target, call })
}

const CANNOT_BE_BLANK: &str = "cannot be blank";

/// Collects field errors while extracting typed values from a raw argument map.
///
/// Each check returns `None` exactly when it recorded at least one error.
pub struct Validator<'a> {
    args: &'a JsonObject,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    pub fn new(args: &'a JsonObject) -> Self {
        Self {
            args,
            errors: Vec::new(),
        }
    }

    /// Consume the validator, returning the collected errors.
    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.args.get(field).filter(|v| !v.is_null())
    }

    fn integer(&mut self, field: &'static str) -> Result<Option<i64>, ()> {
        match self.raw(field) {
            None => Ok(None),
            Some(v) => match v.as_i64() {
                Some(n) => Ok(Some(n)),
                None => {
                    self.push(field, "must be an integer");
                    Err(())
                }
            },
        }
    }

    fn string(&mut self, field: &'static str) -> Result<Option<&'a str>, ()> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => {
                self.push(field, "must be a string");
                Err(())
            }
        }
    }

    /// `directory` / `repository` pair, applying the target precedence policy.
    pub fn target(&mut self) -> Option<TargetSource> {
        let directory = self.string("directory");
        let repository = self.string("repository");
        let (Ok(directory), Ok(repository)) = (directory, repository) else {
            return None;
        };
        match target::check_target(directory, repository) {
            Ok(source) => Some(source),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }

    /// Required integer identifier, at least 1.
    pub fn positive_id(&mut self, field: &'static str) -> Option<i64> {
        match self.integer(field).ok()? {
            None => {
                self.push(field, CANNOT_BE_BLANK);
                None
            }
            Some(n) if n < 1 => {
                self.push(field, "must be no less than 1");
                None
            }
            Some(n) => Some(n),
        }
    }

    /// `limit` / `offset` pair.
    pub fn pagination(&mut self) -> Option<PaginationWindow> {
        let limit = self.integer("limit");
        let offset = self.integer("offset");
        let (Ok(limit), Ok(offset)) = (limit, offset) else {
            return None;
        };
        match pagination::normalize(limit, offset) {
            Ok(window) => Some(window),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }

    /// Required string that must contain something other than whitespace.
    pub fn non_blank(&mut self, field: &'static str) -> Option<String> {
        match self.string(field).ok()? {
            Some(s) if !s.trim().is_empty() => Some(s.to_string()),
            _ => {
                self.push(field, CANNOT_BE_BLANK);
                None
            }
        }
    }

    /// Optional string whose length in characters must lie in `min..=max` when given.
    pub fn optional_text(
        &mut self,
        field: &'static str,
        min: usize,
        max: usize,
    ) -> Option<Option<String>> {
        match self.string(field).ok()? {
            None => Some(None),
            Some(s) => {
                let len = s.chars().count();
                if (min..=max).contains(&len) {
                    Some(Some(s.to_string()))
                } else {
                    self.push(field, format!("the length must be between {min} and {max}"));
                    None
                }
            }
        }
    }

    /// Optional string restricted to `choices`.
    pub fn optional_choice(
        &mut self,
        field: &'static str,
        choices: &[&str],
    ) -> Option<Option<String>> {
        match self.string(field).ok()? {
            None => Some(None),
            Some(s) if choices.contains(&s) => Some(Some(s.to_string())),
            Some(_) => {
                self.push(field, "must be a valid value");
                None
            }
        }
    }

    /// Require that at least one of `fields` was supplied (non-null).
    pub fn require_any(&mut self, fields: &[&'static str]) -> Option<()> {
        if fields.iter().any(|f| self.raw(f).is_some()) {
            return Some(());
        }
        let message = match fields {
            [a, b, c] => format!("at least one of {a}, {b}, or {c} must be provided"),
            _ => format!("at least one of {} must be provided", fields.join(", ")),
        };
        for &field in fields {
            self.push(field, message.clone());
        }
        None
    }
}
