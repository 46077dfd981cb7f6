//! Path template rendering
//!
//! Templates name their parameters in braces, e.g.
//! `/projects/{project_id}/versions.json`. Values are interpolated verbatim.

use crate::error::{RedmineError, Result};
use std::fmt::Display;

/// Ordered path parameter values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(&'static str, String)>,
}

impl PathParams {
    /// No parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    pub fn with(mut self, name: &'static str, value: impl Display) -> Self {
        let value = value.to_string();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    /// Value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no parameters were given
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Render a template, failing when a placeholder has no value
pub fn render(template: &str, params: &PathParams) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            RedmineError::Other(format!("unterminated placeholder in path template '{template}'"))
        })?;
        let name = &after[..end];
        let value = params
            .get(name)
            .ok_or_else(|| RedmineError::validation(format!("missing path parameter '{name}'")))?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
