use crate::error::{EbrError, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Key/value variables of the current pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableContext {
    vars: BTreeMap<String, String>,
}

impl VariableContext {
    /// Capture the variables of the running process.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Layer `KEY=VALUE` assignments on top of the current variables.
    pub fn with_overrides(mut self, assignments: &[String]) -> Result<Self> {
        for assignment in assignments {
            let (key, value) = assignment.split_once('=').ok_or_else(|| {
                EbrError::Configuration(format!(
                    "Invalid variable '{assignment}', expected KEY=VALUE"
                ))
            })?;

            let key = key.trim();
            if key.is_empty() {
                return Err(EbrError::Configuration(format!(
                    "Invalid variable '{assignment}', name is empty"
                )));
            }

            self.vars.insert(key.to_string(), value.to_string());
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Substitutes `$NAME`, `${NAME}` and `$$` in a template.
///
/// Names missing from the context are left in the output exactly as written.
pub struct VariableExpander {
    pattern: Regex,
}

impl VariableExpander {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"\$(\$|\{[A-Za-z0-9_.]+\}|[A-Za-z0-9_]+)")
            .map_err(|e| EbrError::Configuration(format!("Regex error: {}", e)))?;
        Ok(Self { pattern })
    }

    pub fn expand(&self, template: &str, context: &VariableContext) -> String {
        if !template.contains('$') {
            return template.to_string();
        }

        self.pattern
            .replace_all(template, |caps: &Captures| {
                let token = &caps[1];
                if token == "$" {
                    return "$".to_string();
                }

                let name = token
                    .strip_prefix('{')
                    .and_then(|t| t.strip_suffix('}'))
                    .unwrap_or(token);

                match context.get(name) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
