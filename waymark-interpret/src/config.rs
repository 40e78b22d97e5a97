//! Interpreter configuration.

use crate::classify::{ClassifierRule, TagClassifier};

/// Configuration for [`Interpreter`](crate::Interpreter).
///
/// # Examples
/// ```
/// use waymark_interpret::{Interpreter, InterpreterConfig};
///
/// let config = InterpreterConfig {
///     include_untagged_nodes: false,
///     ..InterpreterConfig::default()
/// };
/// let interpreter = Interpreter::with_config(config);
/// assert!(!interpreter.config().include_untagged_nodes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InterpreterConfig {
    /// Emit point features for nodes without tags.
    pub include_untagged_nodes: bool,
    /// Classification table evaluated first-match-wins.
    pub rules: Vec<ClassifierRule>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            include_untagged_nodes: true,
            rules: TagClassifier::default_rules(),
        }
    }
}
