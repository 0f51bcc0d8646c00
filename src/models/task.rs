//! Task type model.
//!
//! A task type is a catalog entry describing a kind of daily work
//! (e.g., a packing line, a quality station). Assignments bind an
//! operator to one task type per day.

use serde::{Deserialize, Serialize};

/// Daily headcount assumed for task types with no configured value.
pub const DEFAULT_REQUIRED_OPERATORS: u32 = 1;

/// A task type in the weekly catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskType {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name (referenced by operator preferences).
    pub name: String,
    /// Skill an operator must hold to work this task.
    pub required_skill: String,
    /// Display color token. Carried for the consumer, never interpreted.
    pub color: String,
    /// Baseline daily headcount. `None` = unconfigured.
    pub required_operators: Option<u32>,
}

impl TaskType {
    /// Creates a new task type requiring the given skill.
    pub fn new(id: impl Into<String>, required_skill: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_skill: required_skill.into(),
            color: String::new(),
            required_operators: None,
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the baseline daily headcount.
    pub fn with_required_operators(mut self, count: u32) -> Self {
        self.required_operators = Some(count);
        self
    }

    /// Baseline daily headcount, falling back to the default when unconfigured.
    #[inline]
    pub fn required_count(&self) -> u32 {
        self.required_operators.unwrap_or(DEFAULT_REQUIRED_OPERATORS)
    }
}
