//! Weekly planning configuration and templates.
//!
//! A [`WeeklyPlanningConfig`] holds everything the user authored for one
//! week: the rule set and the tasks taken out of planning. Templates
//! snapshot a rule set detached from any week and stamp out fresh
//! config/exclusion pairs on demand — never applied automatically.

use serde::{Deserialize, Serialize};

use super::{OperatorExclusion, PlanningRule, WeeklyExclusions};

/// The planning configuration for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlanningConfig {
    /// Unique identifier.
    pub id: String,
    /// ISO week number within the year.
    pub week_number: u32,
    /// Calendar year.
    pub year: i32,
    /// Planning rules in authoring order.
    pub rules: Vec<PlanningRule>,
    /// Task ids taken out of planning for this week.
    pub excluded_tasks: Vec<String>,
    /// Creation timestamp (ms).
    pub created_at_ms: i64,
    /// Last-modified timestamp (ms).
    pub updated_at_ms: i64,
}

/// A reusable rule-set snapshot detached from any week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningTemplate {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Rules the template stamps into new configurations.
    pub rules: Vec<PlanningRule>,
    /// Exclusions the template stamps into new exclusion sets.
    pub exclusions: Vec<OperatorExclusion>,
    /// Task ids the template takes out of planning.
    pub excluded_tasks: Vec<String>,
}

impl WeeklyPlanningConfig {
    /// Creates an empty configuration for a week.
    pub fn new(id: impl Into<String>, week_number: u32, year: i32, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            week_number,
            year,
            rules: Vec::new(),
            excluded_tasks: Vec::new(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: PlanningRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Takes a task out of planning for this week.
    pub fn with_excluded_task(mut self, task_id: impl Into<String>) -> Self {
        self.excluded_tasks.push(task_id.into());
        self
    }

    /// Adds a rule in place.
    pub fn add_rule(&mut self, rule: PlanningRule) {
        self.rules.push(rule);
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at_ms = now_ms;
    }

    /// Whether a task is excluded from planning this week.
    pub fn is_task_excluded(&self, task_id: &str) -> bool {
        self.excluded_tasks.iter().any(|t| t == task_id)
    }
}

impl PlanningTemplate {
    /// Creates an empty template.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rules: Vec::new(),
            exclusions: Vec::new(),
            excluded_tasks: Vec::new(),
        }
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: PlanningRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends an exclusion.
    pub fn with_exclusion(mut self, exclusion: OperatorExclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Takes a task out of planning.
    pub fn with_excluded_task(mut self, task_id: impl Into<String>) -> Self {
        self.excluded_tasks.push(task_id.into());
        self
    }

    /// Stamps out a fresh configuration and exclusion set for a week.
    ///
    /// Derived ids are deterministic: `<template-id>-w<week>-<year>`.
    pub fn instantiate(
        &self,
        week_number: u32,
        year: i32,
        now_ms: i64,
    ) -> (WeeklyPlanningConfig, WeeklyExclusions) {
        let base = format!("{}-w{:02}-{}", self.id, week_number, year);
        let mut config = WeeklyPlanningConfig::new(&base, week_number, year, now_ms);
        config.rules = self.rules.clone();
        config.excluded_tasks = self.excluded_tasks.clone();

        let mut exclusions =
            WeeklyExclusions::new(format!("{base}-excl"), week_number, year, now_ms);
        exclusions.exclusions = self.exclusions.clone();

        (config, exclusions)
    }
}
