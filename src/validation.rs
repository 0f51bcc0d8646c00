//! Pre-flight integrity checks for roster and configuration data.
//!
//! The compiler tolerates bad references at compile time by skipping
//! them with a warning; these checks surface the same conditions as
//! data, so a configuration screen can list them before anything runs.
//! Detects:
//! - Duplicate operator or task IDs
//! - Empty IDs and names
//! - Rules referencing unknown skills or operators
//! - Zero-count demands and rules with nothing left to demand
//! - Pairing rules that cannot bind (missing skill, repeated members)
//! - Exclusions and task exclusions pointing at deleted entities

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{
    Operator, PlanningRule, TaskType, WeeklyExclusions, WeeklyPlanningConfig,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity is missing its ID or name.
    EmptyField,
    /// A task is configured for zero operators.
    ZeroHeadcount,
    /// A rule or exclusion references an entity that doesn't exist.
    StaleReference,
    /// A rule has nothing to demand.
    EmptyRule,
    /// A staffing demand asks for zero operators.
    ZeroCountDemand,
    /// A single-operator pairing rule has no skill to bind to.
    PairingWithoutSkill,
    /// A pairing rule lists the same operator twice.
    DuplicatePairOperator,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the weekly roster (operators and task catalog).
///
/// Checks:
/// 1. No duplicate operator IDs
/// 2. No duplicate task IDs
/// 3. No empty IDs or names
/// 4. No task requires an empty skill
/// 5. No task is configured for zero operators
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(operators: &[Operator], tasks: &[TaskType]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut operator_ids = HashSet::new();
    for op in operators {
        if op.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyField,
                format!("Operator '{}' has an empty ID", op.name),
            ));
        } else if !operator_ids.insert(op.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate operator ID: {}", op.id),
            ));
        }
        if op.name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyField,
                format!("Operator '{}' has no name", op.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if task.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyField,
                format!("Task '{}' has an empty ID", task.name),
            ));
        } else if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        if task.name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyField,
                format!("Task '{}' has no name", task.id),
            ));
        }
        if task.required_skill.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyField,
                format!("Task '{}' requires no skill", task.id),
            ));
        }
        if task.required_operators == Some(0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroHeadcount,
                format!("Task '{}' is configured for zero operators", task.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a weekly configuration against the roster it will run on.
///
/// Checks:
/// 1. Staffing demands reference skills some task provides
/// 2. No zero-count demands; every rule keeps at least one demand
/// 3. Pairing rules reference existing, unarchived operators
/// 4. Pairing rules list each operator once
/// 5. Single-operator pairing rules carry a skill
/// 6. Task exclusions reference catalog tasks
/// 7. Operator exclusions reference roster operators
///
/// Disabled rules are validated too; a rule is usually disabled while
/// it is being edited.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(
    config: &WeeklyPlanningConfig,
    exclusions: &WeeklyExclusions,
    operators: &[Operator],
    tasks: &[TaskType],
) -> ValidationResult {
    let mut errors = Vec::new();

    let known_skills: HashSet<&str> = tasks.iter().map(|t| t.required_skill.as_str()).collect();
    let known_tasks: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    for rule in &config.rules {
        match rule {
            PlanningRule::Numeric(numeric) => {
                let mut usable = 0;
                for entry in &numeric.requirements {
                    if entry.count == 0 {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::ZeroCountDemand,
                            format!(
                                "Rule '{}' demands zero operators for skill '{}'",
                                numeric.id, entry.skill
                            ),
                        ));
                        continue;
                    }
                    usable += 1;
                    if !known_skills.contains(entry.skill.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::StaleReference,
                            format!(
                                "Rule '{}' references unknown skill '{}'",
                                numeric.id, entry.skill
                            ),
                        ));
                    }
                }
                if usable == 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyRule,
                        format!("Rule '{}' has no usable demands", numeric.id),
                    ));
                }
            }
            PlanningRule::Pairing(pairing) => {
                if pairing.operator_ids.is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyRule,
                        format!("Pairing rule '{}' names no operators", pairing.id),
                    ));
                }
                let mut seen = HashSet::new();
                for id in &pairing.operator_ids {
                    if !seen.insert(id.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DuplicatePairOperator,
                            format!("Pairing rule '{}' lists operator '{id}' twice", pairing.id),
                        ));
                        continue;
                    }
                    match operators.iter().find(|o| &o.id == id) {
                        None => errors.push(ValidationError::new(
                            ValidationErrorKind::StaleReference,
                            format!(
                                "Pairing rule '{}' references unknown operator '{id}'",
                                pairing.id
                            ),
                        )),
                        Some(op) if op.archived => errors.push(ValidationError::new(
                            ValidationErrorKind::StaleReference,
                            format!(
                                "Pairing rule '{}' references archived operator '{id}'",
                                pairing.id
                            ),
                        )),
                        Some(_) => {}
                    }
                }
                if seen.len() == 1 && pairing.skill.is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::PairingWithoutSkill,
                        format!(
                            "Single-operator pairing rule '{}' needs a skill to bind to",
                            pairing.id
                        ),
                    ));
                }
                if let Some(skill) = &pairing.skill {
                    if !known_skills.contains(skill.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::StaleReference,
                            format!(
                                "Pairing rule '{}' references unknown skill '{skill}'",
                                pairing.id
                            ),
                        ));
                    }
                }
            }
        }
    }

    for task_id in &config.excluded_tasks {
        if !known_tasks.contains(task_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::StaleReference,
                format!("Excluded task '{task_id}' is not in the catalog"),
            ));
        }
    }

    for exclusion in &exclusions.exclusions {
        if !operators.iter().any(|o| o.id == exclusion.operator_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::StaleReference,
                format!(
                    "Exclusion references unknown operator '{}'",
                    exclusion.operator_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
