//! Staffing rule models.
//!
//! Rules are the user-authored vocabulary for weekly planning:
//! numeric staffing rules ("2 Regular operators with Packing, OR 3 Flex
//! with Packing") and operator pairing rules ("Anna and Ben should work
//! together"). Rules are declarative data; the compiler turns them into
//! concrete per-day requirements.
//!
//! # Conjunction chains
//!
//! A numeric rule holds an ordered list of [`SkillRequirement`] entries.
//! Each entry carries the conjunction joining it to the *previous* entry
//! (ignored on the first). `And` accumulates into an additive group;
//! `Or` starts a new alternative group. `And` binds tighter than `Or`:
//! `A and B or C` reads as `(A and B) or C`.

use serde::{Deserialize, Serialize};

use super::{OperatorType, WeekDay};

/// A weekly planning rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanningRule {
    /// Headcount rule over skills and operator types.
    Numeric(NumericStaffingRule),
    /// Keep-together / keep-apart preference between operators.
    Pairing(OperatorPairingRule),
}

/// How a [`SkillRequirement`] joins the previous entry in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conjunction {
    /// Additive: both entries must be staffed.
    And,
    /// Alternative: this entry starts a new satisfiable option.
    Or,
}

/// Operator type selector for a staffing demand.
///
/// `Any` is a requirement in its own right — "one operator of any
/// type" — and is never a synonym for a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredType {
    /// Any operator type qualifies.
    Any,
    /// Only the named type qualifies.
    Of(OperatorType),
}

/// One entry in a numeric rule's conjunction chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    /// Which operator types qualify.
    pub required_type: RequiredType,
    /// Skill the operators must hold.
    pub skill: String,
    /// How many operators are needed.
    pub count: u32,
    /// Conjunction with the previous entry. Ignored on the first entry.
    pub conjunction: Conjunction,
}

/// Headcount rule over skills and operator types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStaffingRule {
    /// Unique rule identifier.
    pub id: String,
    /// Conjunction chain of staffing entries.
    pub requirements: Vec<SkillRequirement>,
    /// Days the rule applies to. Empty = every day.
    pub selected_days: Vec<WeekDay>,
    /// Disabled rules compile to nothing.
    pub enabled: bool,
}

/// Keep-together / keep-apart preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairPreference {
    /// The operators should share a task.
    Want,
    /// The operators should not share a task.
    DontWant,
}

/// Pairing rule between operators.
///
/// With two or more operators the rule is about working together (or
/// apart). With exactly one operator a skill is mandatory: the rule then
/// pins the operator onto (or keeps them off) that skill's tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPairingRule {
    /// Unique rule identifier.
    pub id: String,
    /// Operators the rule applies to.
    pub operator_ids: Vec<String>,
    /// Together or apart.
    pub preference: PairPreference,
    /// Restricts the rule to tasks requiring this skill.
    pub skill: Option<String>,
    /// Days the rule applies to. Empty = every day.
    pub selected_days: Vec<WeekDay>,
    /// Disabled rules compile to nothing.
    pub enabled: bool,
}

impl RequiredType {
    /// Whether an operator of the given type qualifies.
    pub fn matches(&self, operator_type: OperatorType) -> bool {
        match self {
            RequiredType::Any => true,
            RequiredType::Of(t) => *t == operator_type,
        }
    }

    /// Whether this selector admits any type.
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, RequiredType::Any)
    }

    /// Human-readable label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredType::Any => "any type",
            RequiredType::Of(t) => t.label(),
        }
    }
}

impl SkillRequirement {
    /// Creates an entry joined to the previous one with `And`.
    pub fn new(required_type: RequiredType, skill: impl Into<String>, count: u32) -> Self {
        Self {
            required_type,
            skill: skill.into(),
            count,
            conjunction: Conjunction::And,
        }
    }

    /// Marks this entry as starting a new alternative (`Or`).
    pub fn or(mut self) -> Self {
        self.conjunction = Conjunction::Or;
        self
    }
}

impl NumericStaffingRule {
    /// Creates an empty rule applying to every day.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requirements: Vec::new(),
            selected_days: Vec::new(),
            enabled: true,
        }
    }

    /// Appends an entry to the conjunction chain.
    pub fn with_requirement(mut self, requirement: SkillRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Restricts the rule to the given days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = WeekDay>) -> Self {
        self.selected_days = days.into_iter().collect();
        self
    }

    /// Enables or disables the rule.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl OperatorPairingRule {
    /// Creates a keep-together rule for the given operators.
    pub fn want(id: impl Into<String>, operator_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            operator_ids,
            preference: PairPreference::Want,
            skill: None,
            selected_days: Vec::new(),
            enabled: true,
        }
    }

    /// Creates a keep-apart rule for the given operators.
    pub fn dont_want(id: impl Into<String>, operator_ids: Vec<String>) -> Self {
        Self {
            preference: PairPreference::DontWant,
            ..Self::want(id, operator_ids)
        }
    }

    /// Restricts the rule to tasks requiring a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    /// Restricts the rule to the given days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = WeekDay>) -> Self {
        self.selected_days = days.into_iter().collect();
        self
    }

    /// Enables or disables the rule.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl PlanningRule {
    /// The rule's identifier.
    pub fn id(&self) -> &str {
        match self {
            PlanningRule::Numeric(r) => &r.id,
            PlanningRule::Pairing(r) => &r.id,
        }
    }

    /// Whether the rule participates in compilation.
    pub fn is_enabled(&self) -> bool {
        match self {
            PlanningRule::Numeric(r) => r.enabled,
            PlanningRule::Pairing(r) => r.enabled,
        }
    }
}
