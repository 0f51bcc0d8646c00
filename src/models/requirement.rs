//! Resolved requirement models.
//!
//! Compiler output: the user-authored rule set flattened to concrete
//! per-day requirements. A staffing requirement keeps the rule's OR
//! semantics as *alternatives* — lists of additive demand groups, of
//! which exactly one must be satisfied. Pairing rules become per-day
//! pairing constraints.

use serde::{Deserialize, Serialize};

use super::{Conjunction, PairPreference, RequiredType, SkillRequirement, TaskType, WeekDay};

/// A per-day requirement produced by the rule compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolvedRequirement {
    /// Concrete headcount demands for one day.
    Staffing(StaffingRequirement),
    /// A keep-together / keep-apart constraint for one day.
    Pairing(PairingConstraint),
}

/// Concrete headcount demands for one rule on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRequirement {
    /// Day the requirement applies to.
    pub day: WeekDay,
    /// Rule this requirement was compiled from.
    pub rule_id: String,
    /// Alternative demand groups. Each inner group is additive (all of
    /// its demands must be staffed); satisfying any one group satisfies
    /// the requirement. Within a group, exact-type demands come before
    /// `Any` demands.
    pub alternatives: Vec<Vec<StaffingDemand>>,
}

/// One concrete demand: N operators of a type holding a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingDemand {
    /// Which operator types qualify.
    pub required_type: RequiredType,
    /// Skill the operators must hold.
    pub skill: String,
    /// How many operators are needed.
    pub count: u32,
    /// Tasks providing the skill this week, sorted by id.
    pub task_ids: Vec<String>,
}

/// A pairing rule projected onto one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingConstraint {
    /// Day the constraint applies to.
    pub day: WeekDay,
    /// Rule this constraint was compiled from.
    pub rule_id: String,
    /// Operators the constraint applies to.
    pub operator_ids: Vec<String>,
    /// Together or apart.
    pub preference: PairPreference,
    /// Restricts the constraint to tasks requiring this skill.
    pub skill: Option<String>,
}

/// The unfilled portion of a staffing demand.
///
/// Reported by the fill engine for demands it could not cover, and
/// attached to understaffed conflicts by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetDemand {
    /// Day of the shortfall.
    pub day: WeekDay,
    /// Rule whose demand fell short.
    pub rule_id: String,
    /// Which operator types qualify.
    pub required_type: RequiredType,
    /// Skill the operators must hold.
    pub skill: String,
    /// Tasks providing the skill this week.
    pub task_ids: Vec<String>,
    /// Operators the demand asked for.
    pub required: u32,
    /// Operators actually covering it.
    pub assigned: u32,
}

impl ResolvedRequirement {
    /// Day the requirement applies to.
    pub fn day(&self) -> WeekDay {
        match self {
            ResolvedRequirement::Staffing(r) => r.day,
            ResolvedRequirement::Pairing(c) => c.day,
        }
    }

    /// Rule the requirement was compiled from.
    pub fn rule_id(&self) -> &str {
        match self {
            ResolvedRequirement::Staffing(r) => &r.rule_id,
            ResolvedRequirement::Pairing(c) => &c.rule_id,
        }
    }
}

impl StaffingRequirement {
    /// Smallest total headcount across the alternatives.
    pub fn min_headcount(&self) -> u32 {
        self.alternatives
            .iter()
            .map(|alt| alternative_total(alt))
            .min()
            .unwrap_or(0)
    }
}

impl UnmetDemand {
    /// How many operators are still missing.
    #[inline]
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.assigned)
    }
}

/// Total headcount of one additive demand group.
pub fn alternative_total(demands: &[StaffingDemand]) -> u32 {
    demands.iter().map(|d| d.count).sum()
}

/// Staffing requirements applying to a day.
pub fn staffing_for_day(
    requirements: &[ResolvedRequirement],
    day: WeekDay,
) -> Vec<&StaffingRequirement> {
    requirements
        .iter()
        .filter_map(|r| match r {
            ResolvedRequirement::Staffing(s) if s.day == day => Some(s),
            _ => None,
        })
        .collect()
}

/// Pairing constraints applying to a day.
pub fn pairings_for_day(
    requirements: &[ResolvedRequirement],
    day: WeekDay,
) -> Vec<&PairingConstraint> {
    requirements
        .iter()
        .filter_map(|r| match r {
            ResolvedRequirement::Pairing(c) if c.day == day => Some(c),
            _ => None,
        })
        .collect()
}

/// Headcount the day's demands can justify on one task.
///
/// Per requirement, the most generous alternative is assumed (demands
/// could place their whole count on this task); requirements add up.
pub fn demand_allowance(requirements: &[ResolvedRequirement], day: WeekDay, task_id: &str) -> u32 {
    staffing_for_day(requirements, day)
        .iter()
        .map(|req| {
            req.alternatives
                .iter()
                .map(|alt| {
                    alt.iter()
                        .filter(|d| d.task_ids.iter().any(|t| t == task_id))
                        .map(|d| d.count)
                        .sum::<u32>()
                })
                .max()
                .unwrap_or(0)
        })
        .sum()
}

/// Headcount a task can reasonably hold on a day: the larger of its
/// configured baseline and what the day's demands justify.
pub fn effective_capacity(
    task: &TaskType,
    requirements: &[ResolvedRequirement],
    day: WeekDay,
) -> u32 {
    task.required_count()
        .max(demand_allowance(requirements, day, &task.id))
}

/// Expression tree for a numeric rule's conjunction chain.
///
/// Built once per rule from the positional `And`/`Or` markers, then
/// flattened to disjunctive normal form. `And` binds tighter than `Or`,
/// so `A and B or C` parses as `Alt(And(A, B), C)`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequirementExpr {
    Demand(SkillRequirement),
    And(Box<RequirementExpr>, Box<RequirementExpr>),
    Alt(Box<RequirementExpr>, Box<RequirementExpr>),
}

impl RequirementExpr {
    /// Builds the tree from a conjunction chain.
    ///
    /// The first entry's conjunction marker is ignored. Returns `None`
    /// for an empty chain.
    pub(crate) fn from_chain(entries: &[SkillRequirement]) -> Option<Self> {
        let mut iter = entries.iter();
        let mut current = RequirementExpr::Demand(iter.next()?.clone());
        let mut alternatives: Vec<RequirementExpr> = Vec::new();

        for entry in iter {
            let demand = RequirementExpr::Demand(entry.clone());
            match entry.conjunction {
                Conjunction::And => {
                    current = RequirementExpr::And(Box::new(current), Box::new(demand));
                }
                Conjunction::Or => {
                    alternatives.push(current);
                    current = demand;
                }
            }
        }
        alternatives.push(current);

        let mut iter = alternatives.into_iter();
        let mut expr = iter.next()?;
        for alt in iter {
            expr = RequirementExpr::Alt(Box::new(expr), Box::new(alt));
        }
        Some(expr)
    }

    /// Flattens the tree to alternatives of additive groups.
    pub(crate) fn alternatives(&self) -> Vec<Vec<SkillRequirement>> {
        match self {
            RequirementExpr::Demand(d) => vec![vec![d.clone()]],
            RequirementExpr::And(a, b) => {
                let left = a.alternatives();
                let right = b.alternatives();
                let mut out = Vec::with_capacity(left.len() * right.len());
                for l in &left {
                    for r in &right {
                        let mut group = l.clone();
                        group.extend(r.iter().cloned());
                        out.push(group);
                    }
                }
                out
            }
            RequirementExpr::Alt(a, b) => {
                let mut out = a.alternatives();
                out.extend(b.alternatives());
                out
            }
        }
    }
}
