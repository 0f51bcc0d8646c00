//! Work week model.
//!
//! The planning horizon is a fixed five-day work week, Monday through
//! Friday. Weekend days are outside the model entirely: they cannot be
//! required, assigned, or excluded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A day of the five-day work week.
///
/// Ordering is chronological (`Mon < Tue < ... < Fri`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeekDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl WeekDay {
    /// All week days in chronological order.
    pub const ALL: [WeekDay; 5] = [
        WeekDay::Mon,
        WeekDay::Tue,
        WeekDay::Wed,
        WeekDay::Thu,
        WeekDay::Fri,
    ];

    /// Zero-based position within the week (Mon = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short English label ("Mon" .. "Fri").
    pub fn label(self) -> &'static str {
        match self {
            WeekDay::Mon => "Mon",
            WeekDay::Tue => "Tue",
            WeekDay::Wed => "Wed",
            WeekDay::Thu => "Thu",
            WeekDay::Fri => "Fri",
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_order() {
        assert!(WeekDay::Mon < WeekDay::Tue);
        assert!(WeekDay::Thu < WeekDay::Fri);

        let mut days = vec![WeekDay::Fri, WeekDay::Mon, WeekDay::Wed];
        days.sort();
        assert_eq!(days, vec![WeekDay::Mon, WeekDay::Wed, WeekDay::Fri]);
    }

    #[test]
    fn test_all_covers_week_in_order() {
        assert_eq!(WeekDay::ALL.len(), 5);
        for (i, day) in WeekDay::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(WeekDay::Mon.label(), "Mon");
        assert_eq!(WeekDay::Fri.to_string(), "Fri");
    }
}
