//! Goal planning domain model

use serde::{Deserialize, Serialize};

/// Upper bound the planner UI offers for the expected annual return
pub const MAX_EXPECTED_RETURN: f64 = 20.0;

/// Smallest horizon step (a quarter year) the planner UI offers
pub const YEARS_STEP: f64 = 0.25;

/// Inputs for a monthly SIP plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlanInput {
    pub target_amount: f64,
    pub years: f64,
    /// Annual return in percent, e.g. 11.0 for 11%
    pub expected_return: f64,
}

impl GoalPlanInput {
    pub fn new(target_amount: f64, years: f64, expected_return: f64) -> Self {
        Self {
            target_amount,
            years,
            expected_return,
        }
    }
}

impl Default for GoalPlanInput {
    fn default() -> Self {
        Self::new(750_000.0, 3.0, 11.0)
    }
}

/// Result of a goal plan. All money values are rounded rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub months: u32,
    pub monthly_investment: i64,
    pub projected_corpus: i64,
    pub total_invested: i64,
    pub growth_gain: i64,
}

/// Shortcut goal offered next to the planner inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPreset {
    pub label: &'static str,
    pub amount: f64,
    pub years: f64,
    pub expected_return: f64,
}

const PRESETS: [GoalPreset; 3] = [
    GoalPreset {
        label: "Gadget (Rs 2L / 1 yr)",
        amount: 200_000.0,
        years: 1.0,
        expected_return: 8.0,
    },
    GoalPreset {
        label: "Wedding (Rs 12L / 3 yrs)",
        amount: 1_200_000.0,
        years: 3.0,
        expected_return: 11.0,
    },
    GoalPreset {
        label: "House fund (Rs 25L / 5 yrs)",
        amount: 2_500_000.0,
        years: 5.0,
        expected_return: 12.0,
    },
];

impl GoalPreset {
    pub fn all() -> &'static [GoalPreset] {
        &PRESETS
    }

    /// Find a preset by its leading word, case-insensitive ("wedding", "house")
    pub fn find(name: &str) -> Option<&'static GoalPreset> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        PRESETS
            .iter()
            .find(|p| p.label.to_lowercase().starts_with(&needle))
    }

    pub fn input(&self) -> GoalPlanInput {
        GoalPlanInput::new(self.amount, self.years, self.expected_return)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_preset() {
        assert_eq!(GoalPreset::find("wedding").unwrap().amount, 1_200_000.0);
        assert_eq!(GoalPreset::find("House").unwrap().years, 5.0);
        assert!(GoalPreset::find("yacht").is_none());
        assert!(GoalPreset::find("  ").is_none());
    }

    #[test]
    fn test_presets_within_ui_bounds() {
        for preset in GoalPreset::all() {
            assert!(preset.expected_return <= MAX_EXPECTED_RETURN);
            assert_eq!((preset.years / YEARS_STEP).fract(), 0.0);
        }
    }
}
