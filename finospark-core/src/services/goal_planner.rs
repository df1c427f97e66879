//! Goal planner - monthly SIP needed to reach a target corpus
//!
//! Contributions compound monthly as an annuity-due. Inputs are clamped
//! into range rather than rejected, so planning never fails. Rounding is
//! applied once, after all the arithmetic.

use crate::domain::{GoalPlan, GoalPlanInput, GoalPreset};

/// Number of monthly contributions for a horizon, at least one
pub fn months_for(years: f64) -> u32 {
    let months = (years * 12.0).round();
    if months.is_nan() || months < 1.0 {
        1
    } else if months > u32::MAX as f64 {
        u32::MAX
    } else {
        months as u32
    }
}

/// Future value of one unit paid at the start of each month for `months`
/// months at monthly rate `rate`
pub fn annuity_due_factor(rate: f64, months: u32) -> f64 {
    if rate == 0.0 {
        return months as f64;
    }
    let growth = (1.0 + rate).powf(months as f64);
    ((growth - 1.0) / rate) * (1.0 + rate)
}

/// Compute a SIP plan
pub fn plan(target_amount: f64, years: f64, expected_return: f64) -> GoalPlan {
    let target = non_negative(target_amount);
    let annual_return = non_negative(expected_return);
    let months = months_for(years);

    let monthly_rate = annual_return / 100.0 / 12.0;
    let factor = annuity_due_factor(monthly_rate, months);

    let monthly_investment = if factor == 0.0 { 0.0 } else { target / factor };
    let projected_corpus = monthly_investment * factor;
    let total_invested = monthly_investment * months as f64;

    GoalPlan {
        months,
        monthly_investment: round_amount(monthly_investment),
        projected_corpus: round_amount(projected_corpus),
        total_invested: round_amount(total_invested),
        growth_gain: round_amount(projected_corpus - total_invested).max(0),
    }
}

/// Compute a plan from a structured input
pub fn plan_for(input: &GoalPlanInput) -> GoalPlan {
    plan(input.target_amount, input.years, input.expected_return)
}

/// Compute the plan for one of the shortcut goals
pub fn plan_preset(preset: &GoalPreset) -> GoalPlan {
    plan_for(&preset.input())
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else if value == f64::INFINITY {
        f64::MAX
    } else {
        0.0
    }
}

fn round_amount(value: f64) -> i64 {
    // `as` saturates, which is what we want for absurd targets
    value.round() as i64
}
