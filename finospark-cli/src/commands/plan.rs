//! Plan command - monthly SIP needed for a savings goal

use anyhow::Result;
use colored::Colorize;

use super::{get_logger, log_command, log_event};
use crate::output::{self, format_rupees};
use finospark_core::domain::goal::MAX_EXPECTED_RETURN;
use finospark_core::services::logging::events;
use finospark_core::services::plan_for;
use finospark_core::{GoalPlanInput, GoalPreset, LogEvent};

pub struct PlanArgs {
    pub amount: Option<f64>,
    pub years: Option<f64>,
    pub expected_return: Option<f64>,
    pub preset: Option<String>,
    pub list_presets: bool,
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "plan");

    if args.list_presets {
        return list_presets(args.json);
    }

    let input = resolve_input(&args)?;
    if input.expected_return > MAX_EXPECTED_RETURN && !args.json {
        output::warning(&format!(
            "Expected return above {}% is unusually optimistic",
            MAX_EXPECTED_RETURN
        ));
    }

    let plan = plan_for(&input);
    log_event(&logger, LogEvent::new(events::GOAL_PLANNED).with_command("plan"));

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "input": input,
                "plan": plan,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Goal Plan".bold());
    println!(
        "  Target {} in {} years at {}% a year",
        format_rupees(input.target_amount.round() as i64),
        input.years,
        input.expected_return
    );
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Monthly SIP".to_string(), format_rupees(plan.monthly_investment)]);
    table.add_row(vec!["Months".to_string(), plan.months.to_string()]);
    table.add_row(vec!["Total invested".to_string(), format_rupees(plan.total_invested)]);
    table.add_row(vec!["Growth".to_string(), format_rupees(plan.growth_gain)]);
    table.add_row(vec!["Projected corpus".to_string(), format_rupees(plan.projected_corpus)]);
    println!("{}", table);

    Ok(())
}

/// Explicit flags override the preset's values, which override defaults
fn resolve_input(args: &PlanArgs) -> Result<GoalPlanInput> {
    let base = match &args.preset {
        Some(name) => GoalPreset::find(name)
            .map(GoalPreset::input)
            .ok_or_else(|| anyhow::anyhow!("Unknown preset '{}'. Use --list-presets to see them.", name))?,
        None => GoalPlanInput::default(),
    };

    Ok(GoalPlanInput::new(
        args.amount.unwrap_or(base.target_amount),
        args.years.unwrap_or(base.years),
        args.expected_return.unwrap_or(base.expected_return),
    ))
}

fn list_presets(json: bool) -> Result<()> {
    let presets = GoalPreset::all();
    if json {
        println!("{}", serde_json::to_string_pretty(presets)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Preset", "Amount", "Years", "Return %"]);
    for preset in presets {
        table.add_row(vec![
            preset.label.to_string(),
            format_rupees(preset.amount.round() as i64),
            preset.years.to_string(),
            preset.expected_return.to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
