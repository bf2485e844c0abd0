use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table as output_table, section as output_section};
use crate::core::services::SummaryService;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "summary",
        "Show totals, the monthly breakdown, and spending by category",
        "summary",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.manager.summary();

    output_section("Summary");
    io::print_info(format!(
        "  Income   : {}",
        context.format_amount(summary.total_income)
    ));
    io::print_info(format!(
        "  Expenses : {}",
        context.format_amount(summary.total_expense)
    ));
    io::print_info(format!(
        "  Balance  : {}",
        context.format_amount(summary.balance)
    ));

    if summary.monthly.is_empty() {
        io::print_hint("No transactions yet. Use `add` to record one.");
        return Ok(());
    }

    output_section("Monthly");
    let rows: Vec<Vec<String>> = SummaryService::sorted_months(&summary)
        .into_iter()
        .filter_map(|month| summary.monthly.get(month).map(|totals| (month, totals)))
        .map(|(month, totals)| {
            vec![
                month.to_string(),
                context.format_amount(totals.income),
                context.format_amount(totals.expense),
                context.format_amount(totals.net()),
            ]
        })
        .collect();
    output_table(&["Month", "Income", "Expenses", "Net"], &rows);

    output_section("By category");
    let tracker = context.manager.tracker();
    let rows: Vec<Vec<String>> = summary
        .by_category
        .iter()
        .map(|entry| {
            vec![
                tracker.category_name(&entry.category_id).to_string(),
                entry.kind.to_string(),
                context.format_amount(entry.total),
            ]
        })
        .collect();
    output_table(&["Category", "Type", "Total"], &rows);
    Ok(())
}
