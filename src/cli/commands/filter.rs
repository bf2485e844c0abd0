use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::core::services::{FilterService, TransactionFilter};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "filter",
        "Show, set, or clear the session filter used by `list`",
        "filter [show|clear|type=..|category=..|from=YYYY-MM-DD|to=YYYY-MM-DD]",
        cmd_filter,
    )]
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show(context),
        [single] if single.eq_ignore_ascii_case("show") => show(context),
        [single] if single.eq_ignore_ascii_case("clear") => {
            context.filter = TransactionFilter::default();
            io::print_success("Filter cleared.");
            Ok(())
        }
        tokens => {
            let filter = FilterService::parse(context.filter.clone(), tokens)?;
            context.filter = context.resolve_filter(filter);
            io::print_success(format!("Filter set: {}", context.filter.describe()));
            Ok(())
        }
    }
}

fn show(context: &ShellContext) -> CommandResult {
    if context.filter.is_active() {
        io::print_info(format!("Filter: {}", context.filter.describe()));
    } else {
        io::print_info("No filter active.");
    }
    Ok(())
}
