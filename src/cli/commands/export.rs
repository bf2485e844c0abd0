use std::path::PathBuf;

use chrono::Utc;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "export",
        "Export all transactions as CSV (`-` prints to stdout)",
        "export [dir|-]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.first() == Some(&"-") {
        match context.manager.export_csv() {
            Some(document) => println!("{}", document),
            None => io::print_warning("No transactions to export."),
        }
        return Ok(());
    }

    let dir = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => context.config_manager.export_dir(context.config()),
    };
    let today = Utc::now().date_naive();
    match context.manager.export_to_dir(&dir, today)? {
        Some(path) => io::print_success(format!(
            "Exported {} transactions to {}",
            context.manager.tracker().transaction_count(),
            path.display()
        )),
        None => io::print_warning("No transactions to export."),
    }
    Ok(())
}
