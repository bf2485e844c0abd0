use crate::cli::commands::CommandDefinition;
use crate::cli::core::{parse_kind, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::render_table as output_table;
use crate::core::services::CategoryService;
use crate::domain::EntryKind;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "categories",
            "List categories",
            "categories [income|expense]",
            cmd_categories,
        ),
        CommandDefinition::new(
            "category-add",
            "Create a category",
            "category-add <income|expense> <name>",
            cmd_category_add,
        ),
    ]
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let tracker = context.manager.tracker();
    let categories = match args.first() {
        Some(kind) => CategoryService::for_kind(tracker, parse_kind(kind)?),
        None => CategoryService::list(tracker),
    };

    if categories.is_empty() {
        io::print_info("No categories defined.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|category| {
            vec![
                category.id.clone(),
                category.name.clone(),
                category.kind.to_string(),
            ]
        })
        .collect();
    output_table(&["ID", "Name", "Type"], &rows);
    Ok(())
}

fn cmd_category_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, name) = match args.split_first() {
        Some((kind, name)) if !name.is_empty() => (parse_kind(kind)?, name.join(" ")),
        _ if context.can_prompt() => {
            let kinds = [EntryKind::Expense, EntryKind::Income];
            let Some(idx) = io::select_index("Type", &kinds, 0)? else {
                io::print_info("Operation cancelled.");
                return Ok(());
            };
            (kinds[idx], io::prompt_text("Category name", None)?)
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: category-add <income|expense> <name>".into(),
            ))
        }
    };

    let category = context.manager.add_category(&name, kind)?;
    io::print_success(format!(
        "Added {} category `{}` [{}]",
        category.kind, category.name, category.id
    ));
    Ok(())
}
