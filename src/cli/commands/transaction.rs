use chrono::{Local, NaiveDate};
use dialoguer::Input;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{
    parse_amount, parse_date, parse_kind, short_id, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::render_table as output_table;
use crate::core::services::{CategoryService, FilterService};
use crate::domain::{EntryKind, NewTransaction};

const ADD_USAGE: &str = "usage: add <income|expense> <amount> <category> [YYYY-MM-DD] [notes]";
const NEW_CATEGORY_OPTION: &str = "+ Add category";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an income or expense",
            "add <income|expense> <amount> <category> [YYYY-MM-DD] [notes]",
            cmd_add,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a transaction by id or id prefix",
            "delete <id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "list",
            "List transactions, optionally filtered",
            "list [type=..] [category=..] [from=YYYY-MM-DD] [to=YYYY-MM-DD]",
            cmd_list,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.can_prompt() {
        match prompt_transaction(context)? {
            Some(draft) => draft,
            None => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        }
    } else {
        draft_from_args(context, args)?
    };

    let txn = context.manager.add_transaction(draft)?;
    io::print_success(format!(
        "Added {} {} ({}) on {} [{}]",
        txn.kind,
        context.format_amount(txn.amount),
        context.manager.tracker().category_name(&txn.category_id),
        context.format_date(txn.date),
        short_id(&txn.id)
    ));
    if let Some(warning) = kind_mismatch(context, &txn.category_id, txn.kind) {
        io::print_warning(warning);
    }
    Ok(())
}

/// Category type is advisory; recording against the other type only warns.
fn kind_mismatch(context: &ShellContext, category_id: &str, kind: EntryKind) -> Option<String> {
    let category = context.manager.tracker().category(category_id)?;
    (category.kind != kind).then(|| {
        format!(
            "`{}` is an {} category; recorded as {} anyway",
            category.name, category.kind, kind
        )
    })
}

fn draft_from_args(context: &ShellContext, args: &[&str]) -> Result<NewTransaction, CommandError> {
    let [kind, amount, category, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(ADD_USAGE.into()));
    };
    let kind = parse_kind(kind)?;
    let amount = parse_amount(amount)?;
    let category_id = resolve_category(context, category)?;

    let (date, notes) = match rest.split_first() {
        Some((first, notes)) if looks_like_date(first) => (parse_date(first)?, notes),
        _ => (today(), rest),
    };

    let draft = NewTransaction::new(kind, amount, date, category_id);
    Ok(if notes.is_empty() {
        draft
    } else {
        draft.with_notes(notes.join(" "))
    })
}

fn resolve_category(context: &ShellContext, token: &str) -> Result<String, CommandError> {
    CategoryService::resolve(context.manager.tracker(), token)
        .map(|category| category.id.clone())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown category `{}` (see `categories`)",
                token
            ))
        })
}

fn looks_like_date(token: &str) -> bool {
    token.len() == 10
        && token.matches('-').count() == 2
        && token.starts_with(|c: char| c.is_ascii_digit())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn prompt_transaction(context: &mut ShellContext) -> Result<Option<NewTransaction>, CommandError> {
    let kinds = [EntryKind::Expense, EntryKind::Income];
    let Some(kind_idx) = io::select_index("Type", &kinds, 0)? else {
        return Ok(None);
    };
    let kind = kinds[kind_idx];

    let amount: String = Input::with_theme(&context.theme)
        .with_prompt("Amount")
        .validate_with(|input: &String| -> Result<(), &str> {
            match parse_amount(input) {
                Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
                _ => Err("Enter a positive number"),
            }
        })
        .interact_text()?;
    let amount = parse_amount(&amount)?;

    let Some(category_id) = prompt_category(context, kind)? else {
        return Ok(None);
    };

    let today = today().format("%Y-%m-%d").to_string();
    let date: String = Input::with_theme(&context.theme)
        .with_prompt("Date (YYYY-MM-DD)")
        .default(today)
        .validate_with(|input: &String| -> Result<(), &str> {
            parse_date(input.trim())
                .map(|_| ())
                .map_err(|_| "Use YYYY-MM-DD")
        })
        .interact_text()?;
    let date = parse_date(date.trim())?;

    let notes = io::prompt_optional_text("Notes (optional)")?;
    let draft = NewTransaction::new(kind, amount, date, category_id);
    Ok(Some(match notes {
        Some(notes) => draft.with_notes(notes),
        None => draft,
    }))
}

/// Picks a category of `kind`, offering to create one inline.
fn prompt_category(
    context: &mut ShellContext,
    kind: EntryKind,
) -> Result<Option<String>, CommandError> {
    let (mut ids, mut labels): (Vec<String>, Vec<String>) = context
        .manager
        .tracker()
        .categories_of_kind(kind)
        .map(|category| (category.id.clone(), category.name.clone()))
        .unzip();
    labels.push(NEW_CATEGORY_OPTION.to_string());

    let Some(choice) = io::select_index("Category", &labels, 0)? else {
        return Ok(None);
    };
    if choice < ids.len() {
        return Ok(Some(ids.swap_remove(choice)));
    }

    let name = io::prompt_text("New category name", None)?;
    let category = context.manager.add_category(&name, kind)?;
    io::print_success(format!("Category `{}` added.", category.name));
    Ok(Some(category.id))
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = match args.first() {
        Some(token) => context.resolve_transaction_id(token)?,
        None if context.can_prompt() => match select_transaction(context)? {
            Some(id) => id,
            None => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        },
        None => return Err(CommandError::InvalidArguments("usage: delete <id>".into())),
    };

    let removed = context.manager.delete_transaction(&id)?;
    io::print_success(format!(
        "Deleted {} {} from {} [{}]",
        removed.kind,
        context.format_amount(removed.amount),
        context.format_date(removed.date),
        short_id(&removed.id)
    ));
    Ok(())
}

fn select_transaction(context: &ShellContext) -> Result<Option<String>, CommandError> {
    let tracker = context.manager.tracker();
    if tracker.transactions.is_empty() {
        io::print_info("No transactions found");
        return Ok(None);
    }
    let labels: Vec<String> = tracker
        .transactions
        .iter()
        .map(|txn| {
            format!(
                "{}  {}  {}",
                context.format_date(txn.date),
                tracker.category_name(&txn.category_id),
                context.format_signed(txn)
            )
        })
        .collect();
    Ok(io::select_index("Transaction to delete", &labels, 0)?
        .map(|idx| tracker.transactions[idx].id.clone()))
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = FilterService::parse(context.filter.clone(), args)?;
    let filter = context.resolve_filter(filter);
    let tracker = context.manager.tracker();
    let matches = context.manager.filtered(&filter);

    if matches.is_empty() {
        io::print_info("No transactions found");
        if filter.is_active() {
            io::print_hint(format!(
                "Filter: {} (use `filter clear` to reset)",
                filter.describe()
            ));
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = matches
        .iter()
        .map(|txn| {
            vec![
                short_id(&txn.id),
                context.format_date(txn.date),
                txn.kind.to_string(),
                tracker.category_name(&txn.category_id).to_string(),
                context.format_signed(txn),
                txn.notes.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    output_table(
        &["ID", "Date", "Type", "Category", "Amount", "Notes"],
        &rows,
    );
    io::print_info(format!(
        "{} of {} transactions",
        matches.len(),
        tracker.transaction_count()
    ));
    Ok(())
}
