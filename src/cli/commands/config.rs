use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::config::{ConfigManager, CONFIG_KEYS};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change shell preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            let [_, key, value @ ..] = args else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            };
            let value = value.join(" ");
            ConfigManager::set(&mut context.config, key, &value)
                .map_err(CommandError::from_core)?;
            context.persist_config()?;
            io::print_success(format!("Set {}.", key));
            if *key == "data_dir" {
                io::print_hint("The new data directory is used from the next start.");
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show|set <key> <value>]".into(),
        )),
    }
}

fn show_config(context: &ShellContext) {
    let config = context.config();
    let manager = &context.config_manager;
    output_section("Configuration");
    io::print_info(format!("  currency_symbol : {}", config.currency_symbol));
    io::print_info(format!("  date_format     : {}", config.date_format));
    io::print_info(format!(
        "  export_dir      : {}",
        manager.export_dir(config).display()
    ));
    io::print_info(format!(
        "  data_dir        : {}",
        manager.data_dir(config).display()
    ));
    io::print_info(format!("  file            : {}", manager.path().display()));
}
