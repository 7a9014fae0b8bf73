//! `stocktag` - CLI for the stocktag inventory
//!
//! Each invocation opens the inventory, runs one command, saves what changed
//! and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use stocktag::cli::{
    ActionCommand, Cli, Command, ConfigCommand, ItemCommand, LocationCommand, OutputFormat,
    SearchCommand,
};
use stocktag::{init_logging, Config, Error, Item, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let result = run(cli);
    let status = exit_status(&result);
    if let Err(err) = &result {
        if status == USER_ERROR {
            eprintln!("warning: {}", err.root_cause());
        } else {
            eprintln!("error: {err:#}");
        }
    }
    ExitCode::from(status)
}

/// Exit status for a mistake the user can correct.
const USER_ERROR: u8 = 1;

/// Exit status for anything else that stopped the command.
const FATAL_ERROR: u8 = 2;

/// Map the outcome of a command to the process exit status.
fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => match err.downcast_ref::<Error>() {
            Some(err) if err.is_user_error() => USER_ERROR,
            _ => FATAL_ERROR,
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config).context("loading configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Location(location_cmd) => {
            handle_location(&mut open_session(&config)?, location_cmd)
        }
        Command::Item(ItemCommand::Save(save_cmd)) => {
            let outcome = open_session(&config)?.save_item(save_cmd.into())?;
            println!("{outcome}");
            if outcome.is_created() {
                println!("Name tag: {}", outcome.item().barcode_img.display());
            }
            Ok(())
        }
        Command::Action(action_cmd) => handle_action(&mut open_session(&config)?, &action_cmd),
        Command::Search(search_cmd) => handle_search(&open_session(&config)?, &search_cmd),
        Command::Status(status_cmd) => handle_status(&open_session(&config)?, status_cmd.json),
    }
}

fn open_session(config: &Config) -> anyhow::Result<Session> {
    Session::open(config).context("opening inventory")
}

fn handle_location(session: &mut Session, cmd: LocationCommand) -> anyhow::Result<()> {
    match cmd {
        LocationCommand::Add { name } => {
            if session.add_location(&name)? {
                println!("Added location '{name}'.");
            } else if name.is_empty() {
                eprintln!("warning: location name is empty");
            } else {
                println!("'{name}' already exists in locations.");
            }
        }
        LocationCommand::Delete { name } => {
            if session.delete_location(&name)? {
                println!("Deleted location '{name}'.");
            } else {
                eprintln!("warning: unknown location '{name}'");
            }
        }
        LocationCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.locations())?);
            } else {
                for location in session.locations().iter() {
                    println!("{location}");
                }
            }
        }
    }
    Ok(())
}

fn handle_action(session: &mut Session, cmd: &ActionCommand) -> anyhow::Result<()> {
    let outcome = session.run_action(cmd.action.into(), &cmd.name)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{outcome}");
    }
    Ok(())
}

fn handle_search(session: &Session, cmd: &SearchCommand) -> anyhow::Result<()> {
    let results = session.search_by_name(&cmd.query);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        _ if results.is_empty() => println!("No items found."),
        OutputFormat::Table => print_table(&results),
        OutputFormat::Plain => {
            for item in results {
                println!("{}", item.name);
                println!("  Location: {}", item.location);
                println!("  Price:    {}", item.display_price());
                println!("  Misc:     {}", item.misc);
                println!("  Tag:      {}", item.barcode_img.display());
                if let Some(photo) = item.existing_photo() {
                    println!("  Photo:    {}", photo.display());
                }
                println!();
            }
        }
    }
    Ok(())
}

fn print_table(items: &[&Item]) {
    let rows: Vec<[String; 4]> = items
        .iter()
        .map(|item| {
            [
                item.name.clone(),
                item.location.clone(),
                item.display_price(),
                item.misc.replace('\n', " "),
            ]
        })
        .collect();
    let header = ["NAME", "LOCATION", "PRICE", "MISC"];

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}  {:<w1$}  {:>w2$}  {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )
    };

    println!("{}", line(header));
    for row in &rows {
        println!(
            "{}",
            line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()])
        );
    }
}

fn handle_status(session: &Session, json: bool) -> anyhow::Result<()> {
    let stats = session.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("stocktag status");
        println!("---------------");
        println!("Items:           {}", stats.items);
        println!("With photo:      {}", stats.photos);
        println!("Locations:       {}", stats.locations);
        println!("Records file:    {}", stats.records_path.display());
        println!("Locations file:  {}", stats.locations_path.display());
        println!("Items dir:       {}", stats.items_dir.display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Records file:   {}", config.records_path().display());
                println!("  Locations file: {}", config.locations_path().display());
                println!("  Items dir:      {}", config.items_dir().display());
                println!();
                println!("[Render]");
                println!("  QR module size: {}", config.render.qr_module_size);
                println!("  QR quiet zone:  {}", config.render.qr_quiet_zone);
                println!(
                    "  Name canvas:    {}x{}",
                    config.render.canvas_width, config.render.canvas_height
                );
                println!(
                    "  Text origin:    ({}, {})",
                    config.render.text_x, config.render.text_y
                );
                println!("  Text scale:     {}", config.render.text_scale);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
