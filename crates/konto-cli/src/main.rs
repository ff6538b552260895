//! Konto CLI - conversational banking knowledge-base assistant
//!
//! No language understanding happens here: slot values are passed in
//! verbatim, exactly as an upstream extractor would deliver them, and the
//! dialogue actions do the rest.

mod seed;

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use konto_core::config::Config;
use konto_core::domain::dialogue::actions::{action, dispatch};
use konto_core::domain::dialogue::{ActionResponse, Slots, slot};
use konto_core::domain::knowledge::KnowledgeBase;
use konto_core::domain::schema::SchemaRegistry;
use konto_core::infrastructure::sqlite::{Database, DatabaseConfig, SqliteKnowledgeBase};

#[derive(Parser)]
#[command(name = "konto")]
#[command(author, version, about = "Conversational knowledge-base assistant for personal banking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demo banking dataset into the knowledge base
    Seed {
        /// Replace existing graph data
        #[arg(long)]
        force: bool,
    },

    /// List entities of a type (runs action_query_entities)
    Entities {
        /// Entity-type token as the user would say it, e.g. "banks"
        entity_type: String,
        /// Extra slot assignments, e.g. --slot headquarters=Berlin
        #[arg(long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
    },

    /// Ask for an attribute of an entity (runs action_query_attribute)
    Attribute {
        /// Entity-type token, e.g. "banks"
        entity_type: String,
        /// Attribute token, e.g. "HQ"
        attribute: String,
        /// Extra slot assignments, e.g. --slot bank=N26 or --slot mention=first
        #[arg(long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
    },

    /// Interactive demo loop feeding slot values to actions
    Chat,
}

fn parse_slot(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let db = Database::new(DatabaseConfig::with_path(config.database_path()?)).await?;
    let schema = match &config.knowledge_base.schema_path {
        Some(path) => SchemaRegistry::load(path)?,
        None => SchemaRegistry::banking(),
    };
    let kb = SqliteKnowledgeBase::new(db.pool().clone(), &config.knowledge_base.principal);

    match cli.command {
        Commands::Seed { force } => {
            seed::run(db.pool(), &config.knowledge_base.principal, force).await?;
            println!("Knowledge base seeded at {}", db.path().display());
        }
        Commands::Entities { entity_type, slots } => {
            let mut turn = Slots::new().with(slot::ENTITY_TYPE, entity_type);
            for (name, value) in slots {
                turn.insert(name, value);
            }
            let response = dispatch(action::QUERY_ENTITIES, &kb, &schema, &turn).await?;
            print_response(&response, cli.format)?;
        }
        Commands::Attribute {
            entity_type,
            attribute,
            slots,
        } => {
            let mut turn = Slots::new()
                .with(slot::ENTITY_TYPE, entity_type)
                .with(slot::ATTRIBUTE, attribute);
            for (name, value) in slots {
                turn.insert(name, value);
            }
            let response = dispatch(action::QUERY_ATTRIBUTE, &kb, &schema, &turn).await?;
            print_response(&response, cli.format)?;
        }
        Commands::Chat => chat(&kb, &schema).await?,
    }

    Ok(())
}

fn print_response(response: &ActionResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
        OutputFormat::Text => {
            for message in &response.messages {
                println!("{message}");
            }
            if let Some(prompt) = &response.prompt {
                println!("[prompt: {prompt}]");
            }
        }
    }
    Ok(())
}

const CHAT_HELP: &str = "\
commands:
  set <slot> <value>    set a slot (listed_items is managed by the actions)
  clear <slot>          clear a slot
  slots                 show the current slot store
  run <action>          run a dialogue action, e.g. run action_query_entities
  help                  this text
  quit                  leave";

/// Line-based demo loop: maintains the slot store across turns and applies
/// each action's slot updates, the way the dialogue collaborator would.
async fn chat(kb: &dyn KnowledgeBase, schema: &SchemaRegistry) -> Result<()> {
    let mut slots = Slots::new();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("konto chat - type 'help' for commands");
    loop {
        print!("konto> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => println!("{CHAT_HELP}"),
            ["slots"] => println!("{}", serde_json::to_string_pretty(&slots)?),
            ["set", name, value @ ..] if !value.is_empty() => {
                slots.insert(name.to_string(), value.join(" "));
            }
            ["clear", name] => {
                slots.remove(name);
            }
            ["run", action_name] => match dispatch(action_name, kb, schema, &slots).await {
                Ok(response) => {
                    print_response(&response, OutputFormat::Text)?;
                    for update in response.slot_updates {
                        match update.value {
                            Some(value) => slots.insert(update.name, value),
                            None => {
                                slots.remove(&update.name);
                            }
                        }
                    }
                }
                Err(error) => eprintln!("error: {error}"),
            },
            _ => println!("unrecognized input, type 'help'"),
        }
    }

    Ok(())
}
