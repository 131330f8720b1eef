use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use waypoint_core::{system_instruction, LabelSet, Language, ReplyParser};
use waypoint_observability::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "waypoint")]
#[command(about = "Extract places and routes from travel assistant replies")]
struct Cli {
    /// Protocol label set the replies are written with (`en` or `pt`).
    #[arg(long, env = "WAYPOINT_LABELS", default_value = "en")]
    labels: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a reply from PATH, or stdin when omitted, and print it as JSON.
    Parse { path: Option<PathBuf> },
    /// Print the instruction sent to the text backend.
    Instruction {
        #[arg(long, default_value = "pt")]
        lang: String,
    },
}

fn main() -> Result<()> {
    init_tracing("waypoint_cli");
    let cli = Cli::parse();

    let labels = LabelSet::from_code(&cli.labels).context("invalid --labels value")?;

    match cli.command {
        Command::Parse { path } => {
            let text = read_reply(path.as_ref())?;
            let parser = ReplyParser::new(labels)?;
            let parsed = parser.parse(&text);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Instruction { lang } => {
            let language = Language::from_optional_str(Some(lang.as_str()));
            println!("{}", system_instruction(labels, language));
        }
    }

    Ok(())
}

fn read_reply(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed reading reply from {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed reading reply from stdin")?;
            Ok(text)
        }
    }
}
