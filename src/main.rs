use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use jsonforge::config::Config;
use jsonforge::document::parser::to_json_string_indented;
use jsonforge::file::loader::{load_json_file, load_json_from_stdin};
use jsonforge::file::saver::save_json_file;

/// jsonforge - validate and reformat structural JSON documents
#[derive(Parser)]
#[command(name = "jsonforge")]
#[command(version)]
#[command(about = "Validate and pretty-print JSON documents", long_about = None)]
struct Cli {
    /// JSON file to read (omit to read from piped stdin; .gz is decompressed)
    file: Option<String>,

    /// Write the formatted document here instead of stdout (.gz compresses)
    #[arg(short, long)]
    output: Option<String>,

    /// Indentation width, overriding the config file
    #[arg(short, long)]
    indent: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(indent) = cli.indent {
        config.indent_size = indent;
    }

    let tree = match cli.file {
        Some(path) => load_json_file(&path)?,
        None => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("No input: pass a file argument or pipe JSON to stdin");
            }
            load_json_from_stdin()?
        }
    };

    match cli.output {
        Some(path) => save_json_file(&path, &tree, &config)?,
        None => println!("{}", to_json_string_indented(&tree, config.indent_size)),
    }

    Ok(())
}
