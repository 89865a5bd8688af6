mod cli;

use anyhow::{anyhow, Result};
use clap::Parser as ClapParser;
use colored::*;
use tracing::{debug, Level};

use ergo_runtime::config::{self, RuntimeConfig};
use ergo_runtime::libs::io::Console;
use ergo_runtime::runtime::{self, Value};

use crate::cli::{Args, Commands, Hint};

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env()?;
    runtime::init(config);

    let outcome = match args.command {
        Commands::Format { template, args } => format_template(&template, &args),
        Commands::Scan { template, hints } => scan_stdin(&template, &hints),
        Commands::Info { json } => show_info(json),
    };

    // Whatever was written before a failing command still goes out
    let flushed = finish();
    outcome.and(flushed)
}

/// Interpret a command-line word as an Ergo literal
fn parse_literal(word: &str) -> Value {
    match word {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = word.parse::<i64>() {
        return Value::Int(n);
    }
    if word.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(x) = word.parse::<f64>() {
            return Value::Float(x);
        }
    }
    Value::str(word)
}

fn hint_value(hint: Hint) -> Value {
    match hint {
        Hint::Int => Value::Int(0),
        Hint::Float => Value::Float(0.0),
        Hint::Bool => Value::Bool(false),
        Hint::Str => Value::str(""),
    }
}

fn format_template(template: &str, words: &[String]) -> Result<()> {
    let values: Vec<Value> = words.iter().map(|w| parse_literal(w)).collect();
    debug!(count = values.len(), "formatting arguments");

    Console::writef(&Value::str(template), &values)?;
    Console::write(&Value::str("\n"));
    Ok(())
}

fn scan_stdin(template: &str, hints: &[Hint]) -> Result<()> {
    let template = Value::str(template);
    let hints: Vec<Value> = hints.iter().copied().map(hint_value).collect();

    let mut lines = 0usize;
    loop {
        let line = Console::read_line();
        if line.is_null() {
            break;
        }
        let captures = Console::scanf(&template, &line, &hints)?;
        let rendered: Vec<String> = captures
            .as_array()
            .to_vec()
            .iter()
            .map(|v| format!("{:?}", v))
            .collect();
        Console::writeln(&Value::str(&format!("[{}]", rendered.join(", "))));
        lines += 1;
    }
    debug!(lines, "scan finished");
    Ok(())
}

fn show_info(json: bool) -> Result<()> {
    let active = config::active();
    if json {
        println!("{}", active.to_json()?);
        return Ok(());
    }

    println!("{}", "Ergo Runtime".bright_cyan().bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Configuration:");
    println!("  {} stdout buffering: {:?}", "•".green(), active.stdout_buffering);
    println!("  {} trap hint: {}", "•".green(), active.trap_hint);
    println!();
    println!("Environment:");
    println!("  {}  auto | line | full", config::ENV_STDOUT_BUFFER.bright_yellow());
    println!("  {}      true | false", config::ENV_TRAP_HINT.bright_yellow());
    Ok(())
}

fn finish() -> Result<()> {
    match Console::flush() {
        Value::Bool(true) => Ok(()),
        _ => Err(anyhow!("failed to flush stdout")),
    }
}
