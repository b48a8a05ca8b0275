use std::{fs, io::Read, path::PathBuf, process};

use clap::{Parser, ValueEnum};
use ll1_helper::{analyze, AnalysisOptions};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Parser)]
#[command(name = "ll1-helper")]
#[command(about = "Remove left recursion and left factoring, then compute FIRST/FOLLOW sets and the LL(1) table")]
struct Args {
    /// Grammar file, one `A -> alt1 | alt2` rule per line (stdin when absent)
    file: Option<PathBuf>,

    /// Eliminate immediate left recursion before factoring
    #[arg(long)]
    elr: bool,

    /// Also compute FOLLOW sets and the LL(1) parsing table
    #[arg(long)]
    ll1: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().lock().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() {
    let args = Args::parse();

    let input = read_input(args.file.as_ref()).unwrap_or_else(|e| {
        eprintln!("Failed to read grammar: {}", e);
        process::exit(1);
    });

    let options = AnalysisOptions {
        eliminate_left_recursion: args.elr,
        follow_and_table: args.ll1,
    };
    let transcript = analyze(&input, &options).unwrap_or_else(|e| {
        eprintln!("Parse error: {}", e);
        process::exit(1);
    });

    let output = match args.format {
        OutputFormat::Plain => transcript.to_plaintext(),
        OutputFormat::Latex => transcript.to_latex(),
        OutputFormat::Json => transcript.to_json().unwrap_or_else(|e| {
            eprintln!("Serialization error: {}", e);
            process::exit(1);
        }),
    };
    println!("{}", output);
}
