use clap::Parser;
use log::info;
use std::process::ExitCode;

use grepui::highlighter::{default_palette, line_bounds, Highlighter};
use grepui::options::KEY_COMMAND;
use grepui::{CommandExecutor, ExecuteOutcome, OptionStore, PollStatus, POLL_INTERVAL};

/// Headless driver for the grepui core: run the templated command once,
/// wait for it, print the report, optionally highlight words in it.
#[derive(Parser, Debug)]
#[command(name = "grepui", version, about = "Templated log-search runner")]
struct Cli {
    /// Override an option value (repeatable), e.g. --set pattern=ERROR
    #[arg(short, long, value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Run this command template instead of the stored `command` option
    #[arg(long, value_name = "TEMPLATE")]
    command: Option<String>,

    /// Highlight a word in the report after the run (repeatable)
    #[arg(long = "highlight", value_name = "WORD")]
    highlight: Vec<String>,

    /// Print the option store and exit
    #[arg(long)]
    list_options: bool,

    /// Save the option values back to the options file after the run
    #[arg(long)]
    save: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let mut store = OptionStore::load();

    for assignment in &cli.set {
        let Some((key, value)) = assignment.split_once('=') else {
            eprintln!("--set expects KEY=VALUE, got {:?}", assignment);
            return ExitCode::FAILURE;
        };
        if !store.set_current_value(key, value) {
            eprintln!("Unknown option key {:?}", key);
            return ExitCode::FAILURE;
        }
    }

    if cli.list_options {
        for option in store.iter() {
            println!(
                "{:<20} {:<20} {:?}",
                option.key, option.display_name, option.current_value
            );
        }
        return ExitCode::SUCCESS;
    }

    let template = match cli.command.as_deref().or_else(|| store.value(KEY_COMMAND)) {
        Some(template) => template.to_string(),
        None => {
            eprintln!("No command template configured");
            return ExitCode::FAILURE;
        }
    };

    let output_path = store.output_path();
    let max_lines = store.max_lines();

    let mut executor = CommandExecutor::new();
    let outcome = executor.execute(
        &template,
        |key| store.value(key).map(String::from),
        &output_path,
        max_lines,
    );

    let report = match outcome {
        ExecuteOutcome::Scheduled => loop {
            std::thread::sleep(POLL_INTERVAL);
            match executor.poll() {
                PollStatus::StillRunning => continue,
                PollStatus::Finished(report) => break report,
                PollStatus::Idle => {
                    eprintln!("Run vanished without a report");
                    return ExitCode::FAILURE;
                }
            }
        },
        ExecuteOutcome::Rejected(advisory) => {
            eprintln!("{}", advisory);
            return ExitCode::FAILURE;
        }
        ExecuteOutcome::Failed(report) => {
            eprint!("{}", report);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", report);

    if !cli.highlight.is_empty() {
        print_highlights(&report, &cli.highlight);
    }

    if cli.save {
        if let Err(e) = store.save() {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

/// One highlighter per word, colors cycling through the stock palette;
/// prints every matched line the way a GUI host would select it.
fn print_highlights(report: &str, words: &[String]) {
    let palette = default_palette();

    for (i, word) in words.iter().enumerate() {
        let mut highlighter = Highlighter::new(palette[i % palette.len()].clone());
        highlighter.add(report, word);

        info!(
            "{} match(es) for {:?} [{}]",
            highlighter.bookmarks().len(),
            word,
            highlighter.color().name
        );

        println!("== {} ({}) ==", word, highlighter.color().name);
        for &bookmark in highlighter.bookmarks() {
            let (start, end) = line_bounds(report, bookmark);
            println!("{:>8}  {}", bookmark, &report[start..end]);
        }
    }
}
