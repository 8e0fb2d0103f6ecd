use std::{fs::File, io::BufReader};

use anyhow::Context;
use clap::Parser;
use fa_min_lib::{
    automaton::{batch::BatchResult, spec},
    config::{FaMinConfig, OutputFormat},
    logger::{LogLevel, Logger},
};

use crate::report::Report;

mod report;

#[derive(Parser, Debug)]
#[command(name = "Finite Automaton Minimizer")]
#[command(version = "0.1")]
#[command(about = "Minimize DFAs and test strings against them", long_about = None)]
struct Args {
    /// The automaton in spec format.
    file: String,

    /// Strings to classify, one per line.
    strings: Option<String>,

    /// Maximum number of strings to classify. Overrides the config.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Print the resulting automaton as a graphviz digraph.
    #[arg(long)]
    graphviz: bool,
}

fn tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = FaMinConfig::from_optional_file(args.config.as_ref())?;
    if let Some(count) = args.count {
        config = config.with_batch_limit(count);
    }
    if let Some(format) = args.format {
        config = config.with_output(format);
    }
    if args.graphviz {
        config = config.with_output(OutputFormat::Graphviz);
    }

    if config.logger.enabled {
        tracing_subscriber::fmt()
            .with_max_level(tracing_level(config.logger.log_level))
            .with_writer(std::io::stderr)
            .init();
    }

    let logger = Logger::from_config(&config.logger, "fa-min".into())?;

    let automaton = spec::from_file(&args.file)?;
    if let Some(l) = &logger {
        l.object("Automaton")
            .add_field("file", &args.file)
            .add_field("states", automaton.state_count())
            .add_field("symbols", automaton.alphabet().len())
            .add_field("nfa", automaton.is_nondeterministic())
            .log(LogLevel::Debug);
    }

    let minimized = automaton.minimize_with_partitions();
    if minimized.is_none()
        && let Some(l) = &logger
    {
        l.warn(&format!(
            "{} is an NFA, minimization is not applicable",
            args.file
        ));
    }
    let (result, partitions) = match &minimized {
        Some((dfa, partitions)) => (dfa, Some(partitions)),
        None => (&automaton, None),
    };

    let results: Vec<BatchResult> = match &args.strings {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open strings file {}", path))?;
            result.evaluate_lines(BufReader::new(file), config.batch_limit)?
        }
        None => vec![],
    };

    if let Some(l) = &logger {
        l.info(&format!(
            "{} states reduced to {}, {} strings classified",
            automaton.state_count(),
            result.state_count(),
            results.len()
        ));
    }

    let report = Report {
        source: &args.file,
        minimized: minimized.is_some(),
        original_states: automaton.state_count(),
        automaton: result,
        partitions,
        results: &results,
    };

    match config.output {
        OutputFormat::Text => print!("{}", report.to_text(config.results_per_row)),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Graphviz => {
            print!("{}", result.to_graphviz());
            if !results.is_empty() {
                eprint!(
                    "{}",
                    report::format_verdicts(&results, config.results_per_row)
                );
            }
        }
    }

    Ok(())
}
