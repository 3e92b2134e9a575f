use anyhow::Context;
use headline_detector_lib::init_cli_logging;
use headline_detector_lib::models::{CheckOutcome, PageInfo};
use headline_detector_lib::services::{ConfigStore, DetectorSources, HeadlineDetector};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const VALUE_FLAGS: &[&str] = &["--model", "--stopwords", "--config"];

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// Split at a bare `--`: options before it, verbatim headline words after it
fn split_at_separator(args: &[String]) -> (&[String], &[String]) {
    match args.iter().position(|a| a == "--") {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[]),
    }
}

/// Everything that is neither a flag nor a flag's value, joined into one headline.
/// Words after `--` are kept as-is, even when they look like flags.
fn positional_text(args: &[String]) -> String {
    let (options, verbatim) = split_at_separator(args);
    let mut words = Vec::new();
    let mut skip_next = false;
    for a in options {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&a.as_str()) {
            skip_next = true;
            continue;
        }
        if a.starts_with("--") {
            continue;
        }
        words.push(a.as_str());
    }
    words.extend(verbatim.iter().map(String::as_str));
    words.join(" ")
}

fn render(outcome: &CheckOutcome, show_cleaned: bool) {
    println!("{}", "-".repeat(60));
    match outcome {
        CheckOutcome::Warning { message } => println!("{}", message),
        CheckOutcome::Verdict(v) => {
            println!("{}", v.title);
            println!("{}", v.explanation);
            if let Some(line) = v.confidence_line() {
                println!("{}", line);
            }
            if show_cleaned {
                println!("Cleaned text: {:?}", v.cleaned_text);
            }
        }
    }
}

fn print_json(outcome: &CheckOutcome) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serialize outcome")?;
    println!("{}", json);
    Ok(())
}

fn interactive(detector: &HeadlineDetector, as_json: bool, show_cleaned: bool) -> anyhow::Result<()> {
    let page = PageInfo::default();
    if !as_json {
        println!("{}", page.header);
        println!("{}", page.intro.replace("**", ""));
        println!("{}", "-".repeat(60));
        println!("e.g. {}", page.placeholder);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !as_json {
            print!("{} ", page.input_label);
            io::stdout().flush().context("flush stdout")?;
        }
        let Some(line) = lines.next() else { break };
        let line = line.context("read headline")?;
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        let outcome = detector.check(&line)?;
        if as_json {
            print_json(&outcome)?;
        } else {
            render(&outcome, show_cleaned);
        }
    }

    if !as_json {
        println!("{}", "-".repeat(60));
        println!("{}", page.footer);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, _) = split_at_separator(&args);
    if has_flag(options, "--help") || has_flag(options, "-h") {
        eprintln!(
            "Usage:\n  check_headline [--model <pipeline.json>] [--stopwords <words.txt>] [--config <config.json>] [--json] [--verbose] [--] [<headline>...]\n\nWithout a headline, reads one headline per line from stdin (`quit` or EOF to stop).\nModel path falls back to HEADLINE_DETECTOR_MODEL, the config file, then ./fake_headline_pipeline.json."
        );
        return Ok(());
    }

    let as_json = has_flag(options, "--json");
    init_cli_logging(if has_flag(options, "--verbose") { "debug" } else { "warn" });

    let store = match parse_arg_value(options, "--config") {
        Some(p) => Some(ConfigStore::with_file(PathBuf::from(p))),
        None => ConfigStore::default_config_dir().map(ConfigStore::new),
    };
    let config = match &store {
        Some(s) => s.load().map_err(anyhow::Error::msg)?,
        None => Default::default(),
    };

    let sources = DetectorSources {
        model_path: parse_arg_value(options, "--model").map(PathBuf::from),
        stopwords_path: parse_arg_value(options, "--stopwords").map(PathBuf::from),
    }
    .resolve(&config);

    let detector = HeadlineDetector::load(&sources)
        .with_context(|| format!("cannot start without a model ({})", sources.model_path.display()))?;
    let show_cleaned = config.display.show_cleaned_text;

    let headline = positional_text(&args);
    if headline.is_empty() {
        return interactive(&detector, as_json, show_cleaned);
    }

    let outcome = detector.check(&headline)?;
    if as_json {
        print_json(&outcome)?;
    } else {
        render(&outcome, show_cleaned);
    }
    Ok(())
}
