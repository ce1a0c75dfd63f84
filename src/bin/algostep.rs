//! Terminal front end: step through an algorithm, autoplay it, or dump its trace.

use algostep::config::load_config;
use algostep::core::{AlgorithmKind, HighlightSets, SearchTarget, WorkingSequence};
use algostep::session::{Command, Frame, Session, SessionHandle};
use algostep::{observability, trace, SpeedPreset};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Step through bubble sort, selection sort, linear search or binary search.
///
/// Without flags, reads commands from stdin: Enter or `n` advances one step.
#[derive(Parser)]
#[command(name = "algostep", version)]
struct Cli {
    /// bubble, selection, linear_search or binary_search
    #[arg(short, long)]
    algorithm: Option<AlgorithmKind>,

    /// Name to look for in linear search
    #[arg(long)]
    target_name: Option<String>,

    /// Number to look for in binary search
    #[arg(long)]
    target_number: Option<i64>,

    /// slow, normal or fast
    #[arg(short, long)]
    speed: Option<SpeedPreset>,

    /// Play to the end on a timer, then exit
    #[arg(long)]
    autoplay: bool,

    /// Extra TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every snapshot from reset to done as JSON and exit
    #[arg(long)]
    trace: bool,
}

enum Input {
    Send(Command),
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  n | <enter>       advance one step
  p                 start / pause autoplay
  r                 reset
  a <algorithm>     switch algorithm (bubble, selection, linear_search, binary_search)
  t <value>         set the search target (start phase only)
  s <speed>         slow, normal or fast
  h                 this help
  q                 quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init();

    let mut config = load_config(cli.config.clone()).context("loading configuration")?;
    if let Some(algorithm) = cli.algorithm {
        config.session.algorithm = algorithm;
    }
    if let Some(name) = cli.target_name {
        config.session.target_name = name;
    }
    if let Some(number) = cli.target_number {
        config.session.target_number = number;
    }
    if let Some(speed) = cli.speed {
        config.session.speed = speed;
    }
    let options = config.session_options();

    if cli.trace {
        let snapshots = trace(options.algorithm, &options.targets);
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    let handle = Session::spawn(options, config.narration.build_gateway());
    let printer = tokio::spawn(print_frames(handle.frames()));

    if cli.autoplay {
        handle.send(Command::ToggleAutoplay).await?;
        handle
            .wait_for(|frame| frame.snapshot.is_terminal() && !frame.narrating)
            .await?;
    } else {
        println!("{HELP}");
        repl(&handle).await?;
    }

    handle.shutdown().await?;
    printer.abort();
    Ok(())
}

async fn repl(handle: &SessionHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let kind = handle.current().snapshot.kind();
        match parse_input(&line, kind) {
            Ok(Input::Send(command)) => handle.send(command).await?,
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }
    Ok(())
}

fn parse_input(line: &str, kind: AlgorithmKind) -> Result<Input, String> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match head {
        "" | "n" => Command::Advance,
        "p" => Command::ToggleAutoplay,
        "r" => Command::Reset,
        "h" | "?" => return Ok(Input::Help),
        "q" => return Ok(Input::Quit),
        "a" => Command::SelectAlgorithm(rest.parse::<AlgorithmKind>().map_err(|e| format!("{e}"))?),
        "s" => Command::SetSpeed(rest.parse::<SpeedPreset>().map_err(|e| format!("{e}"))?),
        "t" => match kind {
            AlgorithmKind::BinarySearch => Command::EditTarget(SearchTarget::Number(
                rest.parse()
                    .map_err(|_| format!("'{rest}' is not a whole number"))?,
            )),
            AlgorithmKind::LinearSearch => Command::EditTarget(SearchTarget::Name(rest.to_string())),
            _ => return Err(format!("{kind} has no search target")),
        },
        other => return Err(format!("unknown command '{other}' (h for help)")),
    };
    Ok(Input::Send(command))
}

async fn print_frames(mut frames: watch::Receiver<Frame>) {
    let mut last: Option<Frame> = None;
    loop {
        let frame = frames.borrow_and_update().clone();
        if last.as_ref() != Some(&frame) {
            println!("{}", render(&frame));
            last = Some(frame);
        }
        if frames.changed().await.is_err() {
            break;
        }
    }
}

fn render(frame: &Frame) -> String {
    let snapshot = &frame.snapshot;
    let cursor = snapshot.cursor();
    let h = &snapshot.highlights;

    let mut out = format!(
        "[{} #{}] {} (i={}, j={}){}",
        snapshot.kind(),
        frame.step,
        snapshot.phase_name(),
        cursor.i,
        cursor.j,
        if frame.autoplay { " ▶" } else { "" },
    );
    if let Some(range) = snapshot.range() {
        out.push_str(&format!(
            " low={} mid={} high={}",
            range.low, range.mid, range.high
        ));
    }

    let cells: Vec<String> = match snapshot.sequence() {
        WorkingSequence::Numbers(values) => values.iter().map(ToString::to_string).collect(),
        WorkingSequence::Records(rows) => rows
            .iter()
            .map(|row| format!("{}:{}", row.sequence_number, row.name))
            .collect(),
    };
    let marked: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| format!("{}{cell}", marker(index, h)))
        .collect();

    out.push_str(&format!("\n  {}", marked.join("  ")));
    out.push_str(&format!("\n  {}", snapshot.message));
    let narration = if frame.narrating {
        format!("{} …", frame.narration)
    } else {
        frame.narration.clone()
    };
    out.push_str(&format!("\n  » {narration}"));
    out
}

fn marker(index: usize, highlights: &HighlightSets) -> &'static str {
    if highlights.swapping.contains(&index) {
        "⇄"
    } else if highlights.comparing.contains(&index) {
        "?"
    } else if highlights.sorted.contains(&index) {
        "✓"
    } else if highlights.discarded.contains(&index) {
        "·"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parsing_depends_on_algorithm() {
        assert!(matches!(
            parse_input("t 75", AlgorithmKind::BinarySearch),
            Ok(Input::Send(Command::EditTarget(SearchTarget::Number(75))))
        ));
        assert!(matches!(
            parse_input("t Lê Văn Hùng", AlgorithmKind::LinearSearch),
            Ok(Input::Send(Command::EditTarget(SearchTarget::Name(name)))) if name == "Lê Văn Hùng"
        ));
        assert!(parse_input("t abc", AlgorithmKind::BinarySearch).is_err());
        assert!(parse_input("t 3", AlgorithmKind::Bubble).is_err());
    }

    #[test]
    fn blank_line_advances() {
        assert!(matches!(parse_input("  ", AlgorithmKind::Bubble), Ok(Input::Send(Command::Advance))));
        assert!(matches!(parse_input("q", AlgorithmKind::Bubble), Ok(Input::Quit)));
    }

    #[test]
    fn algorithm_and_speed_arguments_parse() {
        assert!(matches!(
            parse_input("a binary_search", AlgorithmKind::Bubble),
            Ok(Input::Send(Command::SelectAlgorithm(AlgorithmKind::BinarySearch)))
        ));
        assert!(matches!(
            parse_input("s fast", AlgorithmKind::Bubble),
            Ok(Input::Send(Command::SetSpeed(SpeedPreset::Fast)))
        ));
    }
}
