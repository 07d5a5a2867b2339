mod logic;
mod play;
mod scoreboard;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use cyberdefense_game::constants::DEFAULT_API_BASE;
use cyberdefense_game::{GameEngine, MatchConfig, catalog};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::BufReader;

use logic::{LogicTester, RunResult};
use scoreboard::{HttpScoreboard, render_history};
use util::{resolve_policies, resolve_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestMode {
    /// Automated matches driven by scripted player policies
    Logic,
    /// Play one match interactively on the terminal
    Play,
    /// Print the recent matches from the scoreboard service
    Scoreboard,
}

#[derive(Debug, Parser)]
#[command(name = "cyberdefense-tester", version = "0.1.0")]
#[command(about = "Automated QA and terminal front end for the Cyber Defense card game")]
struct Args {
    /// Run mode: logic (automated), play (interactive), or scoreboard
    #[arg(long, value_enum, default_value_t = TestMode::Logic)]
    mode: TestMode,

    /// Player policies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    policies: String,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of matches per policy and seed (logic mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Player name for play mode; prompted for when absent
    #[arg(long)]
    player: Option<String>,

    /// Deck seed for play mode; a fresh shuffle when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the finished match local instead of submitting it to the scoreboard
    #[arg(long)]
    no_submit: bool,

    /// Base URL of the scoreboard service
    #[arg(long, env = "CYBERDEFENSE_API_URL", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Scoreboard request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.mode {
        TestMode::Logic => {
            announce_banner();
            let start_time = Instant::now();
            let results = run_logic(&args)?;
            write_reports(&args, &results, start_time)?;
            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
        }
        TestMode::Play => run_play(&args).await?,
        TestMode::Scoreboard => show_scoreboard(&args).await?,
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🛡 Cyber Defense Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn build_scoreboard(args: &Args) -> Result<HttpScoreboard> {
    HttpScoreboard::new(&args.api_base, Duration::from_secs(args.timeout_secs))
        .with_context(|| format!("building scoreboard client for {}", args.api_base))
}

fn run_logic(args: &Args) -> Result<Vec<RunResult>> {
    let policies = resolve_policies(&split_csv(&args.policies))?;
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(catalog().clone(), MatchConfig::default(), args.verbose);
    let mut results = Vec::new();
    for strategy in policies {
        results.extend(tester.run_strategy(strategy, &seeds, args.iterations));
    }
    Ok(results)
}

async fn run_play(args: &Args) -> Result<()> {
    let game = GameEngine::new(build_scoreboard(args)?);
    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = stdout();

    let name = match &args.player {
        Some(name) => name.clone(),
        None => play::prompt_player_name(&mut input, &mut out).await?,
    };
    let mut engine = match args.seed {
        Some(seed) => game.create_match(&name, seed)?,
        None => game.create_random_match(&name)?,
    };

    play::run_match(&mut engine, &mut input, &mut out).await?;

    if !args.no_submit {
        if let Some(report) = game.finish(&engine).await {
            if report.recorded {
                println!("{}", "📮 Result recorded on the scoreboard".green());
            } else {
                println!(
                    "{}",
                    "⚠️  Scoreboard unavailable; result kept locally".yellow()
                );
            }
        }
        render_history(&mut out, &game.history().await)?;
    }
    out.flush()?;
    Ok(())
}

async fn show_scoreboard(args: &Args) -> Result<()> {
    let game = GameEngine::new(build_scoreboard(args)?);
    let entries = game.history().await;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    render_history(&mut output_target, &entries)?;
    output_target.flush_inner()?;
    Ok(())
}

fn write_reports(args: &Args, results: &[RunResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Cyber Defense Logic Test Results\n\n_No policies executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No logic policies executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
        }
    }

    if args.report != "json" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args() -> Args {
        Args {
            mode: TestMode::Logic,
            policies: "all".to_string(),
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            player: None,
            seed: None,
            no_submit: true,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 1,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cyberdefense-{}-{name}", std::process::id()))
    }

    #[test]
    fn run_logic_covers_every_policy_and_seed() {
        let args = Args {
            seeds: "1,2".to_string(),
            ..base_args()
        };
        let results = run_logic(&args).unwrap();
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn run_logic_rejects_unknown_policy() {
        let args = Args {
            policies: "cheater".to_string(),
            ..base_args()
        };
        assert!(run_logic(&args).is_err());
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No policies executed"));
    }

    #[test]
    fn write_reports_console_lists_policies() {
        let temp = temp_file("report.txt");
        let args = Args {
            report: "console".to_string(),
            policies: "always-correct".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let results = run_logic(&args).unwrap();
        write_reports(&args, &results, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("always-correct"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn build_scoreboard_accepts_default_base() {
        assert!(build_scoreboard(&base_args()).is_ok());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
