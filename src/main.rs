//! Laughmeter CLI
//!
//! Usage:
//!   laughmeter --scores "0.2,0.9,0.9,none,0.8"   # Replay a list of smile scores
//!   laughmeter --interactive                     # One score per line from stdin
//!   laughmeter --demo                            # Scripted show through the frame loop
//!   laughmeter --serve                           # HTTP API server
//!   laughmeter --scores "..." --json             # JSON output

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use laughmeter::core::{
    render_receipt, run_server, settle, FrameLoop, LaughSession, LoopExit, ScriptedAnalyzer,
    ScriptedCamera,
};
use laughmeter::logging::init_logging;
use laughmeter::types::{FrameReport, Money, SessionPhase, Settlement};
use laughmeter::{LaughConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "laughmeter",
    version = VERSION,
    about = "Pay per laugh - bill every smile, capped per show",
    long_about = "Laughmeter turns per-frame smile scores into billed laughs.\n\n\
                  A smile counts when its score is above the threshold; a laugh is\n\
                  billed at most once per cooldown period, up to the session cap.\n\n\
                  Modes:\n  \
                  --scores       Replay a comma-separated list of scores\n  \
                  --interactive  Read one score per line (or 'none' for no face)\n  \
                  --demo         Run a scripted show through the frame loop\n  \
                  --serve        HTTP API server mode\n\n\
                  Phases:\n  \
                  IDLE      - At the entrance\n  \
                  SHOWTIME  - Camera on, laughs are billed\n  \
                  FINISHED  - Receipt on screen"
)]
struct Args {
    /// Comma-separated smile scores, one per frame ("none" = no face)
    #[arg(long)]
    scores: Option<String>,

    /// Frame spacing for --scores (milliseconds)
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Interactive mode - read scores from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Scripted show through the frame loop
    #[arg(long)]
    demo: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON config file
    #[arg(short, long)]
    config: Option<String>,

    /// Price per laugh in euros
    #[arg(long)]
    price: Option<f64>,

    /// Session cap in euros
    #[arg(long)]
    cap: Option<f64>,

    /// Smile threshold (exclusive)
    #[arg(long)]
    threshold: Option<f64>,

    /// Cooldown between laughs (milliseconds)
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;

    if args.serve {
        run_serve(&args, config).await
    } else if args.demo {
        run_demo(&args, config).await
    } else if let Some(ref scores) = args.scores {
        run_scores(scores, &args, config)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, config)
    }
}

/// Defaults, then the config file, then flags
fn load_config(args: &Args) -> Result<LaughConfig> {
    let mut config = match &args.config {
        Some(path) => LaughConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => LaughConfig::default(),
    };

    if let Some(price) = args.price {
        config.price_per_laugh = Money::from_euros(price);
    }
    if let Some(cap) = args.cap {
        config.max_charge = Money::from_euros(cap);
    }
    if let Some(threshold) = args.threshold {
        config.laugh_threshold = threshold;
    }
    if let Some(cooldown_ms) = args.cooldown_ms {
        config.cooldown_ms = cooldown_ms;
    }

    config.validate()?;
    Ok(config)
}

/// Parse one score token: a number in [0, 1] or "none"/"-" for no face
fn parse_score(token: &str) -> Result<Option<f64>> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("none") || token == "-" {
        return Ok(None);
    }
    let score: f64 = token
        .parse()
        .with_context(|| format!("invalid smile score '{}'", token))?;
    if !(0.0..=1.0).contains(&score) {
        bail!("smile score {} is outside [0, 1]", score);
    }
    Ok(Some(score))
}

/// Session clock of the `index`-th replayed frame, pinned at `u64::MAX`
fn frame_time_ms(index: usize, interval_ms: u64) -> u64 {
    (index as u64).saturating_mul(interval_ms)
}

/// Replay a list of scores at a fixed frame spacing
fn run_scores(scores: &str, args: &Args, config: LaughConfig) -> Result<()> {
    let mut session = LaughSession::new(config);
    session.start_show()?;

    for (i, token) in scores.split(',').filter(|t| !t.trim().is_empty()).enumerate() {
        let score = parse_score(token)?;
        let report = session.process_frame(score, frame_time_ms(i, args.interval_ms))?;
        print_report(&report, args);
    }

    finish(&mut session, args)
}

/// Run interactive mode
fn run_interactive(args: &Args, config: LaughConfig) -> Result<()> {
    let mut session = LaughSession::new(config);
    let mut clock = Instant::now();

    print_header("Interactive", args.no_color);
    println!("Enter a smile score (0-1) per frame, or 'none' when no face is visible.");
    println!("Commands: finish, restart, quit");
    print_pricing(&session);
    println!();

    session.start_show()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&session, args.no_color));
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Frames: {}", session.frame_count());
            break;
        }
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("finish") {
            if session.phase() == SessionPhase::Showtime {
                finish(&mut session, args)?;
            } else {
                println!("The show is not running.");
            }
            continue;
        }
        if line.eq_ignore_ascii_case("restart") {
            if session.phase() == SessionPhase::Finished {
                session.restart()?;
            }
            if session.phase() == SessionPhase::Idle {
                session.start_show()?;
                clock = Instant::now();
                println!("New show started.");
            }
            continue;
        }

        if !session.phase().accepts_frames() {
            println!("The show is over. Type 'restart' for a new one.");
            continue;
        }

        match parse_score(line) {
            Ok(score) => {
                let now_ms = clock.elapsed().as_millis() as u64;
                let report = session.process_frame(score, now_ms)?;
                print_report(&report, args);
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

/// Scripted show through the real frame loop
async fn run_demo(args: &Args, config: LaughConfig) -> Result<()> {
    let analyzer = ScriptedAnalyzer::comedy_set();
    let mut camera = ScriptedCamera::new(analyzer.len() as u64);
    let mut session = LaughSession::new(config);
    let token = CancellationToken::new();

    print_header("Demo", args.no_color);
    print_pricing(&session);
    println!();

    let frame_loop = match FrameLoop::start(&mut session, &mut camera, || Ok(analyzer), token) {
        Ok(frame_loop) => frame_loop,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let exit = frame_loop
        .run(&mut session, |report| {
            if report.laugh_event_emitted || args.verbose {
                print_report(report, args);
            }
        })
        .await?;

    if exit == LoopExit::Faulted {
        if let Some(fault) = session.fault() {
            eprintln!("{}", fault.user_message);
        }
        return Ok(());
    }

    finish(&mut session, args)
}

/// Finish the show and print the bill
fn finish(session: &mut LaughSession, args: &Args) -> Result<()> {
    let receipt = session.finish_show()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(receipt)?);
        return Ok(());
    }

    println!();
    println!("{}", render_receipt(receipt, args.no_color));
    println!();
    match settle(receipt) {
        Settlement::DemoRedirect { message, .. } => println!("{}", message),
        Settlement::NothingDue => println!("Nothing to pay. Were the jokes that bad?"),
    }
    Ok(())
}

/// Print one frame report
fn print_report(report: &FrameReport, args: &Args) {
    if args.json {
        match serde_json::to_string(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}", e),
        }
    } else if args.no_color {
        println!("{}", report.to_parseable_string());
    } else {
        println!("{}", report.to_terminal_string());
        if report.reason.is_laugh() {
            println!("\x1b[35m  {}!\x1b[0m", report.stats.price_per_laugh);
        }
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  Laughmeter v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m╔════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║  PAY PER LAUGH v{} - {:<20}║\x1b[0m", VERSION, mode);
        println!("\x1b[1m╚════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

fn print_pricing(session: &LaughSession) {
    let config = session.config();
    println!(
        "Every laugh costs {}. Capped at {} per show.",
        config.price_per_laugh, config.max_charge
    );
}

/// Format prompt
fn format_prompt(session: &LaughSession, no_color: bool) -> String {
    let phase = session.phase();
    let stats = session.stats();
    if no_color {
        format!("[{} | {} | {}] > ", phase, stats.laugh_count, stats.amount_due)
    } else {
        format!(
            "{}{} [{} | {} | {}]{} > ",
            phase.color_code(),
            phase.emoji(),
            phase,
            stats.laugh_count,
            stats.amount_due,
            SessionPhase::color_reset()
        )
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: LaughConfig) -> Result<()> {
    println!();
    println!("╔════════════════════════════════════════╗");
    println!("║  🎤 Laughmeter API Server              ║");
    println!("║  Version: {:<29}║", VERSION);
    println!("╚════════════════════════════════════════╝");
    println!();

    run_server(&args.addr, config).await?;
    Ok(())
}
