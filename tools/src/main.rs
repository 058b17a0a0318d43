//! spin-runner: headless prize wheel runner.
//!
//! Usage:
//!   spin-runner --seed 12345 --spins 1000 --db spins.db
//!   spin-runner --seed 12345 --ipc-mode
//!
//! Without `--seed` the session is seeded from OS entropy; the chosen seed
//! is printed and stored so the run can be replayed.
//!
//! In IPC mode the runner reads one JSON SessionCommand per stdin line
//! and answers each with one JSON line on stdout.

use anyhow::Result;
use prize_wheel_core::{
    command::SessionCommand,
    config::WheelConfig,
    engine::{SpinAttempt, SpinEngine},
    prize_table::Prize,
    rng::SeededSource,
    session::{SessionView, SpinSession},
    sink::{AnalyticsSink, LogSink},
    store::EventStore,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(serde::Serialize)]
struct IpcReply {
    state: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempt: Option<SpinAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prize: Option<Prize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let source = match string_arg(&args, "--seed").and_then(|s| s.parse().ok()) {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    let seed = source.seed();
    let spins = parse_arg(&args, "--spins", 1000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db");
    let config_path = string_arg(&args, "--config").unwrap_or("./data/prizes.json");

    let config = if Path::new(config_path).exists() {
        WheelConfig::load(config_path)?
    } else {
        log::warn!("{config_path} not found, using the built-in prize table");
        WheelConfig::default()
    };

    if !ipc_mode {
        println!("Prize Wheel: spin-runner");
        println!("  seed:      {seed}");
        println!("  spins:     {spins}");
        println!("  db:        {}", db.unwrap_or("(log only)"));
        println!("  config:    {config_path}");
        println!();
    }

    let session_id = SpinSession::generate_id();
    let sink: Box<dyn AnalyticsSink> = match db {
        Some(path) => {
            let store = EventStore::open(path)?;
            store.migrate()?;
            store.insert_session(&session_id, Some(seed), env!("CARGO_PKG_VERSION"))?;
            Box::new(store)
        }
        None => Box::new(LogSink),
    };

    let engine = Arc::new(SpinEngine::from_config(&config)?);
    let mut session = SpinSession::open(
        session_id,
        engine,
        config.initial_coupons,
        Box::new(source),
        sink,
    )
    .with_top_up_amount(config.top_up_amount);

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        let tally = run_batch(&mut session, spins)?;
        print_summary(&session, &tally)?;
    }

    Ok(())
}

/// Spin `spins` times, completing each animation immediately.
fn run_batch(session: &mut SpinSession, spins: u64) -> Result<Vec<u64>> {
    let mut tally = vec![0u64; session.engine().table().len()];

    let needed = u32::try_from(spins).unwrap_or(u32::MAX);
    let balance = session.state().coupons();
    if needed > balance {
        session.grant_coupons(needed - balance);
    }

    for _ in 0..spins {
        match session.spin() {
            SpinAttempt::Accepted(outcome) => {
                tally[outcome.index] += 1;
                session.finish_spin(outcome.index)?;
            }
            SpinAttempt::Rejected { reason } => {
                log::warn!("batch spin rejected: {}", reason.as_str());
                break;
            }
        }
    }
    Ok(tally)
}

fn run_ipc_loop(session: &mut SpinSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: SessionCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if cmd == SessionCommand::Quit {
            break;
        }
        let reply = handle_command(session, cmd);
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(session: &mut SpinSession, cmd: SessionCommand) -> IpcReply {
    let mut attempt = None;
    let mut prize = None;
    let mut error = None;

    match cmd {
        SessionCommand::Spin => attempt = Some(session.spin()),
        SessionCommand::Complete { index } => match session.finish_spin(index) {
            Ok(p) => prize = Some(p),
            Err(e) => error = Some(e.to_string()),
        },
        SessionCommand::Abandon => session.abandon(),
        SessionCommand::GrantCoupons { amount } => {
            session.grant_coupons(amount);
        }
        SessionCommand::TopUp => {
            session.top_up();
        }
        SessionCommand::ShopRedirect => session.shop_redirect(),
        SessionCommand::GetState | SessionCommand::Quit => {}
    }

    IpcReply {
        state: session.view(chrono::Utc::now()),
        attempt,
        prize,
        error,
    }
}

fn print_summary(session: &SpinSession, tally: &[u64]) -> Result<()> {
    let table = session.engine().table();
    let total: u64 = tally.iter().sum();
    let view = session.view(chrono::Utc::now());

    println!("=== RUN SUMMARY ===");
    println!("  session:        {}", session.id());
    println!("  sink:           {}", session.sink().name());
    println!("  spins:          {total}");
    println!("  pity wins:      {}", session.stats().pity_wins);
    println!("  pity counter:   {}/{}", view.pity_count, view.pity_threshold);
    println!("  coupons left:   {}", view.coupons);
    println!("  spins/minute:   {:.2}", view.spins_per_minute);

    println!();
    println!("=== PRIZE DISTRIBUTION ===");
    for (prize, count) in table.prizes().iter().zip(tally) {
        let observed = if total > 0 { *count as f64 * 100.0 / total as f64 } else { 0.0 };
        println!(
            "  {:<16} | configured: {:>3}% | observed: {:>6.2}% ({count})",
            prize.name, prize.weight, observed
        );
    }

    if let Some(store) = session.sink_as::<EventStore>() {
        let logged = store.event_count(session.id(), "spin_resolved")?;
        println!();
        println!("  spin_resolved events logged: {logged}");
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
