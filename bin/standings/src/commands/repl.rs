//! Line-oriented command loop over stdin/stdout.
//!
//! Each input line is one command; each command produces exactly one JSON
//! document on its own output line:
//!
//! ```text
//! update <identity> <delta>
//! range <start> <end>
//! neighbors <identity> <high> <low>
//! score <identity>
//! top
//! stats
//! quit
//! ```

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use eyre::{Result, WrapErr};
use rust_decimal::Decimal;
use serde::Serialize;
use standings_service::{
    LeaderboardEntry, LeaderboardService, LeaderboardStats, LeaderboardStore, ParticipantId,
    Score, ServiceError,
};
use tracing::{debug, info};

use crate::cli::LeaderboardArgs;

/// Arguments for the `repl` command.
#[derive(Debug, clap::Args)]
pub(crate) struct ReplArgs {
    #[command(flatten)]
    pub(crate) leaderboard: LeaderboardArgs,
}

pub(crate) fn run(args: ReplArgs) -> Result<()> {
    let service = args.leaderboard.build()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let served = serve(&service, stdin.lock(), stdout.lock())?;
    info!(commands = served, "input closed");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Update { identity: ParticipantId, delta: Decimal },
    Range { start: i32, end: i32 },
    Neighbors { identity: ParticipantId, high: i32, low: i32 },
    Score { identity: ParticipantId },
    Top,
    Stats,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or("empty command")?;
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("update", [identity, delta]) => Command::Update {
                identity: parse(identity, "identity")?,
                delta: parse(delta, "delta")?,
            },
            ("range", [start, end]) => Command::Range {
                start: parse(start, "start")?,
                end: parse(end, "end")?,
            },
            ("neighbors", [identity, high, low]) => Command::Neighbors {
                identity: parse(identity, "identity")?,
                high: parse(high, "high")?,
                low: parse(low, "low")?,
            },
            ("score", [identity]) => Command::Score {
                identity: parse(identity, "identity")?,
            },
            ("top", []) => Command::Top,
            ("stats", []) => Command::Stats,
            ("quit" | "exit", []) => Command::Quit,
            ("update" | "range" | "neighbors" | "score" | "top" | "stats" | "quit" | "exit", _) => {
                return Err(format!("wrong number of arguments for `{name}`"));
            }
            _ => return Err(format!("unknown command `{name}`")),
        };
        Ok(command)
    }
}

fn parse<T: FromStr>(word: &str, what: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("invalid {what} `{word}`"))
}

#[derive(Debug, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
enum Reply {
    Updated {
        identity: ParticipantId,
        score: Score,
    },
    Entries {
        entries: Vec<LeaderboardEntry>,
    },
    Neighbors {
        identity: ParticipantId,
        entries: Option<Vec<LeaderboardEntry>>,
    },
    Score {
        identity: ParticipantId,
        score: Option<Score>,
    },
    Stats(LeaderboardStats),
    Error {
        message: String,
    },
}

/// Run commands from `input` until `quit` or end of input, writing one JSON
/// reply per command. Returns the number of commands served.
///
/// Malformed lines and rejected updates produce an error reply and the loop
/// continues; an internal ranking error ends it.
fn serve<S: LeaderboardStore>(
    service: &LeaderboardService<S>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<usize> {
    let mut served = 0;
    for line in input.lines() {
        let line = line.wrap_err("Failed to read command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => match execute(service, command)? {
                Some(reply) => reply,
                None => break,
            },
            Err(message) => Reply::Error { message },
        };
        debug!(command = line, "served");

        serde_json::to_writer(&mut output, &reply).wrap_err("Failed to encode reply")?;
        output
            .write_all(b"\n")
            .and_then(|()| output.flush())
            .wrap_err("Failed to write reply")?;
        served += 1;
    }
    Ok(served)
}

/// `None` for `quit`.
fn execute<S: LeaderboardStore>(
    service: &LeaderboardService<S>,
    command: Command,
) -> Result<Option<Reply>> {
    let reply = match command {
        Command::Update { identity, delta } => match service.update_score(identity, delta) {
            Ok(score) => Reply::Updated { identity, score },
            Err(err @ ServiceError::OutOfRange { .. }) => Reply::Error {
                message: err.to_string(),
            },
            Err(err) => return Err(err).wrap_err("Ranking state is inconsistent"),
        },
        Command::Range { start, end } => Reply::Entries {
            entries: service.get_range(start, end),
        },
        Command::Neighbors {
            identity,
            high,
            low,
        } => Reply::Neighbors {
            identity,
            entries: service
                .get_with_neighbors(identity, high, low)
                .wrap_err("Ranking state is inconsistent")?,
        },
        Command::Score { identity } => Reply::Score {
            identity,
            score: service.get_score(identity),
        },
        Command::Top => Reply::Entries {
            entries: service.get_top(),
        },
        Command::Stats => Reply::Stats(service.stats()),
        Command::Quit => return Ok(None),
    };
    Ok(Some(reply))
}
