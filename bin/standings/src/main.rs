//! Standings leaderboard binary.

mod cli;
mod commands;

fn main() -> eyre::Result<()> {
    cli::run()
}
