use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::events::expand_events;
use crate::state::{Delta, ProviderCommand};
use crate::statsbomb::{fetch_competitions, fetch_events, fetch_matches};

/// Fetcher thread. Owns all blocking HTTP; the UI thread stays
/// responsive while a request is in flight. One command, one fetch, one
/// delta — a failure becomes a FetchFailed delta instead of killing the
/// thread.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let result = run_command(&tx, &cmd);
            if let Err(err) = result {
                let delta = Delta::FetchFailed {
                    command: cmd,
                    error: format!("{err:#}"),
                };
                if tx.send(delta).is_err() {
                    break;
                }
            }
        }
    });
}

fn run_command(tx: &Sender<Delta>, cmd: &ProviderCommand) -> Result<()> {
    match cmd {
        ProviderCommand::FetchCompetitions => {
            let rows = fetch_competitions()?;
            let _ = tx.send(Delta::Competitions(rows));
        }
        ProviderCommand::FetchMatches {
            competition_id,
            season_id,
        } => {
            let rows = fetch_matches(*competition_id, *season_id)?;
            let _ = tx.send(Delta::Matches {
                competition_id: *competition_id,
                season_id: *season_id,
                rows,
            });
        }
        ProviderCommand::FetchEvents { match_id } => {
            let raw = fetch_events(*match_id)?;
            // Expansion happens once per fetched event set, before any
            // filtering; null-player rows are dropped here.
            let records = expand_events(raw);
            let _ = tx.send(Delta::Events {
                match_id: *match_id,
                records,
            });
        }
    }
    Ok(())
}
