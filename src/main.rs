//! RPS Engine Replay Host
//!
//! Applies a request log block by block, the way a replicated host would:
//! every request at a height in order, then the expiration sweep for that
//! height. Replaying the same log twice must give the same state hash.
//!
//! Usage: `rps-engine [script.json]`. Without a script a built-in demo runs.

use std::fs;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rps_engine::{commit, Engine, Params, PlayerId, Request, Response, VERSION};

/// A request log.
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    params: Params,
    steps: Vec<Step>,
}

/// One request at a height.
#[derive(Debug, Deserialize)]
struct Step {
    height: u64,
    request: Request,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("RPS Engine v{}", VERSION);

    let script = match std::env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?
        }
        None => demo_script(),
    };

    let hash = replay(&script, true)?;
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    let replay_hash = replay(&script, false)?;
    info!("Replay State Hash: {}", hex::encode(replay_hash));
    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        bail!("DETERMINISM FAILURE: Hashes differ!");
    }
}

/// Apply every step and return the final state hash.
fn replay(script: &Script, print: bool) -> Result<[u8; 32]> {
    let mut engine = Engine::new(script.params).context("invalid params")?;
    let mut current: Option<u64> = None;

    for step in &script.steps {
        match current {
            Some(h) if step.height < h => {
                bail!("height went backwards: {} after {}", step.height, h)
            }
            Some(h) if step.height > h => end_block(&mut engine, h, print),
            _ => {}
        }
        current = Some(step.height);

        let receipt = Response::from_result(engine.handle(step.height, step.request.clone()));
        if print {
            for event in &receipt.events {
                info!("[{}] {}", step.height, event);
            }
            println!("{}", receipt.value.to_json()?);
        }
    }

    if let Some(h) = current {
        end_block(&mut engine, h, print);
    }
    Ok(engine.state_hash())
}

fn end_block(engine: &mut Engine, height: u64, print: bool) {
    let due = engine.expiry().due(height).count();
    if due > 0 {
        debug!("[{}] {} expiration entries due", height, due);
    }

    let receipt = engine.sweep_expired(height);
    if print {
        for event in &receipt.events {
            info!("[{}] {}", height, event);
        }
    }
}

/// Demo log: one decided game, one that is left to expire.
fn demo_script() -> Script {
    let alice = PlayerId::from("alice");
    let bob = PlayerId::from("bob");

    let mut steps = vec![
        Step {
            height: 1,
            request: Request::CreateGame { creator: alice.clone(), opponent: bob.clone(), rounds: 3 },
        },
        Step {
            height: 1,
            request: Request::CreateGame { creator: bob.clone(), opponent: alice.clone(), rounds: 1 },
        },
    ];

    let rounds = [("Rock", "Scissors"), ("Paper", "Paper"), ("Paper", "Rock")];
    for (i, (a, b)) in rounds.iter().enumerate() {
        let height = 2 + i as u64 * 2;
        let salt_a = format!("alice-{}", i);
        let salt_b = format!("bob-{}", i);
        steps.push(Step {
            height,
            request: Request::MakeMove { game_id: 1, player: alice.clone(), commitment: commit(a, &salt_a) },
        });
        steps.push(Step {
            height,
            request: Request::MakeMove { game_id: 1, player: bob.clone(), commitment: commit(b, &salt_b) },
        });
        steps.push(Step {
            height: height + 1,
            request: Request::RevealMove {
                game_id: 1,
                player: alice.clone(),
                revealed_move: a.to_string(),
                salt: salt_a,
            },
        });
        steps.push(Step {
            height: height + 1,
            request: Request::RevealMove {
                game_id: 1,
                player: bob.clone(),
                revealed_move: b.to_string(),
                salt: salt_b,
            },
        });
    }

    steps.push(Step { height: 21, request: Request::GetGame { game_id: 2 } });

    Script { params: Params::default(), steps }
}
