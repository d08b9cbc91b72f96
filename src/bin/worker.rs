/*!
 * Worker - Child Process Entry Point
 *
 * Usage: worker <service-name> <person-id> <last-name>
 *
 * Placeholder long-running service: prints its identity every tick until it
 * receives SIGINT or SIGTERM, then exits cleanly.
 */

use anyhow::{bail, Context, Result};
use microservice_supervisor::core::limits::WORKER_TICK;
use microservice_supervisor::ShutdownSignal;
use tokio::time::{interval, MissedTickBehavior};

struct Identity {
    service_name: String,
    person_id: String,
    last_name: String,
}

fn parse_identity(mut args: impl Iterator<Item = String>) -> Result<Identity> {
    let _program = args.next();
    match (args.next(), args.next(), args.next()) {
        (Some(service_name), Some(person_id), Some(last_name)) => Ok(Identity {
            service_name,
            person_id,
            last_name,
        }),
        _ => bail!("Please provide ServiceName, PersonID, and LastName as arguments."),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let identity = parse_identity(std::env::args())?;
    let mut shutdown = ShutdownSignal::install().context("failed to install signal handlers")?;

    let mut ticker = interval(WORKER_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!(
                    "[{}] Person ID: {}, Last Name: {}",
                    identity.service_name, identity.person_id, identity.last_name
                );
            }
            trigger = shutdown.recv() => {
                println!("[{}] Received {:?}, shutting down", identity.service_name, trigger);
                return Ok(());
            }
        }
    }
}
