use std::io::Write;
use std::sync::Arc;

use clap::Args;
use ignite_core::{Config, CountdownDriver, CycleContext, Event, MonotonicClock, NewCycle, Snapshot};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

#[derive(Args)]
pub struct RunArgs {
    /// What you are working on
    #[arg(long, short)]
    task: String,
    /// Cycle length in minutes (5-60); defaults to timer.default_minutes
    #[arg(long, short, allow_negative_numbers = true)]
    minutes: Option<i64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let minutes = args
        .minutes
        .unwrap_or_else(|| i64::from(config.timer.default_minutes));
    let new = NewCycle::new(&args.task, minutes)?;

    let outcome = super::runtime()?.block_on(countdown(&config, new))?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Run one cycle to its end and return the event that ended it.
async fn countdown(config: &Config, new: NewCycle) -> Result<Event, Box<dyn std::error::Error>> {
    let context = CycleContext::from_config(config, Arc::new(MonotonicClock::new()));
    let mut events = context.subscribe();
    let driver = CountdownDriver::spawn(context.clone(), config.tick_interval());

    let id = context.create(new);
    render(&context.snapshot());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut signal_seen = false;

    let outcome = loop {
        tokio::select! {
            signal = &mut ctrl_c, if !signal_seen => {
                signal_seen = true;
                match signal {
                    Ok(()) => {
                        context.interrupt();
                    }
                    Err(e) => warn!("failed to listen for Ctrl-C: {e}"),
                }
            }
            received = events.recv() => match received {
                Ok(Event::CycleTick { .. }) => render(&context.snapshot()),
                Ok(event) if event.cycle_id() == id && event.ends_cycle() => break event,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "render fell behind"),
                Err(RecvError::Closed) => return Err("event channel closed".into()),
            },
        }
    };

    driver.shutdown();
    eprintln!();
    Ok(outcome)
}

fn render(snapshot: &Snapshot) {
    let task = snapshot
        .active_cycle
        .as_ref()
        .map(|c| c.task.as_str())
        .unwrap_or_default();
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "\r{}  {task}", snapshot.title);
    let _ = stderr.flush();
}
