//! Interactive front-end: one command per line on stdin.
//!
//! Mirrors the single-page timer: a cycle can only be started while idle and
//! only stopped while running, and the history of the session is kept in
//! memory until the process exits.

use std::sync::Arc;

use ignite_core::{Config, CountdownDriver, CycleContext, Event, MonotonicClock, NewCycle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

const HELP: &str = "\
commands:
  start <minutes> <task>   start a cycle (5-60 minutes)
  stop                     interrupt the running cycle
  status                   show the countdown as JSON
  history                  show all cycles of this session as JSON
  suggest                  list task suggestions
  help                     show this help
  quit                     leave the session";

enum Flow {
    Continue,
    Quit,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let rt = super::runtime()?;
    let result = rt.block_on(session(&config));
    // Do not wait on a blocked stdin read.
    rt.shutdown_background();
    result
}

async fn session(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let context = CycleContext::from_config(config, Arc::new(MonotonicClock::new()));
    let mut events = context.subscribe();
    let driver = CountdownDriver::spawn(context.clone(), config.tick_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle(&context, config, &line)? {
                    break;
                }
            }
            received = events.recv() => match received {
                Ok(Event::CycleFinished { task, .. }) => println!("finished: {task}"),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }
    }

    driver.shutdown();
    Ok(())
}

fn handle(
    context: &CycleContext,
    config: &Config,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };

    match command {
        "start" => {
            if context.is_active() {
                println!("a cycle is already running; stop it first");
                return Ok(Flow::Continue);
            }
            let minutes = words.next().unwrap_or_default();
            let task = words.collect::<Vec<_>>().join(" ");
            match NewCycle::parse(&task, minutes) {
                Ok(new) => {
                    let (task, minutes) = (new.task().to_string(), new.minutes_amount());
                    let id = context.create(new);
                    println!("started: {task} ({minutes} min) [{id}]");
                }
                Err(e) => println!("invalid {}: {e}", e.field()),
            }
        }
        "stop" => match context.interrupt() {
            Some(Event::CycleInterrupted {
                task,
                seconds_passed,
                ..
            }) => println!("interrupted: {task} after {seconds_passed}s"),
            _ => println!("no active cycle"),
        },
        "status" => println!("{}", serde_json::to_string_pretty(&context.snapshot())?),
        "history" => println!("{}", serde_json::to_string_pretty(&context.history())?),
        "suggest" => {
            for suggestion in &config.ui.task_suggestions {
                println!("{suggestion}");
            }
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => println!("unknown command: {other} (try 'help')"),
    }
    Ok(Flow::Continue)
}
