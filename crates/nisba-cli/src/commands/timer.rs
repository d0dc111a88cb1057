use clap::Subcommand;
use nisba_core::timer::driver::{self, DriverExit};
use nisba_core::{App, Cue, Event, SessionType};

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Refill the current session and stop
    Reset,
    /// Switch to a session type (work, short-break, long-break)
    Select {
        session: SessionType,
    },
    /// Print the current timer state as JSON
    Status,
    /// Run the countdown in the foreground until it stops or Ctrl-C
    Run,
}

pub fn run(action: TimerAction) -> CliResult {
    let mut app = open_app(Audio::System)?;

    // Catch up with the time that passed since the last invocation.
    let mut events = app.tick_timer();

    match action {
        TimerAction::Start => events.extend(app.start_timer()?),
        TimerAction::Pause => events.extend(app.pause_timer()?),
        TimerAction::Reset => events.extend(app.reset_timer()?),
        TimerAction::Select { session } => events.extend(app.select_session(session)?),
        TimerAction::Status => {}
        TimerAction::Run => {
            for event in &events {
                print_line(event);
            }
            return run_foreground(&mut app);
        }
    }

    for event in &events {
        print_json(event)?;
    }
    print_json(&app.engine().snapshot())?;
    app.save_timer()?;

    let chimed = events
        .iter()
        .any(|e| matches!(e, Event::SessionCompleted { .. }));
    linger(&app, chimed, Cue::SessionEnd);
    Ok(())
}

/// Drive the countdown on a tokio interval, printing one JSON event per
/// line. Starts the timer first if it is stopped.
fn run_foreground(app: &mut App) -> CliResult {
    if !app.engine().is_active() {
        if let Some(event) = app.start_timer()? {
            print_line(&event);
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut last_completed = false;
    let mut sink = |_: &App, event: &Event| {
        last_completed = matches!(event, Event::SessionCompleted { .. });
        print_line(event);
    };
    let exit = runtime.block_on(driver::run(&mut *app, &mut sink, interrupted()));

    if exit == DriverExit::Shutdown {
        if let Some(event) = app.pause_timer()? {
            print_line(&event);
        }
    }
    app.save_all()?;
    print_line(&app.engine().snapshot());
    linger(app, last_completed, Cue::SessionEnd);
    Ok(())
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler: run until the countdown stops by itself.
        std::future::pending::<()>().await;
    }
}

fn print_line(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("failed to encode event: {e}"),
    }
}
