use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::display::TerminalDisplay;
use tomato_core::{ClockSource, Command, Config, CountdownEngine, Event, Session};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work phase length in units (overrides config)
    #[arg(long)]
    pub work: Option<u64>,
    /// Relax phase length in units (overrides config)
    #[arg(long)]
    pub relax: Option<u64>,
    /// Wall time of one unit in milliseconds (overrides config)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Clock pulses per unit, for a smoother progress bar (overrides config)
    #[arg(long)]
    pub pulses: Option<u32>,
    /// Keep running into the next phase instead of stopping
    #[arg(long)]
    pub auto_cycle: bool,
    /// Press start at launch and again after every phase change
    #[arg(long)]
    pub autostart: bool,
    /// Quit after this many completed phases
    #[arg(long)]
    pub exit_after: Option<u64>,
    /// Print notifications and events as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn apply_to(&self, config: &mut Config) {
        if let Some(work) = self.work {
            config.timer.work_duration = work;
        }
        if let Some(relax) = self.relax {
            config.timer.relax_duration = relax;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.timer.tick_interval_ms = tick_ms;
        }
        if let Some(pulses) = self.pulses {
            config.timer.pulses_per_tick = pulses;
        }
        if self.auto_cycle {
            config.timer.auto_cycle = true;
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    args.apply_to(&mut config);
    config.validate()?;

    let engine = CountdownEngine::new(config.timer_settings())?;
    let clock = ClockSource::new(config.tick_interval(), config.timer.pulses_per_tick)?;
    let style = config.phase_style();
    let display = TerminalDisplay::new(args.json, style.clone());
    let session = Session::with_style(engine, display, style);

    if !args.json {
        eprintln!("enter: play/pause  r: reset  q: quit");
    }

    // One thread: commands and pulses are serialized by the select loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(session, clock, &args));
    // A pending stdin read must not keep the process alive.
    runtime.shutdown_background();
    result
}

async fn drive(
    mut session: Session<TerminalDisplay>,
    mut clock: ClockSource,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    // Raw lines: undecodable input is an unknown command, not a read error.
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut stdin_open = true;
    let mut completed_phases = 0u64;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    session.refresh();
    if args.autostart {
        apply(&mut session, &mut clock, Command::Start);
    }

    loop {
        if !stdin_open && !session.is_running() {
            debug!("input closed and timer idle");
            break;
        }

        tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            line = lines.next_segment(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "stdin closed");
                        stdin_open = false;
                        continue;
                    }
                };
                let line = String::from_utf8_lossy(&line);
                let input = line.trim();
                if matches!(input, "q" | "quit" | "exit") {
                    break;
                }
                match input.parse::<Command>() {
                    Ok(command) => apply(&mut session, &mut clock, command),
                    Err(e) => eprintln!("{e}"),
                }
            }
            pulse = clock.next_pulse(), if session.is_running() => {
                if let Some(Event::PhaseCompleted { .. }) = session.pulse(pulse) {
                    completed_phases += 1;
                    if args.exit_after.is_some_and(|n| completed_phases >= n) {
                        break;
                    }
                    if args.autostart && !session.is_running() {
                        apply(&mut session, &mut clock, Command::Start);
                    }
                }
            }
        }
    }

    session.into_display().finish();
    Ok(())
}

/// Apply a command and keep the clock in step with the engine.
fn apply(session: &mut Session<TerminalDisplay>, clock: &mut ClockSource, command: Command) {
    let was_running = session.is_running();
    session.apply(command);
    if command == Command::Reset {
        clock.reset();
    } else if !was_running && session.is_running() {
        clock.restart();
    }
}
