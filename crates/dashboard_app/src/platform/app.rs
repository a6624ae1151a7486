use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use dashboard_core::{update, DomainState, Msg};
use dashboard_engine::EngineHandle;
use dashboard_logging::{dash_info, dash_warn};

use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::persistence::LocationStore;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render;
use crate::cli::Args;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) fn run_app(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    logging::initialize(logging::destination(
        config.log_destination,
        args.log_to_file,
    ));

    let domain = args.domain;
    let store = LocationStore::new(config.state_dir.clone());
    let query = match args.query {
        Some(query) => Some(query),
        None => store.load(domain).unwrap_or_else(|err| {
            dash_warn!("ignoring saved location: {err:#}");
            None
        }),
    }
    .unwrap_or_default();
    dash_info!("starting {domain} view at {query:?} against {}", config.base_url);

    let engine = EngineHandle::new(config.fetch_settings()).context("failed to start fetch engine")?;
    let mut app = App {
        state: Some(DomainState::new(domain.config())),
        runner: EffectRunner::new(engine, store, domain, &query),
    };

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{HELP}");
    app.dispatch(Msg::Mounted { query });

    loop {
        for msg in app.runner.poll() {
            app.dispatch(msg);
        }
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if !app.handle_line(&line) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    dash_info!("leaving {domain} view");
    Ok(())
}

struct App {
    /// Always `Some` between dispatches.
    state: Option<DomainState>,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (mut state, effects) = update(state, msg);
        for notice in self.runner.run(effects) {
            println!("{notice}");
        }
        if state.consume_dirty() {
            println!("{}", render::render(&state.view()));
        }
        self.state = Some(state);
        let _ = io::stdout().flush();
    }

    /// Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                return true;
            }
        };
        match command {
            Command::Dispatch(msg) => self.dispatch(msg),
            Command::Redraw => {
                if let Some(state) = &self.state {
                    println!("{}", render::render(&state.view()));
                }
            }
            Command::PrintUrl => println!("?{}", self.runner.location()),
            Command::Back => match self.runner.back() {
                Some(query) => self.dispatch(Msg::LocationChanged { query }),
                None => println!("no earlier location"),
            },
            Command::Forward => match self.runner.forward() {
                Some(query) => self.dispatch(Msg::LocationChanged { query }),
                None => println!("no later location"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        true
    }
}
