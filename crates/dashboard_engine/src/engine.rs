use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_core::{DatasetRequest, GraphRequest};
use dashboard_logging::{dash_debug, dash_warn};

use crate::fetch::{FetchSettings, ReqwestResultsSource, ResultsSource};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    Dataset { seq: u64, request: DatasetRequest },
    Graph { seq: u64, request: GraphRequest },
}

/// Runs fetches on a background tokio runtime; completions are polled with
/// `try_recv` or `recv_timeout`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let source = ReqwestResultsSource::new(settings).map_err(EngineError::Client)?;
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn ResultsSource>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let source = source.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(source.as_ref(), command).await;
                    if event_tx.send(event).is_err() {
                        dash_debug!("engine event dropped; receiver gone");
                    }
                });
            }
            runtime.shutdown_background();
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_dataset(&self, seq: u64, request: DatasetRequest) {
        self.send(EngineCommand::Dataset { seq, request });
    }

    pub fn fetch_graph(&self, seq: u64, request: GraphRequest) {
        self.send(EngineCommand::Graph { seq, request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("engine thread stopped; command dropped");
        }
    }
}

async fn handle_command(source: &dyn ResultsSource, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Dataset { seq, request } => {
            let result = source.fetch_dataset(&request).await;
            if let Err(err) = &result {
                dash_warn!("{} dataset seq={seq} failed: {err}", request.domain);
            }
            EngineEvent::DatasetFetched { seq, result }
        }
        EngineCommand::Graph { seq, request } => {
            let result = source.fetch_graph(&request).await;
            if let Err(err) = &result {
                dash_warn!("{} graph {} seq={seq} failed: {err}", request.domain, request.item_key);
            }
            EngineEvent::GraphFetched {
                seq,
                item_key: request.item_key,
                result,
            }
        }
    }
}
