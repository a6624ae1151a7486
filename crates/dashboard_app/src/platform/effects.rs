use dashboard_core::{Domain, Effect, Msg, NotifyLevel};
use dashboard_engine::{EngineEvent, EngineHandle};
use dashboard_logging::{dash_debug, dash_info, dash_warn};

use super::history::History;
use super::persistence::LocationStore;
use super::ui::render;

/// Carries out the effects returned by `update`.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    store: LocationStore,
    history: History,
    domain: Domain,
}

impl EffectRunner {
    pub(crate) fn new(
        engine: EngineHandle,
        store: LocationStore,
        domain: Domain,
        initial_query: &str,
    ) -> Self {
        Self {
            engine,
            store,
            history: History::new(initial_query),
            domain,
        }
    }

    /// Runs `effects` in order and returns the notifications to print.
    pub(crate) fn run(&mut self, effects: Vec<Effect>) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchDataset { seq, request } => {
                    dash_info!(
                        "FetchDataset seq={seq} domain={} offset={} size={:?} append={}",
                        request.domain,
                        request.offset,
                        request.size,
                        request.append
                    );
                    self.engine.fetch_dataset(seq, request);
                }
                Effect::FetchGraph { seq, request } => {
                    dash_info!("FetchGraph seq={seq} item={}", request.item_key);
                    self.engine.fetch_graph(seq, request);
                }
                Effect::UpdateLocation { query, mode } => {
                    dash_debug!("UpdateLocation {mode:?} {query:?}");
                    self.history.record(&query, mode);
                    self.remember(&query);
                }
                Effect::Notify { level, message } => {
                    if level == NotifyLevel::Error {
                        dash_warn!("{message}");
                    }
                    notices.push(render::notification(level, &message));
                }
            }
        }
        notices
    }

    /// Engine completions that arrived since the last call.
    pub(crate) fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(event_to_msg)
            .collect()
    }

    pub(crate) fn location(&self) -> &str {
        self.history.current()
    }

    /// Steps back through the history; the caller feeds the result to
    /// `Msg::LocationChanged`.
    pub(crate) fn back(&mut self) -> Option<String> {
        let query = self.history.back()?.to_string();
        self.remember(&query);
        Some(query)
    }

    pub(crate) fn forward(&mut self) -> Option<String> {
        let query = self.history.forward()?.to_string();
        self.remember(&query);
        Some(query)
    }

    fn remember(&self, query: &str) {
        if let Err(err) = self.store.save(self.domain, query) {
            dash_warn!("could not save location: {err:#}");
        }
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DatasetFetched { seq, result } => match result {
            Ok(payload) => Msg::DatasetLoaded { seq, payload },
            Err(err) => Msg::DatasetFailed {
                seq,
                error: err.to_string(),
            },
        },
        EngineEvent::GraphFetched {
            seq,
            item_key,
            result,
        } => match result {
            Ok(data) => Msg::GraphLoaded {
                item_key,
                seq,
                data,
            },
            Err(err) => Msg::GraphFailed {
                item_key,
                seq,
                error: err.to_string(),
            },
        },
    }
}
