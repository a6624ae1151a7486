use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use dashboard_core::Domain;
use dashboard_engine::AtomicFileWriter;
use dashboard_logging::dash_info;
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = "locations.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
struct PersistedLocations {
    /// Last location query per domain name.
    queries: BTreeMap<String, String>,
}

/// Remembers the last location of each domain across runs.
pub(crate) struct LocationStore {
    writer: AtomicFileWriter,
}

impl LocationStore {
    pub(crate) fn new(state_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(state_dir),
        }
    }

    pub(crate) fn load(&self, domain: Domain) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.queries.remove(domain.as_str()))
    }

    pub(crate) fn save(&self, domain: Domain, query: &str) -> anyhow::Result<()> {
        let mut state = self.read_all()?;
        if state.queries.get(domain.as_str()).map(String::as_str) == Some(query) {
            return Ok(());
        }
        state
            .queries
            .insert(domain.as_str().to_string(), query.to_string());

        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())
            .context("failed to serialize saved locations")?;
        let path = self
            .writer
            .write(STATE_FILENAME, &content)
            .with_context(|| format!("failed to write {}", self.path_display()))?;
        dash_info!("saved {domain} location to {}", path.display());
        Ok(())
    }

    fn read_all(&self) -> anyhow::Result<PersistedLocations> {
        let Some(content) = self
            .writer
            .read(STATE_FILENAME)
            .with_context(|| format!("failed to read {}", self.path_display()))?
        else {
            return Ok(PersistedLocations::default());
        };
        ron::from_str(&content).with_context(|| format!("failed to parse {}", self.path_display()))
    }

    fn path_display(&self) -> String {
        self.writer.dir().join(STATE_FILENAME).display().to_string()
    }
}
