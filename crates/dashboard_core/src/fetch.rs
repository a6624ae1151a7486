use std::collections::BTreeMap;

use dashboard_logging::dash_info;

/// Loading flag for the dataset or for one item's graph data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Completed,
    /// Back to idle after a failure; the error was raised as a notification.
    Errored,
}

impl LoadState {
    pub fn is_loading(self) -> bool {
        self == LoadState::Loading
    }
}

/// Issues sequence numbers for dataset fetches and recognizes stale replies.
///
/// Only the most recently issued full fetch may be applied. Sequence numbers
/// are shared with appends and graph fetches so every request is unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchTracker {
    next_seq: u64,
    latest_full: Option<u64>,
    state: LoadState,
}

impl FetchTracker {
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Reserves a sequence number without changing the loading flag.
    pub fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Starts a full fetch; any earlier full fetch becomes stale.
    pub fn begin_full(&mut self) -> u64 {
        let seq = self.next_seq();
        self.latest_full = Some(seq);
        self.state = LoadState::Loading;
        seq
    }

    pub fn is_current_full(&self, seq: u64) -> bool {
        self.latest_full == Some(seq)
    }

    /// Marks the current full fetch finished. Stale replies are ignored and
    /// reported as `false`.
    pub fn finish_full(&mut self, seq: u64, ok: bool) -> bool {
        if !self.is_current_full(seq) {
            dash_info!(
                "dropping stale dataset response seq={seq} latest={:?}",
                self.latest_full
            );
            return false;
        }
        self.state = if ok {
            LoadState::Completed
        } else {
            LoadState::Errored
        };
        true
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSlot {
    pub state: LoadState,
    pub seq: u64,
    pub data: Option<serde_json::Value>,
}

/// Secondary data per expanded item, keyed by item identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSlots {
    slots: BTreeMap<String, GraphSlot>,
}

impl GraphSlots {
    pub fn begin(&mut self, key: &str, seq: u64) {
        let slot = self.slots.entry(key.to_string()).or_default();
        slot.state = LoadState::Loading;
        slot.seq = seq;
    }

    /// Stores a reply if it answers the slot's latest request.
    pub fn complete(&mut self, key: &str, seq: u64, data: serde_json::Value) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) if slot.seq == seq => {
                slot.state = LoadState::Completed;
                slot.data = Some(data);
                true
            }
            _ => {
                dash_info!("dropping stale graph response key={key} seq={seq}");
                false
            }
        }
    }

    /// Records a failure; earlier data for the item is kept.
    pub fn fail(&mut self, key: &str, seq: u64) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) if slot.seq == seq => {
                slot.state = LoadState::Errored;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&GraphSlot> {
        self.slots.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GraphSlot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
