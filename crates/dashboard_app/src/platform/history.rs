use dashboard_core::NavigationMode;

/// Back/forward stack of location queries, the terminal's stand-in for
/// browser history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub(crate) fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    pub(crate) fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Records a location write. `Push` drops any forward entries.
    pub(crate) fn record(&mut self, query: &str, mode: NavigationMode) {
        match mode {
            NavigationMode::Replace => self.entries[self.cursor] = query.to_string(),
            NavigationMode::Push => {
                if self.current() == query {
                    return;
                }
                self.entries.truncate(self.cursor + 1);
                self.entries.push(query.to_string());
                self.cursor += 1;
            }
        }
    }

    pub(crate) fn back(&mut self) -> Option<&str> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.current())
    }

    pub(crate) fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}
