//! Sequential donor browsing.
//!
//! [`DonorCursor`] is a single mutable cursor over the store's donor id
//! order. It performs no I/O: the controller feeds it fresh id lists and
//! loads whichever donor it lands on.

use serde::Serialize;

/// Position over an ordered list of donor ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorCursor {
    ids: Vec<i64>,
    index: Option<usize>,
    current: Option<i64>,
}

/// Which navigation moves are currently possible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Jump to the first donor.
    pub first: bool,
    /// Step back one donor.
    pub previous: bool,
    /// Step forward one donor.
    pub next: bool,
    /// Jump to the last donor.
    pub last: bool,
}

impl DonorCursor {
    /// An empty cursor with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The navigation order.
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Position of the current donor, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Id of the current donor, if any.
    #[must_use]
    pub fn current(&self) -> Option<i64> {
        self.current
    }

    /// Replace the id list, keeping the cursor on the same donor if it is
    /// still present.
    pub fn refresh(&mut self, ids: Vec<i64>) {
        self.ids = ids;
        self.index = self
            .current
            .and_then(|id| self.ids.iter().position(|&candidate| candidate == id));
        if self.index.is_none() {
            self.current = None;
        }
    }

    /// Jump to the first donor. Clears the selection on an empty list.
    pub fn first(&mut self) -> Option<i64> {
        if self.ids.is_empty() {
            self.clear();
            return None;
        }
        self.move_to(0)
    }

    /// Jump to the last donor. Clears the selection on an empty list.
    pub fn last(&mut self) -> Option<i64> {
        match self.ids.len() {
            0 => {
                self.clear();
                None
            }
            len => self.move_to(len - 1),
        }
    }

    /// Step back one donor; `None` (and no change) at the start.
    pub fn previous(&mut self) -> Option<i64> {
        match self.index {
            Some(i) if i > 0 => self.move_to(i - 1),
            _ => None,
        }
    }

    /// Step forward one donor; `None` (and no change) at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<i64> {
        match self.index {
            Some(i) if i + 1 < self.ids.len() => self.move_to(i + 1),
            _ => None,
        }
    }

    /// Move to a specific donor. Returns `false` if the id is not in the list.
    pub fn select(&mut self, id: i64) -> bool {
        match self.ids.iter().position(|&candidate| candidate == id) {
            Some(i) => {
                self.move_to(i);
                true
            }
            None => false,
        }
    }

    /// Drop the current donor, keeping the id list.
    pub fn clear(&mut self) {
        self.index = None;
        self.current = None;
    }

    /// Which moves would land on a different donor inside the list.
    #[must_use]
    pub fn state(&self) -> NavigationState {
        let len = self.ids.len();
        if len == 0 {
            return NavigationState::default();
        }
        let last = len - 1;
        NavigationState {
            first: self.index != Some(0),
            previous: matches!(self.index, Some(i) if i > 0),
            next: matches!(self.index, Some(i) if i < last),
            last: self.index != Some(last),
        }
    }

    fn move_to(&mut self, index: usize) -> Option<i64> {
        let id = self.ids[index];
        self.index = Some(index);
        self.current = Some(id);
        Some(id)
    }
}
