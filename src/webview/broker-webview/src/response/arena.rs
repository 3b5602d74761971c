//! Storage for switch-browser responses referenced by resume responses.
//!
//! A resume response does not own its parent. It holds a [`ResponseHandle`]
//! into a [`ResponseArena`] the caller keeps for the duration of the flow.
//! Handles are tagged with the arena that issued them, so a handle from one
//! arena never resolves in another.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::response::{BrowserSwitchResponse, BrowserSwitchResumeResponse};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a response stored in a [`ResponseArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseHandle {
    arena: u64,
    index: usize,
}

/// Append-only store of initiating switch-browser responses.
#[derive(Debug)]
pub struct ResponseArena {
    id: u64,
    responses: Vec<BrowserSwitchResponse>,
}

impl ResponseArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            responses: Vec::new(),
        }
    }

    /// Stores `response` and returns its handle.
    pub fn insert(&mut self, response: BrowserSwitchResponse) -> ResponseHandle {
        let handle = ResponseHandle {
            arena: self.id,
            index: self.responses.len(),
        };
        self.responses.push(response);
        handle
    }

    /// Resolves a handle issued by this arena.
    pub fn get(&self, handle: ResponseHandle) -> Option<&BrowserSwitchResponse> {
        if handle.arena != self.id {
            return None;
        }
        self.responses.get(handle.index)
    }

    /// Stores `parent` and links `child` to it.
    pub fn link_parent(
        &mut self,
        child: &mut BrowserSwitchResumeResponse,
        parent: BrowserSwitchResponse,
    ) -> ResponseHandle {
        let handle = self.insert(parent);
        child.set_parent(handle);
        debug!(arena = self.id, index = handle.index, "Linked resume response to parent");
        handle
    }

    /// Number of stored responses.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Default for ResponseArena {
    fn default() -> Self {
        Self::new()
    }
}
