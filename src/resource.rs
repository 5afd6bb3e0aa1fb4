//! Displayable resource handles for uploaded images.
//!
//! In the browser a handle is an object URL created from the upload's bytes;
//! natively it is an entry in an in-memory registry. A [`ResourceHandle`] is
//! not `Clone`: releasing consumes it, so a handle can be handed
//! back to its host at most once.

use std::collections::HashMap;
use std::sync::Arc;

/// An allocated displayable resource.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    url: String,
}

impl ResourceHandle {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// URL the rendering layer can display the image from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Allocates and releases displayable resources.
pub trait ResourceHost {
    /// Allocate a resource for an upload's bytes.
    fn allocate(&mut self, name: &str, media_type: &str, bytes: &Arc<[u8]>) -> ResourceHandle;

    /// Release a previously allocated resource.
    fn release(&mut self, handle: ResourceHandle);
}

/// In-memory host used natively and in tests.
///
/// Keeps a counter of allocations and releases so resource discipline can be
/// checked.
#[derive(Debug, Default)]
pub struct MemoryResourceHost {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
    allocated: usize,
    released: usize,
}

impl MemoryResourceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total handles ever allocated.
    pub fn allocated_count(&self) -> usize {
        self.allocated
    }

    /// Total handles ever released.
    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Bytes behind a live handle.
    pub fn bytes(&self, handle: &ResourceHandle) -> Option<&[u8]> {
        self.live.get(&handle.id).map(|b| b.as_ref())
    }
}

impl ResourceHost for MemoryResourceHost {
    fn allocate(&mut self, name: &str, _media_type: &str, bytes: &Arc<[u8]>) -> ResourceHandle {
        self.next_id += 1;
        self.allocated += 1;
        self.live.insert(self.next_id, Arc::clone(bytes));
        log::trace!("Allocated resource {} for {}", self.next_id, name);
        ResourceHandle::new(self.next_id, format!("memory://{}/{}", self.next_id, name))
    }

    fn release(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle.id).is_some() {
            self.released += 1;
            log::trace!("Released resource {}", handle.id);
        } else {
            log::warn!("Release of unknown resource {}", handle.id);
        }
    }
}
