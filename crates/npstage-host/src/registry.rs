//! Process-wide content-instance registry.
//!
//! The plugin identifies its owning instance on every inbound callback
//! through the opaque `ndata` field of the `NPP` it was handed. Rather than
//! smuggling a host pointer across the ABI, `ndata` carries a minted
//! [`InstanceId`] and inbound callbacks resolve it here.

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

impl InstanceId {
    pub(crate) fn as_ndata(self) -> *mut c_void {
        self.0 as usize as *mut c_void
    }

    pub(crate) fn from_ndata(ndata: *mut c_void) -> Option<Self> {
        if ndata.is_null() {
            return None;
        }
        Some(Self(ndata as usize as u64))
    }
}

/// The plugin's opaque notification cookie. Never dereferenced by the host;
/// it is passed back verbatim through the urlnotify round trip.
#[derive(Debug, Clone, Copy)]
pub struct NotifyToken(pub *mut c_void);

// Opaque cookie owned by the plugin; the host only stores and returns it,
// all on the single plugin-call thread.
unsafe impl Send for NotifyToken {}

/// A (URL, token) pair the plugin supplied during startup. The host must
/// complete it with a synthetic stream before playback counts as started.
#[derive(Debug)]
pub struct NotifyTarget {
    pub url: String,
    pub token: NotifyToken,
}

#[derive(Debug, Default)]
pub(crate) struct NotifySlot {
    pending: Mutex<Option<NotifyTarget>>,
}

impl NotifySlot {
    pub(crate) fn set(&self, target: NotifyTarget) {
        if let Ok(mut slot) = self.pending.lock() {
            *slot = Some(target);
        }
    }

    pub(crate) fn take(&self) -> Option<NotifyTarget> {
        self.pending.lock().ok().and_then(|mut slot| slot.take())
    }
}

#[derive(Default)]
pub(crate) struct InstanceRegistry {
    next_id: AtomicU64,
    inner: Mutex<HashMap<InstanceId, Arc<NotifySlot>>>,
}

impl InstanceRegistry {
    pub(crate) fn register(&self) -> (InstanceId, Arc<NotifySlot>) {
        let id = InstanceId(
            self.next_id
                .fetch_add(1, Ordering::Relaxed)
                .saturating_add(1),
        );
        let slot = Arc::new(NotifySlot::default());
        if let Ok(mut map) = self.inner.lock() {
            map.insert(id, Arc::clone(&slot));
        }
        (id, slot)
    }

    pub(crate) fn get(&self, id: InstanceId) -> Option<Arc<NotifySlot>> {
        let map = self.inner.lock().ok()?;
        map.get(&id).map(Arc::clone)
    }

    pub(crate) fn remove(&self, id: InstanceId) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(&id);
        }
    }
}

pub(crate) fn registry() -> &'static InstanceRegistry {
    static REGISTRY: OnceLock<InstanceRegistry> = OnceLock::new();
    REGISTRY.get_or_init(InstanceRegistry::default)
}
