//! One playable piece of content bound to one plugin instantiation.
//!
//! Drives the instantiate → set-window → stream → play cycle and the reverse
//! teardown. All plugin calls happen on the caller's thread; the completion
//! poll is a deferred re-entry on that same thread, so the instance lock is
//! never held while user callbacks run.

use std::ffi::{CStr, c_int, c_void};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use memmap2::Mmap;
use npstage_npapi::{
    NP_ASFILE, NP_EMBED, NP_NORMAL, NP_SETWINDOW, NP_WINDOW_TYPE_WINDOW, NPERR_NO_ERROR,
    NPPV_PLUGIN_SCRIPTABLE_INSTANCE, NPP, NPSetWindowCallbackStruct, NPWindow,
};

use crate::attrs::AttrList;
use crate::error::{Error, Result};
use crate::registry::{InstanceId, NotifySlot, registry};
use crate::sched::TickScheduler;
use crate::session::PluginSession;
use crate::stream::{StreamRequest, deliver};
use crate::surface::{EmbeddedSurface, WindowHost};
use crate::validate::{canonicalize_path, ensure_valid_file};

const CONTENT_MIME_TYPE: &str = "application/x-shockwave-flash";
const CONTENT_MIME_TYPE_C: &CStr = c"application/x-shockwave-flash";
const CONTENT_EXTENSIONS: &[&str] = &[".swf"];
const NOTIFY_MIME_TYPE: &str = "text/plain";
/// The synthetic payload completing the plugin's startup notify request: the
/// literal script result `null`, NUL-terminated.
const NOTIFY_PAYLOAD: &[u8] = b"null\0";
/// Completion detection is a poll, not a callback; the ABI offers no
/// playback-finished notification. Detection latency is bounded by this
/// interval.
pub const COMPLETION_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Sentinel preloaded into the peer query out-parameter. A call that leaves
/// it untouched never wrote a result and does not count as an answer.
const PEER_RESULT_UNWRITTEN: c_int = c_int::MIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Stopped,
}

pub type EventCallback = dyn Fn(PlaybackEvent);

pub struct ContentInstance {
    core: Arc<Mutex<PlaybackCore>>,
    id: InstanceId,
    notify: Arc<NotifySlot>,
    callback: Option<Arc<EventCallback>>,
}

struct PlaybackCore {
    session: Arc<PluginSession>,
    path: PathBuf,
    // Stable address for the plugin's lifetime; `ndata` carries the registry
    // id, never a host pointer.
    npp: Box<NPP>,
    instantiated: bool,
    playing: bool,
    surface: Option<Box<dyn EmbeddedSurface>>,
}

impl std::fmt::Debug for ContentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentInstance")
            .field("id", &self.id)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

impl ContentInstance {
    /// Binds a validated content file to `session`. The file must exist, be
    /// readable and carry the content extension; rejection is `AccessDenied`
    /// and no plugin instance is created.
    pub fn new(
        session: Arc<PluginSession>,
        path: impl AsRef<Path>,
        callback: Option<Box<EventCallback>>,
    ) -> Result<Self> {
        let path = canonicalize_path(path.as_ref())?;
        ensure_valid_file(&path, CONTENT_EXTENSIONS)?;

        let (id, notify) = registry().register();
        let mut npp = Box::new(NPP::zeroed());
        npp.ndata = id.as_ndata();

        Ok(Self {
            core: Arc::new(Mutex::new(PlaybackCore {
                session,
                path,
                npp,
                instantiated: false,
                playing: false,
                surface: None,
            })),
            id,
            notify,
            callback: callback.map(Arc::from),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.lock_core().path.clone()
    }

    /// Runs the full start sequence. On any failure the partial state is
    /// unwound in reverse order and the instance is back to idle.
    pub fn play(
        &self,
        window: &dyn WindowHost,
        scheduler: &dyn TickScheduler,
        loop_playback: bool,
    ) -> Result<()> {
        let mut core = self.lock_core();
        if core.playing {
            return Err(Error::playback_failed("instance is already playing"));
        }
        let session = Arc::clone(&core.session);
        let geometry = window.geometry();
        let file_url = format!("file:{}", core.path.display());

        let width_attr = geometry.width.to_string();
        let height_attr = geometry.height.to_string();
        let attrs = AttrList::from_pairs(&[
            ("SRC", file_url.as_str()),
            ("TYPE", CONTENT_MIME_TYPE),
            ("WIDTH", width_attr.as_str()),
            ("HEIGHT", height_attr.as_str()),
            ("LOOP", if loop_playback { "true" } else { "false" }),
        ])?;

        session
            .vtable()
            .new_instance(CONTENT_MIME_TYPE_C, core.npp_ptr(), NP_EMBED, &attrs)?;
        core.instantiated = true;
        tracing::debug!(
            target: "npstage::content",
            path = %core.path.display(),
            width = geometry.width,
            height = geometry.height,
            loop_playback,
            "plugin instance created"
        );

        let surface = match window.create_embedded(geometry.width, geometry.height) {
            Ok(surface) => surface,
            Err(err) => {
                core.teardown(false);
                return Err(err);
            }
        };
        let descriptor = surface.descriptor();
        core.surface = Some(surface);

        let mut ws_info = NPSetWindowCallbackStruct {
            kind: NP_SETWINDOW,
            display: descriptor.display,
            visual: descriptor.visual,
            colormap: descriptor.colormap,
            depth: descriptor.depth,
        };
        let mut np_window = NPWindow::zeroed();
        np_window.window = descriptor.window;
        np_window.width = geometry.width;
        np_window.height = geometry.height;
        np_window.ws_info = (&mut ws_info) as *mut NPSetWindowCallbackStruct as *mut c_void;
        np_window.window_type = NP_WINDOW_TYPE_WINDOW;

        if let Err(err) = session.vtable().set_window(core.npp_ptr(), &mut np_window) {
            // The window was never successfully set; no null set-window call.
            core.teardown(false);
            return Err(err);
        }

        if let Err(err) = self.send_to_plugin(&mut core, &session, &file_url) {
            core.teardown(true);
            return Err(err);
        }
        core.playing = true;
        tracing::info!(target: "npstage::content", path = %core.path.display(), "playback started");
        drop(core);

        if !loop_playback && let Some(callback) = self.callback.clone() {
            let poll_core = Arc::clone(&self.core);
            scheduler.add_repeating(
                COMPLETION_POLL_INTERVAL,
                Box::new(move || {
                    let still_playing = {
                        let mut core = lock(&poll_core);
                        query_playing(&mut core)
                    };
                    if still_playing {
                        return true;
                    }
                    // Lock released above: the callback may call stop().
                    (*callback)(PlaybackEvent::Stopped);
                    false
                }),
            );
        }
        Ok(())
    }

    /// Streams the content bytes, checks the plugin asked for its startup
    /// notification, then completes that request with the synthetic payload.
    fn send_to_plugin(
        &self,
        core: &mut PlaybackCore,
        session: &PluginSession,
        file_url: &str,
    ) -> Result<()> {
        let file = File::open(&core.path).map_err(|source| Error::io_at(&core.path, source))?;
        let len = file
            .metadata()
            .map_err(|source| Error::io_at(&core.path, source))?
            .len();
        let map;
        let bytes: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: mapped read-only for the duration of this one stream
            // call; the file is not expected to be truncated underneath us.
            map = unsafe { Mmap::map(&file) }.map_err(|source| Error::io_at(&core.path, source))?;
            &map
        };

        deliver(
            session.vtable(),
            core.npp_ptr(),
            StreamRequest {
                url: file_url,
                mime_type: CONTENT_MIME_TYPE,
                stream_type: NP_ASFILE,
                notify: None,
            },
            bytes,
        )?;

        let Some(target) = self.notify.take() else {
            return Err(Error::playback_failed(
                "never received ancillary notification request",
            ));
        };
        deliver(
            session.vtable(),
            core.npp_ptr(),
            StreamRequest {
                url: &target.url,
                mime_type: NOTIFY_MIME_TYPE,
                stream_type: NP_NORMAL,
                notify: Some(target.token),
            },
            NOTIFY_PAYLOAD,
        )
    }

    /// Tears playback down and returns to idle. No-op (false) when already
    /// idle. Safe to call from within the completion-poll callback.
    pub fn stop(&self) -> bool {
        let mut core = self.lock_core();
        if !core.playing {
            return false;
        }
        core.playing = false;
        core.teardown(true);
        tracing::info!(target: "npstage::content", path = %core.path.display(), "playback stopped");
        true
    }

    /// Best-effort pause through the scriptable peer; false when the plugin
    /// never exported the control.
    pub fn pause(&self) -> bool {
        let mut core = self.lock_core();
        let session = Arc::clone(&core.session);
        let Some(stop_play) = session.peer().stop_play else {
            return false;
        };
        let Some(peer) = acquire_script_peer(&mut core, &session) else {
            return false;
        };
        // SAFETY: peer handle freshly acquired from the plugin, released
        // below.
        unsafe { stop_play(peer) };
        release_script_peer(&session, peer);
        true
    }

    /// Best-effort resume; the counterpart of [`pause`](Self::pause).
    pub fn resume(&self) -> bool {
        let mut core = self.lock_core();
        let session = Arc::clone(&core.session);
        let Some(play) = session.peer().play else {
            return false;
        };
        let Some(peer) = acquire_script_peer(&mut core, &session) else {
            return false;
        };
        // SAFETY: as in pause().
        unsafe { play(peer) };
        release_script_peer(&session, peer);
        true
    }

    /// Asks the plugin whether it is still rendering; falls back to the
    /// locally tracked flag when the peer query is unavailable or refuses to
    /// answer.
    pub fn is_playing(&self) -> bool {
        let mut core = self.lock_core();
        query_playing(&mut core)
    }

    fn lock_core(&self) -> MutexGuard<'_, PlaybackCore> {
        lock(&self.core)
    }
}

impl Drop for ContentInstance {
    fn drop(&mut self) {
        self.stop();
        registry().remove(self.id);
    }
}

fn lock(core: &Arc<Mutex<PlaybackCore>>) -> MutexGuard<'_, PlaybackCore> {
    core.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl PlaybackCore {
    fn npp_ptr(&mut self) -> *mut NPP {
        self.npp.as_mut()
    }

    /// Reverse-order teardown shared by stop and every play unwind path.
    /// `window_was_set` is true only after a successful set-window call.
    fn teardown(&mut self, window_was_set: bool) {
        let session = Arc::clone(&self.session);
        self.surface = None;
        if window_was_set
            && let Err(err) = session.vtable().set_window(self.npp_ptr(), std::ptr::null_mut())
        {
            tracing::warn!(target: "npstage::content", error = %err, "null set-window during teardown");
        }
        if self.instantiated {
            if let Err(err) = session.vtable().destroy_instance(self.npp_ptr()) {
                tracing::warn!(target: "npstage::content", error = %err, "destroy during teardown");
            }
            self.instantiated = false;
        }
    }
}

fn query_playing(core: &mut PlaybackCore) -> bool {
    let session = Arc::clone(&core.session);
    let Some(is_playing) = session.peer().is_playing else {
        return core.playing;
    };
    let Some(peer) = acquire_script_peer(core, &session) else {
        return core.playing;
    };
    let mut value: c_int = PEER_RESULT_UNWRITTEN;
    // SAFETY: optional symbol resolved from the loaded module; peer handle
    // acquired above.
    unsafe { is_playing(peer, &mut value) };
    release_script_peer(&session, peer);
    if value == PEER_RESULT_UNWRITTEN {
        tracing::warn!(
            target: "npstage::content",
            "peer playing query wrote no result; using tracked state"
        );
        return core.playing;
    }
    value != 0
}

/// Acquires a transient scriptable-peer handle via the instance property
/// query. The handle is valid until released.
fn acquire_script_peer(core: &mut PlaybackCore, session: &PluginSession) -> Option<*mut c_void> {
    if !core.instantiated {
        return None;
    }
    let mut peer: *mut c_void = std::ptr::null_mut();
    let code = session.vtable().get_value(
        core.npp_ptr(),
        NPPV_PLUGIN_SCRIPTABLE_INSTANCE,
        (&mut peer) as *mut *mut c_void as *mut c_void,
    );
    if code == NPERR_NO_ERROR && !peer.is_null() {
        Some(peer)
    } else {
        None
    }
}

fn release_script_peer(session: &PluginSession, peer: *mut c_void) {
    if let Some(release) = session.peer().release {
        // SAFETY: releases the handle acquired by acquire_script_peer.
        unsafe { release(peer) };
    }
}
