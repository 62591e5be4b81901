//! Loaded-plugin session: one per plugin binary, shared by every content
//! instance created against it.

use std::ffi::{CStr, c_char, c_void};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use npstage_npapi::{
    NPERR_NO_ERROR, NPPV_PLUGIN_DESCRIPTION_STRING, NPPV_PLUGIN_NAME_STRING, NPPVariable,
    NPNetscapeFuncs, NPPluginFuncs, NpGetMimeDescriptionFn, NpGetValueFn, NpInitializeFn,
    NpShutdownFn, PeerControlFn, PeerQueryFn, SYM_NP_GET_MIME_DESCRIPTION, SYM_NP_GET_VALUE,
    SYM_NP_INITIALIZE, SYM_NP_SHUTDOWN, SYM_PEER_IS_PLAYING, SYM_PEER_PLAY, SYM_PEER_RELEASE,
    SYM_PEER_STOP_PLAY,
};

use crate::error::{Error, Result};
use crate::loader::LoadedModule;
use crate::npn::host_exports;
use crate::validate::{canonicalize_path, dynamic_library_ext, ensure_valid_file};
use crate::vtable::PluginVTable;

/// The optional scriptable-peer control surface. Each entry degrades
/// independently when the binary never exported it.
#[derive(Clone, Copy, Default)]
pub(crate) struct PeerSymbols {
    pub(crate) play: Option<PeerControlFn>,
    pub(crate) stop_play: Option<PeerControlFn>,
    pub(crate) is_playing: Option<PeerQueryFn>,
    pub(crate) release: Option<PeerControlFn>,
}

pub struct PluginSession {
    path: PathBuf,
    description: String,
    // Handed to the plugin at initialize time; must stay pinned for the
    // plugin's lifetime.
    _exports: Box<NPNetscapeFuncs>,
    vtable: PluginVTable,
    get_mime_description: NpGetMimeDescriptionFn,
    get_value: NpGetValueFn,
    shutdown: NpShutdownFn,
    peer: PeerSymbols,
    initialized: bool,
    // Declared last: the module unloads only after NP_Shutdown ran in Drop.
    module: LoadedModule,
}

impl std::fmt::Debug for PluginSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginSession")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl PluginSession {
    /// Loads and handshakes a plugin binary. Every step must succeed; any
    /// partial state is released before the error surfaces.
    pub fn open(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let path = canonicalize_path(path.as_ref())?;
        ensure_valid_file(&path, &[dynamic_library_ext()])?;

        let module = LoadedModule::open(&path)?;
        let initialize: NpInitializeFn = module.mandatory(SYM_NP_INITIALIZE)?;
        let shutdown: NpShutdownFn = module.mandatory(SYM_NP_SHUTDOWN)?;
        let get_mime_description: NpGetMimeDescriptionFn =
            module.mandatory(SYM_NP_GET_MIME_DESCRIPTION)?;
        let get_value: NpGetValueFn = module.mandatory(SYM_NP_GET_VALUE)?;

        let peer = PeerSymbols {
            play: module.optional(SYM_PEER_PLAY),
            stop_play: module.optional(SYM_PEER_STOP_PLAY),
            is_playing: module.optional(SYM_PEER_IS_PLAYING),
            release: module.optional(SYM_PEER_RELEASE),
        };

        let mut exports = Box::new(host_exports());
        let mut funcs = NPPluginFuncs::zeroed();
        funcs.size = size_of::<NPPluginFuncs>() as u16;

        // SAFETY: the entry point matches the ABI typedef; the export table
        // is pinned behind the Box and outlives the plugin.
        let code = unsafe { initialize(exports.as_mut(), &mut funcs) };
        if code != NPERR_NO_ERROR {
            // Dropping `module` here unloads the binary without a shutdown
            // call; the plugin never finished initializing.
            return Err(Error::init_failed(format!(
                "NP_Initialize returned error code {code}"
            )));
        }

        let description = query_static_string(get_value, NPPV_PLUGIN_DESCRIPTION_STRING)
            .unwrap_or_default();
        tracing::info!(
            target: "npstage::session",
            path = %path.display(),
            description = %description,
            "plugin session initialized"
        );

        Ok(Arc::new(Self {
            path,
            description,
            _exports: exports,
            vtable: PluginVTable::new(funcs),
            get_mime_description,
            get_value,
            shutdown,
            peer,
            initialized: true,
            module,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Plugin description (name, version) cached at open time.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Plugin product name, queried on demand.
    pub fn plugin_name(&self) -> Option<String> {
        query_static_string(self.get_value, NPPV_PLUGIN_NAME_STRING)
    }

    /// The MIME types the plugin claims to handle, in the ABI's
    /// `type:extensions:description` form.
    pub fn mime_description(&self) -> Option<String> {
        // SAFETY: mandatory symbol resolved at open; returns a static string
        // or null.
        let raw = unsafe { (self.get_mime_description)() };
        if raw.is_null() {
            return None;
        }
        // SAFETY: non-null return is NUL-terminated static plugin data.
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    /// Resolves an arbitrary exported symbol from the plugin binary.
    ///
    /// # Safety
    /// `T` must match the symbol's actual type; a mismatch is undefined
    /// behavior at use time.
    pub unsafe fn custom_symbol<T: Copy>(&self, name: &str) -> Option<T> {
        self.module.optional(name)
    }

    pub(crate) fn vtable(&self) -> &PluginVTable {
        &self.vtable
    }

    pub(crate) fn peer(&self) -> &PeerSymbols {
        &self.peer
    }
}

impl Drop for PluginSession {
    fn drop(&mut self) {
        if self.initialized {
            self.initialized = false;
            // SAFETY: initialize succeeded, shutdown runs exactly once, and
            // the module stays loaded until after this call.
            let code = unsafe { (self.shutdown)() };
            tracing::debug!(
                target: "npstage::session",
                path = %self.path.display(),
                code,
                "NP_Shutdown"
            );
        }
    }
}

/// Queries a string-valued plugin property through the static `NP_GetValue`
/// entry point. The returned storage is plugin-owned and copied immediately.
fn query_static_string(get_value: NpGetValueFn, variable: NPPVariable) -> Option<String> {
    let mut raw: *const c_char = std::ptr::null();
    // SAFETY: the entry point matches the ABI typedef; the out-parameter is
    // a valid pointer slot.
    let code = unsafe {
        get_value(
            std::ptr::null_mut(),
            variable,
            (&mut raw) as *mut *const c_char as *mut c_void,
        )
    };
    if code != NPERR_NO_ERROR || raw.is_null() {
        tracing::warn!(target: "npstage::session", variable, code, "plugin property query failed");
        return None;
    }
    // SAFETY: non-null result is a NUL-terminated plugin-owned string.
    Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
}
