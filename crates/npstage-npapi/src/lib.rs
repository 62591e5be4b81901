//! NPAPI plugin ABI definitions.
//!
//! The host and the plugin are independently compiled binaries that talk
//! exclusively through the `#[repr(C)]` tables and structs in this crate.
//! Field order and widths follow the classic Netscape plugin headers; do not
//! reorder fields or change integer widths without a protocol version bump.

use core::ffi::{c_char, c_void};

mod host;
mod plugin;
mod window;

pub use host::*;
pub use plugin::*;
pub use window::*;

/// Protocol version the host advertises in its export table.
pub const NP_VERSION_MAJOR: u8 = 0;
pub const NP_VERSION_MINOR: u8 = 11;

/// Combined version tag, `(major << 8) + minor`.
pub const fn np_version() -> u16 {
    ((NP_VERSION_MAJOR as u16) << 8) + NP_VERSION_MINOR as u16
}

// Mandatory plugin exports. Loading fails unless all four resolve.
pub const SYM_NP_INITIALIZE: &str = "NP_Initialize";
pub const SYM_NP_SHUTDOWN: &str = "NP_Shutdown";
pub const SYM_NP_GET_MIME_DESCRIPTION: &str = "NP_GetMIMEDescription";
pub const SYM_NP_GET_VALUE: &str = "NP_GetValue";

// Optional scriptable-peer exports. Each degrades independently when absent.
pub const SYM_PEER_PLAY: &str = "ScriptablePeer_Play";
pub const SYM_PEER_STOP_PLAY: &str = "ScriptablePeer_StopPlay";
pub const SYM_PEER_IS_PLAYING: &str = "ScriptablePeer_IsPlaying";
pub const SYM_PEER_RELEASE: &str = "ScriptablePeer_release";

pub type NPError = i16;
pub type NPReason = i16;
pub type NPBool = u8;

pub const NPERR_NO_ERROR: NPError = 0;
pub const NPERR_GENERIC_ERROR: NPError = 1;
pub const NPERR_INVALID_INSTANCE_ERROR: NPError = 2;
pub const NPERR_INVALID_FUNCTABLE_ERROR: NPError = 3;
pub const NPERR_MODULE_LOAD_FAILED_ERROR: NPError = 4;
pub const NPERR_OUT_OF_MEMORY_ERROR: NPError = 5;
pub const NPERR_INVALID_PLUGIN_ERROR: NPError = 6;
pub const NPERR_INVALID_PLUGIN_DIR_ERROR: NPError = 7;
pub const NPERR_INCOMPATIBLE_VERSION_ERROR: NPError = 8;
pub const NPERR_INVALID_PARAM: NPError = 9;
pub const NPERR_INVALID_URL: NPError = 10;
pub const NPERR_FILE_NOT_FOUND: NPError = 11;
pub const NPERR_NO_DATA: NPError = 12;
pub const NPERR_STREAM_NOT_SEEKABLE: NPError = 13;

pub const NPRES_DONE: NPReason = 0;
pub const NPRES_NETWORK_ERR: NPReason = 1;
pub const NPRES_USER_BREAK: NPReason = 2;

/// Instantiation modes passed to `NPP_New`.
pub const NP_EMBED: u16 = 1;
pub const NP_FULL: u16 = 2;

/// Stream types the host may request in `NPP_NewStream`.
pub const NP_NORMAL: u16 = 1;
pub const NP_SEEK: u16 = 2;
pub const NP_ASFILE: u16 = 3;
pub const NP_ASFILEONLY: u16 = 4;

/// Variables a host queries from the plugin via `NPP_GetValue`/`NP_GetValue`.
/// Kept as plain integers: values cross the ABI and must never be trusted to
/// stay in range.
pub type NPPVariable = i32;

pub const NPPV_PLUGIN_NAME_STRING: NPPVariable = 1;
pub const NPPV_PLUGIN_DESCRIPTION_STRING: NPPVariable = 2;
pub const NPPV_PLUGIN_WINDOW_BOOL: NPPVariable = 3;
pub const NPPV_PLUGIN_TRANSPARENT_BOOL: NPPVariable = 4;
pub const NPPV_JAVA_CLASS: NPPVariable = 5;
pub const NPPV_PLUGIN_WINDOW_SIZE: NPPVariable = 6;
pub const NPPV_PLUGIN_TIMER_INTERVAL: NPPVariable = 7;
pub const NPPV_PLUGIN_SCRIPTABLE_INSTANCE: NPPVariable = 10;
pub const NPPV_PLUGIN_SCRIPTABLE_IID: NPPVariable = 11;

/// Variables a plugin queries from the host via `NPN_GetValue`.
pub type NPNVariable = i32;

pub const NPNV_X_DISPLAY: NPNVariable = 1;
pub const NPNV_XT_APP_CONTEXT: NPNVariable = 2;
pub const NPNV_NETSCAPE_WINDOW: NPNVariable = 3;
pub const NPNV_JAVASCRIPT_ENABLED_BOOL: NPNVariable = 4;
pub const NPNV_ASD_ENABLED_BOOL: NPNVariable = 5;
pub const NPNV_IS_OFFLINE_BOOL: NPNVariable = 6;

/// Per-instance handle shared between host and plugin. The host allocates one
/// per content instance; `pdata` belongs to the plugin, `ndata` to the host.
/// The host stores an instance-registry id in `ndata`, never a pointer into
/// host state.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPP {
    pub pdata: *mut c_void,
    pub ndata: *mut c_void,
}

impl NPP {
    pub const fn zeroed() -> Self {
        Self {
            pdata: core::ptr::null_mut(),
            ndata: core::ptr::null_mut(),
        }
    }
}

/// One logical transfer of bytes from host to plugin, bounded by
/// new-stream/write*/destroy-stream calls. `pdata` is plugin-owned and opaque
/// to the host; `ndata` mirrors the owning instance tag.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPStream {
    pub pdata: *mut c_void,
    pub ndata: *mut c_void,
    pub url: *const c_char,
    pub end: u32,
    pub lastmodified: u32,
    pub notify_data: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPByteRange {
    pub offset: i32,
    pub length: u32,
    pub next: *mut NPByteRange,
}

/// Opaque state a plugin may hand back from `NPP_Destroy` for a later
/// reincarnation. This host never preserves it.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPSavedData {
    pub len: i32,
    pub buf: *mut c_void,
}
