//! The emulated browser-side callback table.
//!
//! Every entry point the plugin ABI names is implemented here and wired into
//! the export table handed to `NP_Initialize`. The supported surface is
//! deliberately small: URL-notify forwarding, memory pass-through, the
//! user-agent query and status logging. Everything else is a stub that
//! reports the ABI's generic failure code and nothing more; an unsupported
//! callback never escalates beyond its return value.
//!
//! All calls arrive synchronously on the single plugin-call thread.

use std::ffi::{CStr, c_char, c_void};

use npstage_npapi::{
    NPBool, NPByteRange, NPERR_GENERIC_ERROR, NPERR_INVALID_INSTANCE_ERROR, NPERR_INVALID_PARAM,
    NPERR_NO_ERROR, NPError, NPNVariable, NPNetscapeFuncs, NPP, NPPVariable, NPReason, NPRect,
    NPStream, np_version,
};

use crate::registry::{InstanceId, NotifyTarget, NotifyToken, registry};

/// Fixed identification string returned from the user-agent query. The
/// hosted binaries sniff it, so it stays a plausible Gecko signature.
static USER_AGENT: &CStr =
    c"Mozilla/5.0 (X11; U; Linux i686; en-US; rv:1.7.5) Gecko/20041116 Firefox/1.0";

/// Builds the fully-populated, version-tagged host export table.
pub(crate) fn host_exports() -> NPNetscapeFuncs {
    let mut exports = NPNetscapeFuncs::zeroed();
    exports.size = size_of::<NPNetscapeFuncs>() as u16;
    exports.version = np_version();
    exports.geturl = Some(npn_geturl);
    exports.posturl = Some(npn_posturl);
    exports.requestread = Some(npn_requestread);
    exports.newstream = Some(npn_newstream);
    exports.write = Some(npn_write);
    exports.destroystream = Some(npn_destroystream);
    exports.status = Some(npn_status);
    exports.uagent = Some(npn_useragent);
    exports.memalloc = Some(npn_memalloc);
    exports.memfree = Some(npn_memfree);
    exports.memflush = Some(npn_memflush);
    exports.reloadplugins = Some(npn_reloadplugins);
    exports.getjavaenv = Some(npn_getjavaenv);
    exports.getjavapeer = Some(npn_getjavapeer);
    exports.geturlnotify = Some(npn_geturlnotify);
    exports.posturlnotify = Some(npn_posturlnotify);
    exports.getvalue = Some(npn_getvalue);
    exports.setvalue = Some(npn_setvalue);
    exports.invalidaterect = Some(npn_invalidaterect);
    exports.invalidateregion = Some(npn_invalidateregion);
    exports.forceredraw = Some(npn_forceredraw);
    exports
}

/// Renders a possibly-null C string argument for the callback trace.
fn cstr_arg(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return "NULL".to_string();
    }
    // SAFETY: non-null strings handed to host callbacks are NUL-terminated
    // per the ABI; lifetime is bounded by the synchronous call.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

extern "C" fn npn_geturl(instance: *mut NPP, url: *const c_char, window: *const c_char) -> NPError {
    tracing::debug!(
        target: "npstage::npn",
        url = %cstr_arg(url),
        window = %cstr_arg(window),
        "NPN_GetURL"
    );
    npn_geturlnotify(instance, url, window, std::ptr::null_mut())
}

extern "C" fn npn_geturlnotify(
    instance: *mut NPP,
    url: *const c_char,
    window: *const c_char,
    notify_data: *mut c_void,
) -> NPError {
    let url = cstr_arg(url);
    tracing::debug!(
        target: "npstage::npn",
        url = %url,
        window = %cstr_arg(window),
        notify_data = ?notify_data,
        "NPN_GetURLNotify"
    );
    if notify_data.is_null() {
        return NPERR_NO_ERROR;
    }

    // A non-null token is the plugin asking to be called back once the work
    // behind `url` is delivered; park it on the originating instance.
    let id = if instance.is_null() {
        None
    } else {
        // SAFETY: `instance` is the NPP this host allocated for the calling
        // plugin instance; valid for the duration of the synchronous call.
        InstanceId::from_ndata(unsafe { (*instance).ndata })
    };
    let Some(slot) = id.and_then(|id| registry().get(id)) else {
        tracing::warn!(target: "npstage::npn", url = %url, "NPN_GetURLNotify from unknown instance");
        return NPERR_INVALID_INSTANCE_ERROR;
    };
    slot.set(NotifyTarget {
        url,
        token: NotifyToken(notify_data),
    });
    NPERR_NO_ERROR
}

extern "C" fn npn_posturl(
    _instance: *mut NPP,
    url: *const c_char,
    _window: *const c_char,
    _len: u32,
    _buf: *const c_char,
    _file: NPBool,
) -> NPError {
    tracing::debug!(target: "npstage::npn", url = %cstr_arg(url), "NPN_PostURL: unsupported");
    NPERR_GENERIC_ERROR
}

extern "C" fn npn_posturlnotify(
    _instance: *mut NPP,
    url: *const c_char,
    _window: *const c_char,
    _len: u32,
    _buf: *const c_char,
    _file: NPBool,
    _notify_data: *mut c_void,
) -> NPError {
    tracing::debug!(target: "npstage::npn", url = %cstr_arg(url), "NPN_PostURLNotify: unsupported");
    NPERR_GENERIC_ERROR
}

extern "C" fn npn_requestread(_stream: *mut NPStream, _range: *mut NPByteRange) -> NPError {
    tracing::debug!(target: "npstage::npn", "NPN_RequestRead: unsupported");
    NPERR_GENERIC_ERROR
}

extern "C" fn npn_newstream(
    _instance: *mut NPP,
    _mime_type: *const c_char,
    _window: *const c_char,
    _stream: *mut *mut NPStream,
) -> NPError {
    tracing::debug!(target: "npstage::npn", "NPN_NewStream: unsupported");
    NPERR_GENERIC_ERROR
}

extern "C" fn npn_write(
    _instance: *mut NPP,
    _stream: *mut NPStream,
    _len: i32,
    _buffer: *mut c_void,
) -> i32 {
    tracing::debug!(target: "npstage::npn", "NPN_Write: unsupported");
    0
}

extern "C" fn npn_destroystream(
    _instance: *mut NPP,
    _stream: *mut NPStream,
    _reason: NPReason,
) -> NPError {
    tracing::debug!(target: "npstage::npn", "NPN_DestroyStream: unsupported");
    NPERR_GENERIC_ERROR
}

extern "C" fn npn_status(_instance: *mut NPP, message: *const c_char) {
    tracing::debug!(target: "npstage::npn", message = %cstr_arg(message), "NPN_Status");
}

extern "C" fn npn_useragent(_instance: *mut NPP) -> *const c_char {
    tracing::debug!(target: "npstage::npn", "NPN_UserAgent");
    USER_AGENT.as_ptr()
}

extern "C" fn npn_memalloc(size: u32) -> *mut c_void {
    // SAFETY: plain C allocation; the plugin may free this block itself, so
    // it must come from the process allocator.
    let ptr = unsafe { libc::malloc(size as usize) };
    tracing::debug!(target: "npstage::npn", size, ptr = ?ptr, "NPN_MemAlloc");
    ptr
}

extern "C" fn npn_memfree(ptr: *mut c_void) {
    tracing::debug!(target: "npstage::npn", ptr = ?ptr, "NPN_MemFree");
    // SAFETY: the ABI requires `ptr` to originate from NPN_MemAlloc.
    unsafe { libc::free(ptr) };
}

extern "C" fn npn_memflush(size: u32) -> u32 {
    tracing::debug!(target: "npstage::npn", size, "NPN_MemFlush");
    0
}

extern "C" fn npn_reloadplugins(_reload_pages: NPBool) {
    tracing::debug!(target: "npstage::npn", "NPN_ReloadPlugins: unsupported");
}

extern "C" fn npn_getjavaenv() -> *mut c_void {
    tracing::debug!(target: "npstage::npn", "NPN_GetJavaEnv: unsupported");
    std::ptr::null_mut()
}

extern "C" fn npn_getjavapeer(_instance: *mut NPP) -> *mut c_void {
    tracing::debug!(target: "npstage::npn", "NPN_GetJavaPeer: unsupported");
    std::ptr::null_mut()
}

extern "C" fn npn_getvalue(
    _instance: *mut NPP,
    variable: NPNVariable,
    _value: *mut c_void,
) -> NPError {
    // No browser variable is supported; the plugin copes with the refusal.
    tracing::debug!(target: "npstage::npn", variable, "NPN_GetValue: unsupported variable");
    NPERR_INVALID_PARAM
}

extern "C" fn npn_setvalue(
    _instance: *mut NPP,
    variable: NPPVariable,
    value: *mut c_void,
) -> NPError {
    tracing::debug!(target: "npstage::npn", variable, value = ?value, "NPN_SetValue");
    NPERR_NO_ERROR
}

extern "C" fn npn_invalidaterect(_instance: *mut NPP, _rect: *mut NPRect) {
    tracing::debug!(target: "npstage::npn", "NPN_InvalidateRect: unsupported");
}

extern "C" fn npn_invalidateregion(_instance: *mut NPP, _region: *mut c_void) {
    tracing::debug!(target: "npstage::npn", "NPN_InvalidateRegion: unsupported");
}

extern "C" fn npn_forceredraw(_instance: *mut NPP) {
    tracing::debug!(target: "npstage::npn", "NPN_ForceRedraw: unsupported");
}
