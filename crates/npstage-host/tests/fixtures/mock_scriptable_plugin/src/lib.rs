//! Mock plugin exporting the optional scriptable-peer control surface on
//! top of the full stream protocol. Used to exercise pause/resume and the
//! peer-backed playing query, including the silent-peer failure mode.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use npstage_npapi::{
    NP_ASFILE, NPBool, NPERR_GENERIC_ERROR, NPERR_INVALID_PARAM, NPERR_NO_ERROR, NPError,
    NPNetscapeFuncs, NPP, NPPV_PLUGIN_SCRIPTABLE_INSTANCE, NPPVariable, NPPluginFuncs, NPReason,
    NPSavedData, NPStream, NPWindow,
};

// Counter kinds, mirrored in the test support module.
const C_NEW: usize = 2;
const C_DESTROY: usize = 3;
const C_NEWSTREAM: usize = 6;
const C_DESTROYSTREAM: usize = 9;
const C_WRITE: usize = 11;
const C_URLNOTIFY: usize = 14;
const C_PEER_ACQUIRES: usize = 20;
const C_PEER_RELEASES: usize = 21;
const C_PEER_PLAY: usize = 22;
const C_PEER_STOP_PLAY: usize = 23;
const C_PEER_IS_PLAYING: usize = 24;
const COUNTER_SLOTS: usize = 25;

// Config keys.
const K_WRITE_READY: usize = 0;
const K_SKIP_NOTIFY: usize = 4;
const K_PEER_SILENT: usize = 5;
const CONFIG_SLOTS: usize = 6;

const DEFAULT_WRITE_READY: i64 = 256;
const NOTIFY_TOKEN: usize = 0xC0FFEE;

static COUNTERS: [AtomicI64; COUNTER_SLOTS] = [const { AtomicI64::new(0) }; COUNTER_SLOTS];
static CONFIG: [AtomicI64; CONFIG_SLOTS] = [const { AtomicI64::new(0) }; CONFIG_SLOTS];
static HOST: Mutex<Option<NPNetscapeFuncs>> = Mutex::new(None);
static PEER_PLAYING: AtomicI64 = AtomicI64::new(0);

fn bump(kind: usize) {
    COUNTERS[kind].fetch_add(1, Ordering::Relaxed);
}

fn config(key: usize) -> i64 {
    CONFIG[key].load(Ordering::Relaxed)
}

#[unsafe(no_mangle)]
pub extern "C" fn mock_counter(kind: u32) -> i64 {
    COUNTERS
        .get(kind as usize)
        .map(|slot| slot.load(Ordering::Relaxed))
        .unwrap_or(-1)
}

#[unsafe(no_mangle)]
pub extern "C" fn mock_configure(key: u32, value: i64) {
    if let Some(slot) = CONFIG.get(key as usize) {
        slot.store(value, Ordering::Relaxed);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn mock_reset() {
    for slot in &COUNTERS {
        slot.store(0, Ordering::Relaxed);
    }
    for slot in &CONFIG {
        slot.store(0, Ordering::Relaxed);
    }
    CONFIG[K_WRITE_READY].store(DEFAULT_WRITE_READY, Ordering::Relaxed);
    PEER_PLAYING.store(0, Ordering::Relaxed);
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_Initialize(
    exports: *mut NPNetscapeFuncs,
    funcs: *mut NPPluginFuncs,
) -> NPError {
    if exports.is_null() || funcs.is_null() {
        return NPERR_INVALID_PARAM;
    }
    if config(K_WRITE_READY) == 0 {
        CONFIG[K_WRITE_READY].store(DEFAULT_WRITE_READY, Ordering::Relaxed);
    }
    unsafe {
        *HOST.lock().unwrap() = Some(*exports);
        (*funcs).size = size_of::<NPPluginFuncs>() as u16;
        (*funcs).version = (*exports).version;
        (*funcs).newp = Some(npp_new);
        (*funcs).destroy = Some(npp_destroy);
        (*funcs).setwindow = Some(npp_setwindow);
        (*funcs).newstream = Some(npp_newstream);
        (*funcs).destroystream = Some(npp_destroystream);
        (*funcs).writeready = Some(npp_writeready);
        (*funcs).write = Some(npp_write);
        (*funcs).urlnotify = Some(npp_urlnotify);
        (*funcs).getvalue = Some(npp_getvalue);
    }
    NPERR_NO_ERROR
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_Shutdown() -> NPError {
    NPERR_NO_ERROR
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_GetMIMEDescription() -> *const c_char {
    c"application/x-shockwave-flash:swf:Mock scriptable player".as_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_GetValue(
    _future: *mut c_void,
    variable: NPPVariable,
    value: *mut c_void,
) -> NPError {
    if value.is_null() {
        return NPERR_INVALID_PARAM;
    }
    let text: &CStr = match variable {
        npstage_npapi::NPPV_PLUGIN_NAME_STRING => c"Mock Scriptable Media",
        npstage_npapi::NPPV_PLUGIN_DESCRIPTION_STRING => c"Mock Scriptable Media Plugin 1.0",
        _ => return NPERR_INVALID_PARAM,
    };
    unsafe {
        *(value as *mut *const c_char) = text.as_ptr();
    }
    NPERR_NO_ERROR
}

#[unsafe(no_mangle)]
pub extern "C" fn ScriptablePeer_Play(_peer: *mut c_void) {
    bump(C_PEER_PLAY);
    PEER_PLAYING.store(1, Ordering::Relaxed);
}

#[unsafe(no_mangle)]
pub extern "C" fn ScriptablePeer_StopPlay(_peer: *mut c_void) {
    bump(C_PEER_STOP_PLAY);
    PEER_PLAYING.store(0, Ordering::Relaxed);
}

#[unsafe(no_mangle)]
pub extern "C" fn ScriptablePeer_IsPlaying(_peer: *mut c_void, out: *mut c_int) {
    bump(C_PEER_IS_PLAYING);
    if config(K_PEER_SILENT) != 0 || out.is_null() {
        return;
    }
    unsafe {
        *out = PEER_PLAYING.load(Ordering::Relaxed) as c_int;
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ScriptablePeer_release(_peer: *mut c_void) {
    bump(C_PEER_RELEASES);
}

extern "C" fn npp_new(
    _plugin_type: *const c_char,
    _instance: *mut NPP,
    _mode: u16,
    _argc: i16,
    _argn: *mut *mut c_char,
    _argv: *mut *mut c_char,
    _saved: *mut NPSavedData,
) -> NPError {
    bump(C_NEW);
    PEER_PLAYING.store(1, Ordering::Relaxed);
    NPERR_NO_ERROR
}

extern "C" fn npp_destroy(_instance: *mut NPP, _save: *mut *mut NPSavedData) -> NPError {
    bump(C_DESTROY);
    PEER_PLAYING.store(0, Ordering::Relaxed);
    NPERR_NO_ERROR
}

extern "C" fn npp_setwindow(_instance: *mut NPP, _window: *mut NPWindow) -> NPError {
    NPERR_NO_ERROR
}

extern "C" fn npp_newstream(
    instance: *mut NPP,
    _mime_type: *const c_char,
    stream: *mut NPStream,
    _seekable: NPBool,
    stype: *mut u16,
) -> NPError {
    bump(C_NEWSTREAM);
    if stream.is_null() || stype.is_null() {
        return NPERR_INVALID_PARAM;
    }
    if unsafe { *stype } == NP_ASFILE
        && config(K_SKIP_NOTIFY) == 0
        && let Some(host) = *HOST.lock().unwrap()
        && let Some(geturlnotify) = host.geturlnotify
    {
        geturlnotify(
            instance,
            c"javascript:playerReady()".as_ptr(),
            std::ptr::null(),
            NOTIFY_TOKEN as *mut c_void,
        );
    }
    NPERR_NO_ERROR
}

extern "C" fn npp_destroystream(
    _instance: *mut NPP,
    _stream: *mut NPStream,
    _reason: NPReason,
) -> NPError {
    bump(C_DESTROYSTREAM);
    NPERR_NO_ERROR
}

extern "C" fn npp_writeready(_instance: *mut NPP, _stream: *mut NPStream) -> i32 {
    config(K_WRITE_READY) as i32
}

extern "C" fn npp_write(
    _instance: *mut NPP,
    _stream: *mut NPStream,
    _offset: i32,
    len: i32,
    buffer: *mut c_void,
) -> i32 {
    bump(C_WRITE);
    if len > 0 && buffer.is_null() {
        return -1;
    }
    len
}

extern "C" fn npp_urlnotify(
    _instance: *mut NPP,
    _url: *const c_char,
    _reason: NPReason,
    _notify_data: *mut c_void,
) {
    bump(C_URLNOTIFY);
}

extern "C" fn npp_getvalue(
    _instance: *mut NPP,
    variable: NPPVariable,
    value: *mut c_void,
) -> NPError {
    if variable != NPPV_PLUGIN_SCRIPTABLE_INSTANCE || value.is_null() {
        return NPERR_GENERIC_ERROR;
    }
    bump(C_PEER_ACQUIRES);
    unsafe {
        *(value as *mut *mut c_void) = (&PEER_PLAYING as *const AtomicI64) as *mut c_void;
    }
    NPERR_NO_ERROR
}
