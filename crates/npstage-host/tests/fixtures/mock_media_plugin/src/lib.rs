//! Well-behaved mock media plugin for host integration tests.
//!
//! Implements the full handshake and stream protocol, records every inbound
//! call in counters the test reads back through exported symbols, and can be
//! configured to misbehave in specific ways. Exports no scriptable-peer
//! symbols, so the host must fall back to its tracked playing flag.

use std::ffi::{CStr, c_char, c_void};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use npstage_npapi::{
    NP_ASFILE, NPBool, NPERR_GENERIC_ERROR, NPERR_INVALID_PARAM, NPERR_NO_ERROR, NPError,
    NPNetscapeFuncs, NPP, NPPVariable, NPPluginFuncs, NPReason, NPSavedData, NPStream, NPWindow,
};

// Counter kinds, mirrored in the test support module.
const C_INIT: usize = 0;
const C_SHUTDOWN: usize = 1;
const C_NEW: usize = 2;
const C_DESTROY: usize = 3;
const C_SETWINDOW: usize = 4;
const C_SETWINDOW_NULL: usize = 5;
const C_NEWSTREAM: usize = 6;
const C_CONTENT_STREAMS: usize = 7;
const C_NOTIFY_STREAMS: usize = 8;
const C_DESTROYSTREAM: usize = 9;
const C_WRITEREADY: usize = 10;
const C_WRITE: usize = 11;
const C_CONTENT_BYTES: usize = 12;
const C_NOTIFY_BYTES: usize = 13;
const C_URLNOTIFY: usize = 14;
const C_LAST_NOTIFY_TOKEN: usize = 15;
const C_OFFSET_ERRORS: usize = 16;
const C_LOOP_FLAG: usize = 17;
const C_CONTENT_WRITES: usize = 18;
const COUNTER_SLOTS: usize = 19;

// Config keys.
const K_WRITE_READY: usize = 0;
const K_CONSUME_LIMIT: usize = 1;
const K_FAIL_NEW: usize = 2;
const K_FAIL_SETWINDOW: usize = 3;
const K_SKIP_NOTIFY: usize = 4;
const CONFIG_SLOTS: usize = 5;

const DEFAULT_WRITE_READY: i64 = 256;
const NOTIFY_TOKEN: usize = 0xC0FFEE;

static COUNTERS: [AtomicI64; COUNTER_SLOTS] = [const { AtomicI64::new(0) }; COUNTER_SLOTS];
static CONFIG: [AtomicI64; CONFIG_SLOTS] = [const { AtomicI64::new(0) }; CONFIG_SLOTS];
static HOST: Mutex<Option<NPNetscapeFuncs>> = Mutex::new(None);
static EXPECTED_CONTENT_OFFSET: AtomicI64 = AtomicI64::new(0);
static EXPECTED_NOTIFY_OFFSET: AtomicI64 = AtomicI64::new(0);

fn bump(kind: usize) {
    COUNTERS[kind].fetch_add(1, Ordering::Relaxed);
}

fn add(kind: usize, amount: i64) {
    COUNTERS[kind].fetch_add(amount, Ordering::Relaxed);
}

fn put(kind: usize, value: i64) {
    COUNTERS[kind].store(value, Ordering::Relaxed);
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
    put(C_LOOP_FLAG, -1);
    EXPECTED_CONTENT_OFFSET.store(0, Ordering::Relaxed);
    EXPECTED_NOTIFY_OFFSET.store(0, Ordering::Relaxed);
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_Initialize(
    exports: *mut NPNetscapeFuncs,
    funcs: *mut NPPluginFuncs,
) -> NPError {
    bump(C_INIT);
    if let Ok(value) = std::env::var("MOCK_INIT_ERROR")
        && let Ok(code) = value.parse::<i16>()
        && code != 0
    {
        return code;
    }
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
    bump(C_SHUTDOWN);
    NPERR_NO_ERROR
}

#[unsafe(no_mangle)]
pub extern "C" fn NP_GetMIMEDescription() -> *const c_char {
    c"application/x-shockwave-flash:swf:Mock shockwave player".as_ptr()
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
        npstage_npapi::NPPV_PLUGIN_NAME_STRING => c"Mock Media",
        npstage_npapi::NPPV_PLUGIN_DESCRIPTION_STRING => c"Mock Media Plugin 1.0",
        _ => return NPERR_INVALID_PARAM,
    };
    unsafe {
        *(value as *mut *const c_char) = text.as_ptr();
    }
    NPERR_NO_ERROR
}

extern "C" fn npp_new(
    _plugin_type: *const c_char,
    _instance: *mut NPP,
    _mode: u16,
    argc: i16,
    argn: *mut *mut c_char,
    argv: *mut *mut c_char,
    _saved: *mut NPSavedData,
) -> NPError {
    bump(C_NEW);
    if config(K_FAIL_NEW) != 0 {
        return NPERR_GENERIC_ERROR;
    }
    for index in 0..argc.max(0) as usize {
        unsafe {
            let name = *argn.add(index);
            let value = *argv.add(index);
            if name.is_null() || value.is_null() {
                continue;
            }
            if CStr::from_ptr(name).to_str() == Ok("LOOP") {
                let flag = match CStr::from_ptr(value).to_str() {
                    Ok("true") => 1,
                    Ok("false") => 0,
                    _ => -1,
                };
                put(C_LOOP_FLAG, flag);
            }
        }
    }
    NPERR_NO_ERROR
}

extern "C" fn npp_destroy(_instance: *mut NPP, _save: *mut *mut NPSavedData) -> NPError {
    bump(C_DESTROY);
    NPERR_NO_ERROR
}

extern "C" fn npp_setwindow(_instance: *mut NPP, window: *mut NPWindow) -> NPError {
    if window.is_null() {
        bump(C_SETWINDOW_NULL);
        return NPERR_NO_ERROR;
    }
    bump(C_SETWINDOW);
    if config(K_FAIL_SETWINDOW) != 0 {
        return NPERR_GENERIC_ERROR;
    }
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
    let kind = unsafe { *stype };
    unsafe {
        // Tag the stream so write() can attribute bytes.
        (*stream).pdata = kind as usize as *mut c_void;
    }
    if kind == NP_ASFILE {
        bump(C_CONTENT_STREAMS);
        EXPECTED_CONTENT_OFFSET.store(0, Ordering::Relaxed);
        // Real players request a startup callback while the content stream
        // opens; mirror that unless configured silent.
        if config(K_SKIP_NOTIFY) == 0
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
    } else {
        bump(C_NOTIFY_STREAMS);
        EXPECTED_NOTIFY_OFFSET.store(0, Ordering::Relaxed);
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
    bump(C_WRITEREADY);
    config(K_WRITE_READY) as i32
}

extern "C" fn npp_write(
    _instance: *mut NPP,
    stream: *mut NPStream,
    offset: i32,
    len: i32,
    buffer: *mut c_void,
) -> i32 {
    bump(C_WRITE);
    if stream.is_null() || (len > 0 && buffer.is_null()) {
        return -1;
    }
    let kind = unsafe { (*stream).pdata } as usize as u16;
    let (expected, bytes_counter) = if kind == NP_ASFILE {
        bump(C_CONTENT_WRITES);
        (&EXPECTED_CONTENT_OFFSET, C_CONTENT_BYTES)
    } else {
        (&EXPECTED_NOTIFY_OFFSET, C_NOTIFY_BYTES)
    };
    if i64::from(offset) != expected.load(Ordering::Relaxed) {
        bump(C_OFFSET_ERRORS);
    }
    let limit = config(K_CONSUME_LIMIT);
    let consumed = if limit > 0 { len.min(limit as i32) } else { len };
    expected.store(i64::from(offset) + i64::from(consumed), Ordering::Relaxed);
    add(bytes_counter, i64::from(consumed));
    consumed
}

extern "C" fn npp_urlnotify(
    _instance: *mut NPP,
    _url: *const c_char,
    reason: NPReason,
    notify_data: *mut c_void,
) {
    bump(C_URLNOTIFY);
    if reason == npstage_npapi::NPRES_DONE {
        put(C_LAST_NOTIFY_TOKEN, notify_data as usize as i64);
    }
}

extern "C" fn npp_getvalue(
    _instance: *mut NPP,
    _variable: NPPVariable,
    _value: *mut c_void,
) -> NPError {
    // No scriptable peer in this fixture.
    NPERR_GENERIC_ERROR
}
