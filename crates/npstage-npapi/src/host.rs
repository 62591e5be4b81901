use core::ffi::{c_char, c_void};

use crate::{NPBool, NPByteRange, NPError, NPNVariable, NPP, NPPVariable, NPReason, NPStream};
use crate::window::NPRect;

pub type NpnGetUrlFn =
    extern "C" fn(instance: *mut NPP, url: *const c_char, window: *const c_char) -> NPError;
pub type NpnPostUrlFn = extern "C" fn(
    instance: *mut NPP,
    url: *const c_char,
    window: *const c_char,
    len: u32,
    buf: *const c_char,
    file: NPBool,
) -> NPError;
pub type NpnRequestReadFn =
    extern "C" fn(stream: *mut NPStream, range: *mut NPByteRange) -> NPError;
pub type NpnNewStreamFn = extern "C" fn(
    instance: *mut NPP,
    mime_type: *const c_char,
    window: *const c_char,
    stream: *mut *mut NPStream,
) -> NPError;
pub type NpnWriteFn =
    extern "C" fn(instance: *mut NPP, stream: *mut NPStream, len: i32, buffer: *mut c_void) -> i32;
pub type NpnDestroyStreamFn =
    extern "C" fn(instance: *mut NPP, stream: *mut NPStream, reason: NPReason) -> NPError;
pub type NpnStatusFn = extern "C" fn(instance: *mut NPP, message: *const c_char);
pub type NpnUserAgentFn = extern "C" fn(instance: *mut NPP) -> *const c_char;
pub type NpnMemAllocFn = extern "C" fn(size: u32) -> *mut c_void;
pub type NpnMemFreeFn = extern "C" fn(ptr: *mut c_void);
pub type NpnMemFlushFn = extern "C" fn(size: u32) -> u32;
pub type NpnReloadPluginsFn = extern "C" fn(reload_pages: NPBool);
pub type NpnGetJavaEnvFn = extern "C" fn() -> *mut c_void;
pub type NpnGetJavaPeerFn = extern "C" fn(instance: *mut NPP) -> *mut c_void;
pub type NpnGetUrlNotifyFn = extern "C" fn(
    instance: *mut NPP,
    url: *const c_char,
    window: *const c_char,
    notify_data: *mut c_void,
) -> NPError;
pub type NpnPostUrlNotifyFn = extern "C" fn(
    instance: *mut NPP,
    url: *const c_char,
    window: *const c_char,
    len: u32,
    buf: *const c_char,
    file: NPBool,
    notify_data: *mut c_void,
) -> NPError;
pub type NpnGetValueFn =
    extern "C" fn(instance: *mut NPP, variable: NPNVariable, value: *mut c_void) -> NPError;
pub type NpnSetValueFn =
    extern "C" fn(instance: *mut NPP, variable: NPPVariable, value: *mut c_void) -> NPError;
pub type NpnInvalidateRectFn = extern "C" fn(instance: *mut NPP, rect: *mut NPRect);
pub type NpnInvalidateRegionFn = extern "C" fn(instance: *mut NPP, region: *mut c_void);
pub type NpnForceRedrawFn = extern "C" fn(instance: *mut NPP);

/// The host export table: every browser-side entry point, handed to the
/// plugin exactly once through `NP_Initialize`. Field order is ABI.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPNetscapeFuncs {
    pub size: u16,
    pub version: u16,
    pub geturl: Option<NpnGetUrlFn>,
    pub posturl: Option<NpnPostUrlFn>,
    pub requestread: Option<NpnRequestReadFn>,
    pub newstream: Option<NpnNewStreamFn>,
    pub write: Option<NpnWriteFn>,
    pub destroystream: Option<NpnDestroyStreamFn>,
    pub status: Option<NpnStatusFn>,
    pub uagent: Option<NpnUserAgentFn>,
    pub memalloc: Option<NpnMemAllocFn>,
    pub memfree: Option<NpnMemFreeFn>,
    pub memflush: Option<NpnMemFlushFn>,
    pub reloadplugins: Option<NpnReloadPluginsFn>,
    pub getjavaenv: Option<NpnGetJavaEnvFn>,
    pub getjavapeer: Option<NpnGetJavaPeerFn>,
    pub geturlnotify: Option<NpnGetUrlNotifyFn>,
    pub posturlnotify: Option<NpnPostUrlNotifyFn>,
    pub getvalue: Option<NpnGetValueFn>,
    pub setvalue: Option<NpnSetValueFn>,
    pub invalidaterect: Option<NpnInvalidateRectFn>,
    pub invalidateregion: Option<NpnInvalidateRegionFn>,
    pub forceredraw: Option<NpnForceRedrawFn>,
}

impl NPNetscapeFuncs {
    pub const fn zeroed() -> Self {
        Self {
            size: 0,
            version: 0,
            geturl: None,
            posturl: None,
            requestread: None,
            newstream: None,
            write: None,
            destroystream: None,
            status: None,
            uagent: None,
            memalloc: None,
            memfree: None,
            memflush: None,
            reloadplugins: None,
            getjavaenv: None,
            getjavapeer: None,
            geturlnotify: None,
            posturlnotify: None,
            getvalue: None,
            setvalue: None,
            invalidaterect: None,
            invalidateregion: None,
            forceredraw: None,
        }
    }
}
