use core::ffi::{c_char, c_int, c_void};

use crate::{
    NPBool, NPError, NPNVariable, NPNetscapeFuncs, NPP, NPPVariable, NPReason, NPSavedData,
    NPStream,
};
use crate::window::NPWindow;

// Statically exported entry points, resolved by name from the loaded module.
pub type NpInitializeFn =
    unsafe extern "C" fn(exports: *mut NPNetscapeFuncs, vtable: *mut NPPluginFuncs) -> NPError;
pub type NpShutdownFn = unsafe extern "C" fn() -> NPError;
pub type NpGetMimeDescriptionFn = unsafe extern "C" fn() -> *const c_char;
pub type NpGetValueFn =
    unsafe extern "C" fn(future: *mut c_void, variable: NPPVariable, value: *mut c_void) -> NPError;

// Optional scriptable-peer exports operating on a transient peer handle.
pub type PeerControlFn = unsafe extern "C" fn(peer: *mut c_void);
pub type PeerQueryFn = unsafe extern "C" fn(peer: *mut c_void, out: *mut c_int);

pub type NppNewFn = extern "C" fn(
    plugin_type: *const c_char,
    instance: *mut NPP,
    mode: u16,
    argc: i16,
    argn: *mut *mut c_char,
    argv: *mut *mut c_char,
    saved: *mut NPSavedData,
) -> NPError;
pub type NppDestroyFn =
    extern "C" fn(instance: *mut NPP, save: *mut *mut NPSavedData) -> NPError;
pub type NppSetWindowFn = extern "C" fn(instance: *mut NPP, window: *mut NPWindow) -> NPError;
pub type NppNewStreamFn = extern "C" fn(
    instance: *mut NPP,
    mime_type: *const c_char,
    stream: *mut NPStream,
    seekable: NPBool,
    stype: *mut u16,
) -> NPError;
pub type NppDestroyStreamFn =
    extern "C" fn(instance: *mut NPP, stream: *mut NPStream, reason: NPReason) -> NPError;
pub type NppStreamAsFileFn =
    extern "C" fn(instance: *mut NPP, stream: *mut NPStream, fname: *const c_char);
pub type NppWriteReadyFn = extern "C" fn(instance: *mut NPP, stream: *mut NPStream) -> i32;
pub type NppWriteFn = extern "C" fn(
    instance: *mut NPP,
    stream: *mut NPStream,
    offset: i32,
    len: i32,
    buffer: *mut c_void,
) -> i32;
pub type NppPrintFn = extern "C" fn(instance: *mut NPP, platform_print: *mut c_void);
pub type NppHandleEventFn = extern "C" fn(instance: *mut NPP, event: *mut c_void) -> i16;
pub type NppUrlNotifyFn = extern "C" fn(
    instance: *mut NPP,
    url: *const c_char,
    reason: NPReason,
    notify_data: *mut c_void,
);
pub type NppGetValueFn =
    extern "C" fn(instance: *mut NPP, variable: NPPVariable, value: *mut c_void) -> NPError;
pub type NppSetValueFn =
    extern "C" fn(instance: *mut NPP, variable: NPNVariable, value: *mut c_void) -> NPError;

/// The plugin's dynamic function table, filled in by the plugin during
/// `NP_Initialize`. Valid only between a successful initialize and shutdown.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPPluginFuncs {
    pub size: u16,
    pub version: u16,
    pub newp: Option<NppNewFn>,
    pub destroy: Option<NppDestroyFn>,
    pub setwindow: Option<NppSetWindowFn>,
    pub newstream: Option<NppNewStreamFn>,
    pub destroystream: Option<NppDestroyStreamFn>,
    pub asfile: Option<NppStreamAsFileFn>,
    pub writeready: Option<NppWriteReadyFn>,
    pub write: Option<NppWriteFn>,
    pub print: Option<NppPrintFn>,
    pub event: Option<NppHandleEventFn>,
    pub urlnotify: Option<NppUrlNotifyFn>,
    pub java_class: *mut c_void,
    pub getvalue: Option<NppGetValueFn>,
    pub setvalue: Option<NppSetValueFn>,
}

impl NPPluginFuncs {
    pub const fn zeroed() -> Self {
        Self {
            size: 0,
            version: 0,
            newp: None,
            destroy: None,
            setwindow: None,
            newstream: None,
            destroystream: None,
            asfile: None,
            writeready: None,
            write: None,
            print: None,
            event: None,
            urlnotify: None,
            java_class: core::ptr::null_mut(),
            getvalue: None,
            setvalue: None,
        }
    }
}
