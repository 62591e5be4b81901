use core::ffi::{c_ulong, c_void};

pub const NP_WINDOW_TYPE_WINDOW: i32 = 1;
pub const NP_WINDOW_TYPE_DRAWABLE: i32 = 2;

/// Tag for `NPSetWindowCallbackStruct::kind` (the C headers call the field
/// `type`).
pub const NP_SETWINDOW: i32 = 1;
pub const NP_PRINT: i32 = 2;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPRect {
    pub top: u16,
    pub left: u16,
    pub bottom: u16,
    pub right: u16,
}

impl NPRect {
    pub const fn zeroed() -> Self {
        Self {
            top: 0,
            left: 0,
            bottom: 0,
            right: 0,
        }
    }
}

/// Drawable descriptor passed to `NPP_SetWindow`. `window` carries the native
/// window id verbatim; `ws_info` points at an [`NPSetWindowCallbackStruct`]
/// that must stay alive for the duration of the call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPWindow {
    pub window: *mut c_void,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub clip_rect: NPRect,
    pub ws_info: *mut c_void,
    pub window_type: i32,
}

impl NPWindow {
    pub const fn zeroed() -> Self {
        Self {
            window: core::ptr::null_mut(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            clip_rect: NPRect::zeroed(),
            ws_info: core::ptr::null_mut(),
            window_type: 0,
        }
    }
}

/// X11 display descriptor the host forwards alongside the window: display
/// connection, visual, colormap and bit depth, all verbatim from the
/// embedding collaborator.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NPSetWindowCallbackStruct {
    pub kind: i32,
    pub display: *mut c_void,
    pub visual: *mut c_void,
    pub colormap: c_ulong,
    pub depth: i32,
}

impl NPSetWindowCallbackStruct {
    pub const fn zeroed() -> Self {
        Self {
            kind: 0,
            display: core::ptr::null_mut(),
            visual: core::ptr::null_mut(),
            colormap: 0,
            depth: 0,
        }
    }
}
