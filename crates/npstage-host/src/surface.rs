//! Window-embedding collaborator interface.
//!
//! The host never creates drawables itself; it asks a [`WindowHost`] for an
//! embedded surface and forwards the native handles verbatim to the plugin
//! inside the window-descriptor structures. Dropping the surface destroys
//! the drawable.

use std::ffi::{c_ulong, c_void};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct SurfaceGeometry {
    pub width: u32,
    pub height: u32,
    pub depth: i32,
}

/// Native handles for one embedded drawable, passed through to the plugin
/// untouched.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDescriptor {
    pub window: *mut c_void,
    pub display: *mut c_void,
    pub visual: *mut c_void,
    pub colormap: c_ulong,
    pub depth: i32,
}

pub trait WindowHost {
    /// Geometry of the drawing surface the plugin will be sized to.
    fn geometry(&self) -> SurfaceGeometry;

    /// Creates a native drawable embedded in the host window.
    fn create_embedded(&self, width: u32, height: u32) -> Result<Box<dyn EmbeddedSurface>>;
}

pub trait EmbeddedSurface {
    fn descriptor(&self) -> SurfaceDescriptor;
}

/// Surface provider with no display connection: fabricates distinct non-null
/// window ids. Suitable for harnesses and tests driving plugins that never
/// touch the X handles; a real embedder supplies live X11 handles instead.
pub struct HeadlessWindowHost {
    width: u32,
    height: u32,
}

impl HeadlessWindowHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl WindowHost for HeadlessWindowHost {
    fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            width: self.width,
            height: self.height,
            depth: 24,
        }
    }

    fn create_embedded(&self, width: u32, height: u32) -> Result<Box<dyn EmbeddedSurface>> {
        static NEXT_FAKE_WINDOW: AtomicUsize = AtomicUsize::new(0x1000);
        let window = NEXT_FAKE_WINDOW.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            target: "npstage::surface",
            window,
            width,
            height,
            "created headless surface"
        );
        Ok(Box::new(HeadlessSurface { window }))
    }
}

struct HeadlessSurface {
    window: usize,
}

impl EmbeddedSurface for HeadlessSurface {
    fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor {
            window: self.window as *mut c_void,
            display: std::ptr::null_mut(),
            visual: std::ptr::null_mut(),
            colormap: 0,
            depth: 24,
        }
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        tracing::debug!(target: "npstage::surface", window = self.window, "destroyed headless surface");
    }
}
