//! Out-of-browser NPAPI host.
//!
//! Loads a closed, binary media plugin, fabricates the browser-side callback
//! table it expects, performs the bidirectional function-table handshake and
//! drives the create-instance → attach-window → stream-content → destroy
//! lifecycle, hand-feeding content over the chunked stream protocol.
//!
//! The model is single-threaded and cooperative: every plugin entry-point
//! call and every inbound callback happens on one logical thread, and the
//! only asynchrony is a repeating completion poll scheduled on that same
//! thread. Windowing and timers are collaborator traits ([`WindowHost`],
//! [`TickScheduler`]); the core never talks to a display server itself.

mod attrs;
mod content;
mod error;
mod loader;
mod npn;
mod registry;
mod sched;
mod session;
mod stream;
mod surface;
mod validate;
mod vtable;

pub use content::{COMPLETION_POLL_INTERVAL, ContentInstance, EventCallback, PlaybackEvent};
pub use error::{Error, Result};
pub use sched::{ManualTicker, TickFn, TickScheduler};
pub use session::PluginSession;
pub use surface::{
    EmbeddedSurface, HeadlessWindowHost, SurfaceDescriptor, SurfaceGeometry, WindowHost,
};
