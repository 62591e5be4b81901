//! Chunked delivery of an in-memory buffer to the plugin.
//!
//! One call = one stream: create, feed the write loop at whatever pace the
//! plugin accepts, optionally complete the notify round trip, destroy. The
//! stream descriptor never outlives the call.

use std::ffi::{CString, c_void};

use npstage_npapi::{NPP, NPRES_DONE, NPRES_NETWORK_ERR, NPStream};

use crate::error::{Error, Result};
use crate::registry::NotifyToken;
use crate::vtable::PluginVTable;

pub(crate) struct StreamRequest<'a> {
    pub url: &'a str,
    pub mime_type: &'a str,
    pub stream_type: u16,
    pub notify: Option<NotifyToken>,
}

/// Streams `payload` to the plugin. Tolerates partial writes: the cursor
/// advances by exactly what the plugin reports consuming, and a plugin that
/// accepts zero bytes indefinitely stalls the loop (a known limitation of
/// the emulated synchronous protocol). A negative write count is a plugin
/// abort.
pub(crate) fn deliver(
    vtable: &PluginVTable,
    instance: *mut NPP,
    request: StreamRequest<'_>,
    payload: &[u8],
) -> Result<()> {
    let url = CString::new(request.url)
        .map_err(|_| Error::playback_failed("stream url contains NUL"))?;
    let mime_type = CString::new(request.mime_type)
        .map_err(|_| Error::playback_failed("stream mime type contains NUL"))?;

    let mut stream = Box::new(NPStream {
        pdata: std::ptr::null_mut(),
        // SAFETY: `instance` is the live NPP driving this stream.
        ndata: unsafe { (*instance).ndata },
        url: url.as_ptr(),
        end: 0,
        lastmodified: 0,
        notify_data: request.notify.map(|token| token.0).unwrap_or(std::ptr::null_mut()),
    });
    let stream_ptr: *mut NPStream = stream.as_mut();

    // All streams are delivered non-seekable; the plugin may still downgrade
    // the requested stream type through the out-parameter.
    let mut granted_type = request.stream_type;
    vtable.new_stream(instance, &mime_type, stream_ptr, 0, &mut granted_type)?;
    tracing::debug!(
        target: "npstage::stream",
        url = request.url,
        requested_type = request.stream_type,
        granted_type,
        len = payload.len(),
        "stream opened"
    );

    match pump(vtable, instance, stream_ptr, request.url, payload) {
        Ok(()) => {
            if let Some(token) = request.notify
                && let Err(err) = vtable.url_notify(instance, &url, NPRES_DONE, token.0)
            {
                let _ = vtable.destroy_stream(instance, stream_ptr, NPRES_NETWORK_ERR);
                return Err(err);
            }
            vtable.destroy_stream(instance, stream_ptr, NPRES_DONE)
        }
        Err(err) => {
            let _ = vtable.destroy_stream(instance, stream_ptr, NPRES_NETWORK_ERR);
            Err(err)
        }
    }
}

fn pump(
    vtable: &PluginVTable,
    instance: *mut NPP,
    stream: *mut NPStream,
    url: &str,
    payload: &[u8],
) -> Result<()> {
    let mut offset = 0usize;
    let mut remaining = payload.len();

    while remaining > 0 {
        let ready = vtable.write_ready(instance, stream)?;
        if ready < 0 {
            return Err(Error::playback_failed(format!(
                "plugin aborted stream `{url}` (writeready={ready})"
            )));
        }
        let chunk = (ready as usize).min(remaining);
        let written = vtable.write(
            instance,
            stream,
            offset as i32,
            chunk as i32,
            payload[offset..].as_ptr() as *mut c_void,
        )?;
        if written < 0 {
            return Err(Error::playback_failed(format!(
                "plugin aborted stream `{url}` (write={written})"
            )));
        }
        let mut consumed = written as usize;
        if consumed > chunk {
            tracing::warn!(
                target: "npstage::stream",
                url,
                offered = chunk,
                reported = consumed,
                "plugin reported consuming more than offered"
            );
            consumed = chunk;
        }
        tracing::debug!(target: "npstage::stream", url, offset, consumed, "chunk streamed");
        offset += consumed;
        remaining -= consumed;
    }
    Ok(())
}
