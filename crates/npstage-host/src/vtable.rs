//! Safe-call facade over the plugin's dynamic function table.
//!
//! The table is resolved once during the initialize handshake and never
//! re-read. Each method checks the table entry exists and maps a non-success
//! return code to a typed error naming the entry point.

use std::ffi::{CStr, c_void};

use npstage_npapi::{
    NPBool, NPError, NPPVariable, NPPluginFuncs, NPP, NPReason, NPStream, NPWindow,
};

use crate::attrs::AttrList;
use crate::error::{Error, Result, np_call};

pub(crate) struct PluginVTable {
    funcs: NPPluginFuncs,
}

impl PluginVTable {
    pub(crate) fn new(funcs: NPPluginFuncs) -> Self {
        Self { funcs }
    }

    fn entry<T: Copy>(&self, what: &'static str, entry: Option<T>) -> Result<T> {
        entry.ok_or_else(|| Error::playback_failed(format!("{what} entry point missing")))
    }

    pub(crate) fn new_instance(
        &self,
        mime_type: &CStr,
        instance: *mut NPP,
        mode: u16,
        attrs: &AttrList,
    ) -> Result<()> {
        let newp = self.entry("NPP_New", self.funcs.newp)?;
        let (mut argn, mut argv) = attrs.raw_pairs();
        let code = newp(
            mime_type.as_ptr(),
            instance,
            mode,
            attrs.len() as i16,
            argn.as_mut_ptr(),
            argv.as_mut_ptr(),
            std::ptr::null_mut(),
        );
        np_call("NPP_New", code)
    }

    pub(crate) fn destroy_instance(&self, instance: *mut NPP) -> Result<()> {
        let destroy = self.entry("NPP_Destroy", self.funcs.destroy)?;
        np_call("NPP_Destroy", destroy(instance, std::ptr::null_mut()))
    }

    pub(crate) fn set_window(&self, instance: *mut NPP, window: *mut NPWindow) -> Result<()> {
        let setwindow = self.entry("NPP_SetWindow", self.funcs.setwindow)?;
        np_call("NPP_SetWindow", setwindow(instance, window))
    }

    pub(crate) fn new_stream(
        &self,
        instance: *mut NPP,
        mime_type: &CStr,
        stream: *mut NPStream,
        seekable: NPBool,
        stype: &mut u16,
    ) -> Result<()> {
        let newstream = self.entry("NPP_NewStream", self.funcs.newstream)?;
        np_call(
            "NPP_NewStream",
            newstream(instance, mime_type.as_ptr(), stream, seekable, stype),
        )
    }

    pub(crate) fn destroy_stream(
        &self,
        instance: *mut NPP,
        stream: *mut NPStream,
        reason: NPReason,
    ) -> Result<()> {
        let destroystream = self.entry("NPP_DestroyStream", self.funcs.destroystream)?;
        np_call("NPP_DestroyStream", destroystream(instance, stream, reason))
    }

    /// How many bytes the plugin will accept right now.
    pub(crate) fn write_ready(&self, instance: *mut NPP, stream: *mut NPStream) -> Result<i32> {
        let writeready = self.entry("NPP_WriteReady", self.funcs.writeready)?;
        Ok(writeready(instance, stream))
    }

    /// Hands one chunk to the plugin; returns the count it actually consumed.
    pub(crate) fn write(
        &self,
        instance: *mut NPP,
        stream: *mut NPStream,
        offset: i32,
        len: i32,
        buffer: *mut c_void,
    ) -> Result<i32> {
        let write = self.entry("NPP_Write", self.funcs.write)?;
        Ok(write(instance, stream, offset, len, buffer))
    }

    pub(crate) fn url_notify(
        &self,
        instance: *mut NPP,
        url: &CStr,
        reason: NPReason,
        notify_data: *mut c_void,
    ) -> Result<()> {
        let urlnotify = self.entry("NPP_URLNotify", self.funcs.urlnotify)?;
        urlnotify(instance, url.as_ptr(), reason, notify_data);
        Ok(())
    }

    /// Raw property query; used for the transient scriptable-peer handle.
    pub(crate) fn get_value(
        &self,
        instance: *mut NPP,
        variable: NPPVariable,
        value: *mut c_void,
    ) -> NPError {
        match self.funcs.getvalue {
            Some(getvalue) => getvalue(instance, variable, value),
            None => npstage_npapi::NPERR_INVALID_FUNCTABLE_ERROR,
        }
    }
}
