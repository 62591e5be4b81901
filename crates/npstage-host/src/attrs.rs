//! Embed-attribute lists for `NPP_New`.
//!
//! A typed, ordered sequence of (name, value) pairs; the C-side `argn`/`argv`
//! arrays are materialized only at call time, pointing into storage owned
//! here.

use std::ffi::{CString, c_char};

use crate::error::{Error, Result};

#[derive(Debug)]
pub(crate) struct AttrList {
    names: Vec<CString>,
    values: Vec<CString>,
}

impl AttrList {
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        let mut names = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            names.push(cstring_attr(name)?);
            values.push(cstring_attr(value)?);
        }
        Ok(Self { names, values })
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    /// Pointer arrays for the call. Valid only while `self` is alive and the
    /// returned vectors are not dropped.
    pub(crate) fn raw_pairs(&self) -> (Vec<*mut c_char>, Vec<*mut c_char>) {
        let argn = self
            .names
            .iter()
            .map(|name| name.as_ptr() as *mut c_char)
            .collect();
        let argv = self
            .values
            .iter()
            .map(|value| value.as_ptr() as *mut c_char)
            .collect();
        (argn, argv)
    }
}

fn cstring_attr(text: &str) -> Result<CString> {
    CString::new(text)
        .map_err(|_| Error::playback_failed(format!("attribute `{text}` contains NUL")))
}
