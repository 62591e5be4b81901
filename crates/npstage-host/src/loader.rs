//! Dynamic module loading and symbol resolution.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::error::{Error, Result};

pub(crate) struct LoadedModule {
    lib: Library,
    path: PathBuf,
}

impl LoadedModule {
    /// Opens the shared object. A failed load is terminal for this session
    /// attempt; the dynamic-loader error string is surfaced verbatim.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        // SAFETY: loading a foreign shared object runs its constructors;
        // inherently unsafe, trusted by the caller's path validation.
        let lib = unsafe { Library::new(path) }.map_err(|error| {
            Error::init_failed(format!(
                "failed to load plugin module from {}: {error}",
                path.display()
            ))
        })?;
        Ok(Self {
            lib,
            path: path.to_path_buf(),
        })
    }

    /// Resolves a symbol the module must export. `T` must be a function or
    /// raw pointer type matching the export.
    pub(crate) fn mandatory<T: Copy>(&self, name: &str) -> Result<T> {
        let cname = CString::new(name)
            .map_err(|_| Error::init_failed(format!("symbol name `{name}` contains NUL")))?;
        // SAFETY: the symbol type is dictated by the ABI contract; a wrong
        // signature is undefined behavior at call time, not at resolution.
        match unsafe { self.lib.get::<T>(cname.as_bytes_with_nul()) } {
            Ok(symbol) => Ok(*symbol),
            Err(error) => Err(Error::init_failed(format!(
                "missing mandatory symbol `{name}` in {}: {error}",
                self.path.display()
            ))),
        }
    }

    /// Resolves a symbol that may legitimately be absent.
    pub(crate) fn optional<T: Copy>(&self, name: &str) -> Option<T> {
        let cname = CString::new(name).ok()?;
        // SAFETY: as for mandatory symbols.
        unsafe { self.lib.get::<T>(cname.as_bytes_with_nul()) }
            .ok()
            .map(|symbol| *symbol)
    }
}
