//! Native plugin loader

use libloading::Library;
use std::ffi::CStr;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::descriptor::{ExportedFn, SymbolDescriptor, DESCRIPTOR_ABI_VERSION, DESCRIPTOR_MAGIC};

/// Plugin loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open plugin {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol `{symbol}` not found in plugin {}: {source}", .path.display())]
    SymbolNotFound {
        path: PathBuf,
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol `{symbol}` in plugin {} has signature `{found}`, expected `{expected}`", .path.display())]
    SignatureMismatch {
        path: PathBuf,
        symbol: String,
        expected: &'static str,
        found: String,
    },
}

/// A verified function resolved from a plugin
///
/// The library it came from is never unloaded, so the function stays valid
/// for the rest of the process and the handle can be cloned and shared
/// between threads freely.
#[derive(Clone)]
pub struct LoadedSymbol<F: ExportedFn> {
    path: PathBuf,
    symbol: String,
    function: F,
}

impl<F: ExportedFn> LoadedSymbol<F> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The resolved function
    pub fn function(&self) -> F {
        self.function
    }
}

impl<F: ExportedFn> fmt::Debug for LoadedSymbol<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSymbol")
            .field("path", &self.path)
            .field("symbol", &self.symbol)
            .field("signature", &F::signature())
            .finish()
    }
}

/// Open the plugin at `path` and resolve `symbol` as an `F`.
///
/// Runs the library's initialisers, so only load trusted plugins. Errors are
/// never retried here.
pub fn resolve<F: ExportedFn>(path: impl AsRef<Path>, symbol: &str) -> Result<LoadedSymbol<F>, LoadError> {
    let path = path.as_ref();

    let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let descriptor = unsafe { library.get::<*const SymbolDescriptor>(symbol.as_bytes()) }
        .map(|sym| *sym)
        .map_err(|source| LoadError::SymbolNotFound {
            path: path.to_path_buf(),
            symbol: symbol.to_string(),
            source,
        })?;

    let function = unsafe { verify::<F>(descriptor, path, symbol) }?;

    // Code from the library is now reachable through `function`.
    std::mem::forget(library);

    info!(path = %path.display(), symbol, signature = F::signature(), "Loaded plugin symbol");

    Ok(LoadedSymbol {
        path: path.to_path_buf(),
        symbol: symbol.to_string(),
        function,
    })
}

/// Check a descriptor against `F` and extract the function.
///
/// # Safety
///
/// `descriptor` must be null or point to at least four readable bytes; the
/// rest of the descriptor is only read once the magic and ABI version match.
pub(crate) unsafe fn verify<F: ExportedFn>(
    descriptor: *const SymbolDescriptor,
    path: &Path,
    symbol: &str,
) -> Result<F, LoadError> {
    let mismatch = |found: String| LoadError::SignatureMismatch {
        path: path.to_path_buf(),
        symbol: symbol.to_string(),
        expected: F::signature(),
        found,
    };

    if descriptor.is_null() {
        return Err(mismatch("null symbol".to_string()));
    }

    let magic = std::ptr::read_unaligned(descriptor as *const u32);
    if magic != DESCRIPTOR_MAGIC {
        return Err(mismatch("not an exported descriptor".to_string()));
    }

    // Older descriptors are shorter; read only the version until it matches.
    let abi_version = std::ptr::read_unaligned(std::ptr::addr_of!((*descriptor).abi_version));
    if abi_version != DESCRIPTOR_ABI_VERSION {
        return Err(mismatch(format!("descriptor ABI version {}", abi_version)));
    }

    let descriptor = &*descriptor;

    if descriptor.signature.is_null() {
        return Err(mismatch("missing signature".to_string()));
    }
    let found = CStr::from_ptr(descriptor.signature).to_string_lossy();
    if found != F::signature() {
        return Err(mismatch(found.into_owned()));
    }

    if descriptor.fingerprint != F::FINGERPRINT {
        return Err(mismatch(format!(
            "{} with ABI fingerprint {:#018x}, expected {:#018x} (built by a different compiler or against a different layout)",
            found,
            descriptor.fingerprint,
            F::FINGERPRINT
        )));
    }

    if descriptor.function.is_null() {
        return Err(mismatch(format!("{} (null function)", found)));
    }

    Ok(F::from_raw(descriptor.function))
}

#[cfg(test)]
pub(crate) fn loaded_for_test<F: ExportedFn>(function: F) -> LoadedSymbol<F> {
    LoadedSymbol {
        path: PathBuf::from("<test>"),
        symbol: "test".to_string(),
        function,
    }
}
