//! Exported symbol descriptors
//!
//! A shared library carries no type information for its symbols. Plugins
//! therefore export a [`SymbolDescriptor`] under the symbol name instead of the
//! bare function; the loader reads it and only hands out the function when the
//! descriptor's signature matches the one the caller expects.
//!
//! Exported functions use the Rust ABI over Rust-layout types, so a matching
//! type name is not enough. Each descriptor also carries a [`Fingerprint`] of
//! the compiler, target, panic strategy and the field layout of every type the
//! function touches; plugins built any other way are rejected.

use std::ffi::c_char;

/// First field of every descriptor ("EDGW")
pub const DESCRIPTOR_MAGIC: u32 = 0x4544_4757;

/// Layout version of [`SymbolDescriptor`]
pub const DESCRIPTOR_ABI_VERSION: u32 = 2;

/// Compiler, target and panic strategy this crate was built with
pub const TOOLCHAIN: &str = concat!(
    env!("EDGEWARD_RUSTC_VERSION"),
    " ",
    env!("EDGEWARD_TARGET"),
    " panic=",
    env!("EDGEWARD_PANIC")
);

/// Compile-time FNV-1a hash over the ABI facts of an exported function
///
/// ```ignore
/// const FINGERPRINT: u64 = Fingerprint::new()
///     .layout::<Record>()
///     .offset(std::mem::offset_of!(Record, id))
///     .finish();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Hash seeded with nothing
    pub const fn empty() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    /// Hash seeded with [`TOOLCHAIN`]
    pub const fn new() -> Self {
        Self::empty().str(TOOLCHAIN)
    }

    pub const fn bytes(self, bytes: &[u8]) -> Self {
        let mut hash = self.0;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::PRIME);
            i += 1;
        }
        Self(hash)
    }

    pub const fn str(self, s: &str) -> Self {
        self.bytes(s.as_bytes())
    }

    pub const fn usize(self, value: usize) -> Self {
        self.bytes(&(value as u64).to_le_bytes())
    }

    /// Size and alignment of `T`
    pub const fn layout<T>(self) -> Self {
        self.usize(std::mem::size_of::<T>())
            .usize(std::mem::align_of::<T>())
    }

    /// A field offset, as given by `offset_of!`
    pub const fn offset(self, offset: usize) -> Self {
        self.usize(offset)
    }

    pub const fn finish(self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

/// Function types a plugin may export
///
/// # Safety
///
/// `SIGNATURE` must identify `Self` uniquely and end with a NUL byte.
/// `FINGERPRINT` must change whenever the layout of any type reachable
/// through `Self`'s arguments changes. `from_raw` must only reinterpret a
/// pointer that was produced from a `Self`.
pub unsafe trait ExportedFn: Copy + Send + Sync + 'static {
    /// NUL-terminated signature string, compared byte for byte at load time
    const SIGNATURE: &'static str;

    /// ABI fingerprint, see [`Fingerprint`]
    const FINGERPRINT: u64;

    /// Reinterpret the exported pointer as `Self`
    ///
    /// # Safety
    ///
    /// `ptr` must come from a descriptor whose signature equals `SIGNATURE`.
    unsafe fn from_raw(ptr: *const ()) -> Self;

    /// `SIGNATURE` without the trailing NUL
    fn signature() -> &'static str {
        Self::SIGNATURE.trim_end_matches('\0')
    }
}

/// What a plugin exports under a symbol name
#[repr(C)]
#[derive(Debug)]
pub struct SymbolDescriptor {
    pub magic: u32,
    pub abi_version: u32,
    pub fingerprint: u64,
    pub signature: *const c_char,
    pub function: *const (),
}

// Only ever points at static data and code.
unsafe impl Sync for SymbolDescriptor {}

impl SymbolDescriptor {
    /// Describe `function`, which must be an `F` cast to a raw pointer
    pub const fn new<F: ExportedFn>(function: *const ()) -> Self {
        Self {
            magic: DESCRIPTOR_MAGIC,
            abi_version: DESCRIPTOR_ABI_VERSION,
            fingerprint: F::FINGERPRINT,
            signature: F::SIGNATURE.as_ptr() as *const c_char,
            function,
        }
    }
}

/// Export a function from a plugin under `$symbol`.
///
/// ```ignore
/// fn mask(record: &mut edgeward::analytics::AnalyticsRecord) {
///     record.api_key.clear();
/// }
///
/// edgeward::export_symbol!(MaskAnalyticsData, edgeward::plugins::AnalyticsHandlerFn, mask);
/// ```
///
/// The gateway may call the exported function from several threads at once,
/// so it must be reentrant.
#[macro_export]
macro_rules! export_symbol {
    ($symbol:ident, $ty:ty, $func:path) => {
        #[no_mangle]
        #[allow(non_upper_case_globals)]
        pub static $symbol: $crate::plugins::SymbolDescriptor =
            $crate::plugins::SymbolDescriptor::new::<$ty>($func as $ty as *const ());
    };
}
