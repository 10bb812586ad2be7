//! SIMD-aligned heap buffers.
//!
//! [`allocate`] hands out zeroed blocks whose start address is a multiple of the
//! requested alignment. Blocks are owned values: releasing one happens exactly
//! once, either through [`deallocate`] or when the block is dropped.
//!
//! [`AlignedBuf`] is the typed `f32` buffer built on top of a block. The model
//! keeps its weights in one, and training/prediction stage their inputs in them.

use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use thiserror::Error;

/// Smallest alignment accepted by [`allocate`] (one 128-bit register).
pub const MIN_ALIGNMENT: usize = 16;

/// Number of `f32` lanes rows are padded to when staged for the kernels.
pub const PAD_LANES: usize = 8;

// =============================================================================
// Alignment
// =============================================================================

/// Alignment presets matching common vector register widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// 16 bytes (SSE, NEON, simd128).
    Simd128,
    /// 32 bytes (AVX/AVX2).
    #[default]
    Simd256,
    /// 64 bytes (AVX-512, also one cache line).
    Simd512,
}

impl Alignment {
    /// Alignment in bytes.
    #[inline]
    pub const fn as_usize(self) -> usize {
        match self {
            Self::Simd128 => 16,
            Self::Simd256 => 32,
            Self::Simd512 => 64,
        }
    }
}

// =============================================================================
// AllocError
// =============================================================================

/// Failure to obtain an aligned block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The system allocator returned null.
    #[error("out of memory: failed to allocate {size} bytes aligned to {align}")]
    OutOfMemory { size: usize, align: usize },

    /// Alignment is not a power of two, or is below [`MIN_ALIGNMENT`].
    #[error("invalid alignment {0}: must be a power of two and at least {min}", min = MIN_ALIGNMENT)]
    InvalidAlignment(usize),

    /// The rounded-up size does not fit in the address space.
    #[error("requested size overflows the address space")]
    SizeOverflow,
}

/// Round `value` up to the next multiple of `align` (a power of two).
#[inline]
pub const fn align_up(value: usize, align: usize) -> Option<usize> {
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

/// Check whether `ptr` is a multiple of `align`.
#[inline]
pub fn is_aligned<T>(ptr: *const T, align: usize) -> bool {
    (ptr as usize) % align == 0
}

/// Number of elements a row of `n` elements occupies once padded to [`PAD_LANES`].
#[inline]
pub const fn padded_len(n: usize) -> usize {
    n.div_ceil(PAD_LANES) * PAD_LANES
}

// =============================================================================
// RawBlock
// =============================================================================

/// An owned, zero-initialized, aligned block of raw memory.
///
/// The block is released when dropped. It cannot be cloned, so it is never
/// released twice.
pub struct RawBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: RawBlock uniquely owns its allocation; the global allocator is thread-safe.
unsafe impl Send for RawBlock {}
// SAFETY: shared access only hands out `*const` views of the block.
unsafe impl Sync for RawBlock {}

impl RawBlock {
    /// Start of the block.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Usable size in bytes (the request rounded up to the alignment).
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Alignment in bytes.
    #[inline]
    pub fn align(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by `alloc_zeroed` with exactly this layout
        // and ownership guarantees this runs once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("ptr", &self.ptr)
            .field("size", &self.size())
            .field("align", &self.align())
            .finish()
    }
}

/// Allocate at least `size` zeroed bytes aligned to `align`.
///
/// Zero-sized requests still return a distinct, releasable block.
///
/// # Errors
///
/// - [`AllocError::InvalidAlignment`] if `align` is not a power of two or is
///   below [`MIN_ALIGNMENT`]
/// - [`AllocError::SizeOverflow`] if the rounded size is not representable
/// - [`AllocError::OutOfMemory`] if the system allocator fails
pub fn allocate(size: usize, align: usize) -> Result<RawBlock, AllocError> {
    if !align.is_power_of_two() || align < MIN_ALIGNMENT {
        return Err(AllocError::InvalidAlignment(align));
    }
    let rounded = align_up(size.max(1), align).ok_or(AllocError::SizeOverflow)?;
    let layout = Layout::from_size_align(rounded, align).map_err(|_| AllocError::SizeOverflow)?;

    // SAFETY: layout has a non-zero size.
    let raw = unsafe { alloc::alloc_zeroed(layout) };
    let ptr = NonNull::new(raw).ok_or(AllocError::OutOfMemory { size, align })?;
    Ok(RawBlock { ptr, layout })
}

/// Release a block obtained from [`allocate`].
#[inline]
pub fn deallocate(block: RawBlock) {
    drop(block);
}

// =============================================================================
// AlignedBuf
// =============================================================================

/// A fixed-length, zero-initialized `f32` buffer with aligned storage.
pub struct AlignedBuf {
    block: RawBlock,
    len: usize,
}

impl AlignedBuf {
    /// Allocate `len` zeroed floats aligned to `align`.
    pub fn zeroed(len: usize, align: Alignment) -> Result<Self, AllocError> {
        let bytes = len
            .checked_mul(size_of::<f32>())
            .ok_or(AllocError::SizeOverflow)?;
        let block = allocate(bytes, align.as_usize())?;
        Ok(Self { block, len })
    }

    /// Allocate `len` floats and copy `src` into the front; the rest stays zero.
    ///
    /// `src` longer than `len` is truncated.
    pub fn from_slice_padded(src: &[f32], len: usize, align: Alignment) -> Result<Self, AllocError> {
        let mut buf = Self::zeroed(len, align)?;
        let n = src.len().min(len);
        buf[..n].copy_from_slice(&src[..n]);
        Ok(buf)
    }

    /// Number of floats.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no floats.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment of the first element in bytes.
    #[inline]
    pub fn align(&self) -> usize {
        self.block.align()
    }

    /// Reset every element to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.fill(0.0);
    }
}

impl Deref for AlignedBuf {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &[f32] {
        // SAFETY: the block holds at least `len` zero-initialized (valid) f32s
        // and is aligned to at least 16 bytes.
        unsafe { std::slice::from_raw_parts(self.block.as_ptr().cast::<f32>(), self.len) }
    }
}

impl DerefMut for AlignedBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut [f32] {
        // SAFETY: as in `deref`; `&mut self` guarantees unique access.
        unsafe { std::slice::from_raw_parts_mut(self.block.as_ptr().cast::<f32>(), self.len) }
    }
}

impl Clone for AlignedBuf {
    /// Clones into a fresh allocation with the same alignment.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails, like `Vec::clone`.
    fn clone(&self) -> Self {
        let align = match self.align() {
            16 => Alignment::Simd128,
            32 => Alignment::Simd256,
            _ => Alignment::Simd512,
        };
        match Self::from_slice_padded(self, self.len, align) {
            Ok(buf) => buf,
            Err(e) => panic!("failed to clone aligned buffer: {e}"),
        }
    }
}

impl fmt::Debug for AlignedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("len", &self.len)
            .field("align", &self.align())
            .field("data", &&**self)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
