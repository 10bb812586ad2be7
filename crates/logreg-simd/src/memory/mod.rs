//! Aligned memory for kernel inputs and model parameters.

mod aligned;

pub use aligned::{
    align_up, allocate, deallocate, is_aligned, padded_len, AlignedBuf, AllocError, Alignment,
    RawBlock, MIN_ALIGNMENT, PAD_LANES,
};
