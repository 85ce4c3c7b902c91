//! Aligned amplitude storage
//!
//! The amplitude buffer is allocated with 64-byte alignment so the kernels
//! can assume cache-line-aligned, SIMD-friendly memory. The buffer owns its
//! allocation exclusively and releases it deterministically on drop.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Alignment of the amplitude allocation (one cache line, AVX-512 width)
const BUFFER_ALIGNMENT: usize = 64;

/// Exclusively owned, 64-byte aligned array of complex amplitudes
pub(crate) struct AlignedBuffer {
    data: NonNull<Complex64>,
    len: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate `len` zeroed amplitudes; `len` must be a nonzero power of
    /// two.
    pub fn zeroed(len: usize) -> Result<Self> {
        debug_assert!(len.is_power_of_two());

        let size = len * std::mem::size_of::<Complex64>();
        let layout = Layout::from_size_align(size, BUFFER_ALIGNMENT)
            .map_err(|_| StateError::AllocationFailed { size })?;

        let data = unsafe {
            let ptr = alloc(layout) as *mut Complex64;
            if ptr.is_null() {
                return Err(StateError::AllocationFailed { size });
            }
            // All-zero bytes are a valid Complex64 of 0.0 + 0.0i.
            std::ptr::write_bytes(ptr, 0, len);
            NonNull::new_unchecked(ptr)
        };

        Ok(Self { data, len, layout })
    }

    /// Allocate a buffer holding a copy of `amplitudes`.
    pub fn from_slice(amplitudes: &[Complex64]) -> Result<Self> {
        let buffer = Self::zeroed(amplitudes.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(
                amplitudes.as_ptr(),
                buffer.data.as_ptr(),
                amplitudes.len(),
            );
        }
        Ok(buffer)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.data.as_ptr() as *mut u8, self.layout);
        }
    }
}

impl Clone for AlignedBuffer {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice()).expect("allocation for buffer clone")
    }
}

// Safety: the buffer owns its allocation and hands out access only through
// ordinary borrowed slices.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}
