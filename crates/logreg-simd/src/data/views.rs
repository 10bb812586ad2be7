//! Borrowed, sample-major feature matrices.

use ndarray::ArrayView2;

/// Read-only view of a training or prediction batch.
///
/// Storage is sample-major and tightly packed: `[n_samples, n_features]` in
/// standard (C) order, so `sample(i)` is a contiguous slice. Host arrays with
/// other layouts or element types go through [`adapter`](super::adapter)
/// first.
#[derive(Clone, Copy)]
pub struct SamplesView<'a> {
    /// Length `n_samples * n_features`, sample-major
    flat: &'a [f32],
    n_samples: usize,
    n_features: usize,
}

impl<'a> SamplesView<'a> {
    /// Create from a contiguous slice in sample-major order.
    ///
    /// This is zero-copy.
    ///
    /// Data layout: `[s0_f0, s0_f1, ..., s1_f0, s1_f1, ...]`
    ///
    /// # Returns
    ///
    /// `None` if the slice length doesn't match `n_samples * n_features`.
    pub fn from_slice(data: &'a [f32], n_samples: usize, n_features: usize) -> Option<Self> {
        let len = n_samples.checked_mul(n_features)?;
        (data.len() == len).then_some(Self {
            flat: data,
            n_samples,
            n_features,
        })
    }

    /// Wrap an `ndarray` view.
    ///
    /// # Returns
    ///
    /// `None` unless the view is in standard layout (contiguous, row-major).
    pub fn from_array(data: ArrayView2<'a, f32>) -> Option<Self> {
        let (n_samples, n_features) = data.dim();
        data.to_slice().map(|flat| Self {
            flat,
            n_samples,
            n_features,
        })
    }

    /// Wrap data whose length is already known to be `n_samples * n_features`.
    pub(crate) fn from_packed(flat: &'a [f32], n_samples: usize, n_features: usize) -> Self {
        debug_assert_eq!(flat.len(), n_samples * n_features);
        Self {
            flat,
            n_samples,
            n_features,
        }
    }

    /// Number of samples (first dimension).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of features (second dimension).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Features of sample `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_samples()`.
    #[inline]
    pub fn sample(&self, i: usize) -> &'a [f32] {
        let n = self.n_features();
        &self.flat[i * n..(i + 1) * n]
    }

    /// Iterate over samples in order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &'a [f32]> + 'a {
        let (flat, n) = (self.flat, self.n_features());
        (0..self.n_samples()).map(move |i| &flat[i * n..(i + 1) * n])
    }

    /// The packed data, `n_samples * n_features` long.
    #[inline]
    pub fn as_slice(&self) -> &'a [f32] {
        self.flat
    }
}

impl std::fmt::Debug for SamplesView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplesView")
            .field("n_samples", &self.n_samples())
            .field("n_features", &self.n_features())
            .finish()
    }
}
