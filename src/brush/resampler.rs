//! Clipped grid cells back into kernel space

use super::kernel::BrushKernel;
use super::mapper::GridRect;

/// Samples a kernel over a clipped grid rectangle.
///
/// Kernel coordinates are derived from the *unclipped* footprint, so a brush
/// hanging off the terrain edge tapers exactly as it would on an infinite
/// field. Only the clipped region is ever iterated.
#[derive(Debug, Clone, Copy)]
pub struct KernelResampler<'a> {
    kernel: &'a BrushKernel,
    expected_width: f32,
    expected_height: f32,
    clip_x: f32,
    clip_z: f32,
    strength: f32,
}

impl<'a> KernelResampler<'a> {
    pub fn new(kernel: &'a BrushKernel, rect: &GridRect, strength: f32) -> Self {
        Self {
            kernel,
            expected_width: rect.expected_width().max(1) as f32,
            expected_height: rect.expected_height().max(1) as f32,
            clip_x: rect.clip_x() as f32,
            clip_z: rect.clip_z() as f32,
            strength,
        }
    }

    /// Kernel cell for clipped-local index `(i, j)`; nearest sample, no filtering
    pub fn kernel_index(&self, i: usize, j: usize) -> (usize, usize) {
        let kw = self.kernel.width() as f32;
        let kh = self.kernel.height() as f32;

        // i/w + clip/w, folded so equal logical offsets give identical floats
        let kx = ((i as f32 + self.clip_x) / self.expected_width * kw).clamp(0.0, kw - 1.0);
        let ky = ((j as f32 + self.clip_z) / self.expected_height * kh).clamp(0.0, kh - 1.0);

        (kx as usize, ky as usize)
    }

    /// Influence amount (`kernel * strength`) for clipped-local index `(i, j)`
    #[inline]
    pub fn influence(&self, i: usize, j: usize) -> f32 {
        let (kx, ky) = self.kernel_index(i, j);
        self.kernel.get(kx, ky) * self.strength
    }
}
