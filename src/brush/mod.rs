//! Brush kernels and their mapping onto terrain grids
//!
//! A stroke maps the brush footprint onto a field's grid with
//! [`CoordinateMapper`], then samples [`BrushKernel`] influence per clipped
//! cell through [`KernelResampler`].

pub mod kernel;
pub mod mapper;
pub mod resampler;

// Re-exports
pub use kernel::BrushKernel;
pub use mapper::{CoordinateMapper, GridRect};
pub use resampler::KernelResampler;
