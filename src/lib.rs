//! Umbra: parallel drop-shadow rendering for ARGB rasters.
//!
//! Computes a drop-shadow alpha mask by blurring the source image's alpha
//! channel with a separable 1-D kernel: a vertical pass, a barrier, then a
//! horizontal pass, partitioned into strips and run on the rayon thread
//! pool. All convolution arithmetic is integer fixed point, so output is
//! bit-identical across platforms, runs and thread counts.
//!
//! ## Pixel Format
//!
//! Buffers are flat row-major arrays of packed 32-bit ARGB values with alpha
//! in bits 24-31. Only the source's alpha channel is read, and only the
//! destination's alpha channel is written. The shadow is a solid color
//! modulated by blurred opacity, and the color is applied by the caller when
//! compositing. The destination measures `source + 2 * kernel radius` per
//! axis, letting the shadow fall off to fully transparent beyond the source
//! bounds.
//!
//! ## Renderers
//!
//! Renderers differ only in kernel shape; see [`renderer`] for the variants
//! (Gaussian, box, double-box, and a sequential reference implementation used
//! for validation).
//!
//! ## Example
//!
//! ```
//! use umbra::{GaussianShadowRenderer, PixelBuffer, ShadowParams, ShadowRenderer};
//!
//! let mut source = PixelBuffer::new(32, 32);
//! source.set(16, 16, 0xFF00_0000); // one opaque pixel
//!
//! let params = ShadowParams::new(4.0, 0.5);
//! let shadow = GaussianShadowRenderer.create_shadow(&source, None, &params)?;
//! assert_eq!(shadow.width(), 32 + 2 * 4);
//! # Ok::<(), umbra::Error>(())
//! ```

pub mod error;
pub mod kernel;
pub mod pixels;
pub mod renderer;

mod convolve;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use kernel::Kernel;
pub use pixels::PixelBuffer;
pub use renderer::{
    BoxShadowRenderer, DoubleBoxShadowRenderer, GaussianShadowRenderer, ReferenceShadowRenderer,
    ShadowParams, ShadowRenderer,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array2;
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::Error;
    use crate::pixels::PixelBuffer;
    use crate::renderer::{
        BoxShadowRenderer, DoubleBoxShadowRenderer, GaussianShadowRenderer, ShadowParams,
        ShadowRenderer,
    };

    fn to_py_err(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn buffer_from_array(image: &PyReadonlyArray2<'_, u32>) -> PyResult<PixelBuffer> {
        let input = image.as_array();
        let (height, width) = input.dim();
        let pixels = input.to_owned().into_raw_vec_and_offset().0;
        PixelBuffer::from_vec(width, height, pixels).map_err(to_py_err)
    }

    fn array_from_buffer(py: Python<'_>, buffer: PixelBuffer) -> Bound<'_, PyArray2<u32>> {
        let shape = (buffer.height(), buffer.width());
        Array2::from_shape_vec(shape, buffer.into_vec())
            .expect("buffer length matches dimensions")
            .into_pyarray(py)
    }

    /// Render a Gaussian drop-shadow mask.
    ///
    /// # Arguments
    /// * `image` - Source image (height, width) as packed ARGB u32
    /// * `radius` - Blur radius in pixels
    /// * `opacity` - Shadow opacity (0.0-1.0)
    ///
    /// # Returns
    /// Shadow mask enlarged by the kernel radius on every side; only the
    /// alpha byte is populated.
    #[pyfunction]
    #[pyo3(signature = (image, radius=5.0, opacity=0.75))]
    pub fn gaussian_shadow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u32>,
        radius: f32,
        opacity: f32,
    ) -> PyResult<Bound<'py, PyArray2<u32>>> {
        let src = buffer_from_array(&image)?;
        let dst = GaussianShadowRenderer
            .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
            .map_err(to_py_err)?;
        Ok(array_from_buffer(py, dst))
    }

    /// Render a box-blurred drop-shadow mask.
    #[pyfunction]
    #[pyo3(signature = (image, radius=5.0, opacity=0.75))]
    pub fn box_shadow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u32>,
        radius: f32,
        opacity: f32,
    ) -> PyResult<Bound<'py, PyArray2<u32>>> {
        let src = buffer_from_array(&image)?;
        let dst = BoxShadowRenderer
            .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
            .map_err(to_py_err)?;
        Ok(array_from_buffer(py, dst))
    }

    /// Render a drop-shadow mask using the double-box Gaussian approximation.
    #[pyfunction]
    #[pyo3(signature = (image, radius=5.0, opacity=0.75))]
    pub fn double_box_shadow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u32>,
        radius: f32,
        opacity: f32,
    ) -> PyResult<Bound<'py, PyArray2<u32>>> {
        let src = buffer_from_array(&image)?;
        let dst = DoubleBoxShadowRenderer
            .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
            .map_err(to_py_err)?;
        Ok(array_from_buffer(py, dst))
    }

    /// The integer kernel radius a blur radius maps to.
    ///
    /// The shadow mask is enlarged by this amount on every side.
    #[pyfunction]
    pub fn kernel_radius(radius: f32) -> usize {
        ShadowParams::new(radius, 1.0).kernel_radius()
    }

    /// Umbra shadow rendering module
    #[pymodule]
    pub fn umbra(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(gaussian_shadow, m)?)?;
        m.add_function(wrap_pyfunction!(box_shadow, m)?)?;
        m.add_function(wrap_pyfunction!(double_box_shadow, m)?)?;
        m.add_function(wrap_pyfunction!(kernel_radius, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::umbra;
