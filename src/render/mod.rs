//! Rendering: the [`Surface`](surface::Surface) drawing seam, the CPU
//! raster backend, a recording backend for tests, and the layer compositor.

pub mod compositor;
pub mod raster;
pub mod recording;
pub mod shapes;
pub mod surface;
