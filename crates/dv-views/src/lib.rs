//! Render-side views of the dashboard
//!
//! The transform pipeline, its memoizing cache and the frames handed to the
//! chart renderer.

mod cache;
mod frame;
pub mod pipeline;
mod viewport;

pub use cache::PipelineCache;
pub use frame::{FrameStatus, RenderFrame, PIE_SLICE_LIMIT};
pub use pipeline::{transform, transform_dataset, MAX_DATA_POINTS};
pub use viewport::Viewport;
