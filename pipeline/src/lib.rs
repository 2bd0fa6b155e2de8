pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod render;
pub mod transform;

pub use config::PipelineConfig;
pub use engine::{Pipeline, split_spec};
pub use error::UnknownExtensionError;
pub use registry::{ExtensionRegistry, Mutator};
pub use render::render_html;
pub use transform::Stage;
