pub mod brush;
pub mod error;
pub mod fixed;
pub mod grid;
pub mod integrator;
pub mod params;
pub mod pixel;
pub mod refraction;
pub mod session;

pub use brush::{Brush, BrushParams, Stroke};
pub use error::EngineError;
pub use grid::{Grid, GridBuffers, HeightBuffers};
pub use integrator::WaveIntegrator;
pub use params::EngineParams;
pub use refraction::RefractionRenderer;
pub use session::RippleSim;
