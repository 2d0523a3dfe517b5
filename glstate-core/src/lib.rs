/// glstate Core Library - Transform state and Khronos call logging
///
/// This library provides the graphics-state half (model, projection and
/// model-view-projection matrices with push semantics) and the logging half
/// (enumeration name tables and call trace formatting) of the glstate tools.

pub mod enums;
pub mod error;
pub mod header;
pub mod log_context;
pub mod log_map;
pub mod matrix;
pub mod projection;
pub mod stack;
pub mod transform;

// Re-export commonly used types
pub use enums::{EnumConstant, EnumRegistry};
pub use error::{LogError, TransformError};
pub use log_context::{Arg, LogContext};
pub use log_map::{LogMap, ParameterFormat};
pub use matrix::{Matrix, MatrixKind, MatrixType, ModelMatrix, Precision, Scalar};
pub use projection::ProjectionMatrix;
pub use stack::{GraphicsState, StateStack};
pub use transform::{TransformState, TransformStateDouble, TransformStateSingle};
