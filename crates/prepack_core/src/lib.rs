pub mod error;
pub mod fallback;
pub mod generator;
pub mod markdown;
pub mod models;
pub mod prompt;
pub mod schema;

pub use error::{PrepackError, SchemaViolation};
pub use generator::{AiFailure, AiSuccess, PrepackGenerator};
pub use models::{
    AiStatus, Formality, GenerationEnvelope, MomentTarget, PackVersion, PrepackInput,
    PrepackResult, Question, RundownSegment, ShowFormat,
};
