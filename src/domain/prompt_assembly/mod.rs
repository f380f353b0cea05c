//! Mode-conditioned instruction assembly.

mod assembler;
mod error;

pub use assembler::{InstructionSettings, assemble_instruction};
pub use error::PromptAssemblyError;
