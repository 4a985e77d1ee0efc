//! Custom RISC-V instruction extension pipeline.
//!
//! Raw reference source flows through four stages: parse into a
//! [`model::Model`], validate against the instruction-format contract,
//! derive mask/match encodings as one batch via the
//! [`encoding::EncodingOracle`], and reject encoding-space collisions.
//! Survivors become [`instruction::Instruction`] records for the
//! toolchain-facing patchers.

pub mod encoding;
pub mod error;
pub mod instruction;
pub mod model;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use encoding::{EncodingOracle, Extensions, TableCompiler};
pub use error::ExtError;
pub use instruction::{Instruction, OperandConvention};
pub use model::{CcIntrospector, Format, Model, SourceIntrospector, LEGAL_OPCODES};
pub use pipeline::{process, Pipeline};
