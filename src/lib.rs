//! rvext derives toolchain encoding artifacts for custom RISC-V
//! instructions from annotated C++ reference implementations.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let exts = rvext::process(Path::new("extensions"))?;
//! for inst in exts.instructions() {
//!     println!("{} {} = {:#x}", inst.name(), inst.mask_name(), inst.mask_value());
//! }
//! # Ok::<(), rvext::ExtError>(())
//! ```

pub mod ext;

pub use ext::{
    process, CcIntrospector, EncodingOracle, ExtError, Extensions, Format, Instruction, Model,
    OperandConvention, Pipeline, SourceIntrospector, TableCompiler,
};
