//! Batch encoding generation.
//!
//! Accepted models are rendered into the opcode-table syntax, compiled in a
//! single oracle invocation, and zipped back into [`Instruction`] records
//! in submission order. The returned header text is renamed so it can be
//! concatenated into the toolchain's own generated header without
//! duplicate-definition clashes.

mod overlap;
mod table;

pub use table::{EncodingOracle, TableCompiler};

use super::error::ExtError;
use super::instruction::Instruction;
use super::model::{Format, Model};

/// The finalized extension set: one record per model plus the header
/// fragment downstream patchers splice into the toolchain.
#[derive(Debug)]
pub struct Extensions {
    instructions: Vec<Instruction>,
    cust_header: String,
}

impl Extensions {
    /// Derives encodings for the whole model set. Any failure rejects the
    /// entire batch; no partial results are observable.
    pub fn generate(models: &[Model], oracle: &dyn EncodingOracle) -> Result<Self, ExtError> {
        let table = render_table(models);
        let defines = oracle.compile(&table)?;
        if defines.is_empty() {
            return Err(ExtError::Opcode(
                "encoding oracle produced no output".to_string(),
            ));
        }

        // Rename guard and declaration macros so the fragment can coexist
        // with the toolchain's original encoding header.
        let cust_header = defines
            .replacen("RISCV_ENCODING_H", "RISCV_CUSTOM_ENCODING_H", 2)
            .replace("DECLARE_CSR", "DECLARE_CUSTOM_CSR")
            .replace("DECLARE_CAUSE", "DECLARE_CUSTOM_CAUSE");

        let masks: Vec<&str> = cust_header
            .lines()
            .filter(|line| line.starts_with("#define MASK"))
            .collect();
        let matches: Vec<&str> = cust_header
            .lines()
            .filter(|line| line.starts_with("#define MATCH"))
            .collect();

        if masks.len() != matches.len() || masks.len() != models.len() {
            return Err(ExtError::Opcode(format!(
                "oracle output inconsistent: {} models, {} masks, {} matches",
                models.len(),
                masks.len(),
                matches.len()
            )));
        }

        let mut instructions = Vec::with_capacity(models.len());
        for (model, (mask, match_line)) in models.iter().zip(masks.iter().zip(&matches)) {
            instructions.push(Instruction::from_defines(
                model.format(),
                model.name(),
                mask,
                match_line,
            )?);
        }

        // The oracle does not catch every conflict; re-verify locally.
        for instruction in &instructions {
            overlap::check_no_overlap(instruction, &instructions)?;
        }

        Ok(Self {
            instructions,
            cust_header,
        })
    }

    /// One record per input model, order-preserving.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Header fragment with extension-specific guard and macro names.
    pub fn cust_header(&self) -> &str {
        &self.cust_header
    }
}

/// Renders one encoding-table line per model. Bits 1..0 are pinned to 3,
/// marking a 32-bit instruction word.
pub(crate) fn render_table(models: &[Model]) -> String {
    let mut table = String::new();
    for model in models {
        let line = match model.format() {
            Format::R => format!(
                "{} rd rs1 rs2 31..25={} 14..12={} 6..2={} 1..0=3\n",
                model.name(),
                model.funct7(),
                model.funct3(),
                model.opcode()
            ),
            Format::I => format!(
                "{} rd rs1 imm12 14..12={} 6..2={} 1..0=3\n",
                model.name(),
                model.funct3(),
                model.opcode()
            ),
        };
        table.push_str(&line);
    }
    table
}
