//! Finalized instruction records consumed by the toolchain patchers.

use std::fmt;

use super::error::ExtError;
use super::model::Format;

/// Operand letters used by the assembler's operand parser:
/// `d` = Rd, `s` = Rs1, `t` = Rs2, `j` = immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandConvention {
    /// R-type: destination, source1, source2.
    RegReg,
    /// I-type: destination, source1, immediate.
    RegImm,
}

impl OperandConvention {
    pub fn as_str(self) -> &'static str {
        match self {
            OperandConvention::RegReg => "d,s,t",
            OperandConvention::RegImm => "d,s,j",
        }
    }
}

impl From<Format> for OperandConvention {
    fn from(format: Format) -> Self {
        match format {
            Format::R => OperandConvention::RegReg,
            Format::I => OperandConvention::RegImm,
        }
    }
}

impl fmt::Display for OperandConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable, externally-consumed view of one accepted instruction.
#[derive(Debug, Clone)]
pub struct Instruction {
    format: Format,
    name: String,
    mask_name: String,
    mask_value: u32,
    match_name: String,
    match_value: u32,
    operands: OperandConvention,
}

impl Instruction {
    /// Builds a record from the oracle's raw `#define` lines. The symbolic
    /// name is the second-to-last whitespace token, the hex value the last.
    pub(crate) fn from_defines(
        format: Format,
        name: &str,
        mask_line: &str,
        match_line: &str,
    ) -> Result<Self, ExtError> {
        let (mask_name, mask_value) = parse_define(mask_line)?;
        let (match_name, match_value) = parse_define(match_line)?;
        Ok(Self {
            format,
            name: name.to_string(),
            mask_name,
            mask_value,
            match_name,
            match_value,
            operands: format.into(),
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The mnemonic as it shall appear in the assembler.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask_name(&self) -> &str {
        &self.mask_name
    }

    pub fn mask_value(&self) -> u32 {
        self.mask_value
    }

    pub fn match_name(&self) -> &str {
        &self.match_name
    }

    pub fn match_value(&self) -> u32 {
        self.match_value
    }

    pub fn operands(&self) -> OperandConvention {
        self.operands
    }
}

fn parse_define(line: &str) -> Result<(String, u32), ExtError> {
    let mut rev = line.split_whitespace().rev();
    let (Some(value), Some(name)) = (rev.next(), rev.next()) else {
        return Err(malformed(line));
    };
    let digits = value.strip_prefix("0x").ok_or_else(|| malformed(line))?;
    let value = u32::from_str_radix(digits, 16).map_err(|_| malformed(line))?;
    Ok((name.to_string(), value))
}

fn malformed(line: &str) -> ExtError {
    ExtError::Opcode(format!("malformed define line: '{line}'"))
}
