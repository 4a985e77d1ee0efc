//! Reference models of custom instructions.
//!
//! A model is one annotated C++ function describing the semantics of a new
//! instruction, plus the `opc`/`funct3`/`funct7`/`cycles` declarations that
//! place it in the encoding space. Construction parses the source through
//! the introspector and immediately validates the result against the
//! instruction-format contract; a model that exists is always consistent.

mod introspect;
mod lexer;
mod literals;

pub use introspect::{CcIntrospector, FunctionInfo, SourceInfo, SourceIntrospector, VarInfo};

use std::path::Path;

use super::error::ExtError;
use literals::parse_numeric_literal;

/// Opcodes reserved for custom extensions (custom-0/1/2/3).
pub const LEGAL_OPCODES: [u8; 4] = [0x02, 0x0a, 0x16, 0x1e];

/// Instruction encoding shape. R-type takes a second source register,
/// I-type takes an immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R,
    I,
}

/// A parsed, validated reference implementation of one custom instruction.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    format: Format,
    opcode: u8,
    funct3: u8,
    /// Discriminator within opcode+funct3. Only meaningful for R-type;
    /// 0xff sentinel otherwise.
    funct7: u8,
    cycles: u32,
    body: String,
}

impl Model {
    /// Parses and validates the reference implementation at `path`.
    pub fn from_file(path: &Path, introspector: &dyn SourceIntrospector) -> Result<Self, ExtError> {
        Self::from_info(introspector.introspect(path)?)
    }

    /// Builds a model from already-introspected source structure.
    pub fn from_info(info: SourceInfo) -> Result<Self, ExtError> {
        let mut draft = ModelDraft::default();

        if let Some(func) = info.functions.first() {
            draft.name = func.name.clone();
            draft.ret_type = func.ret_type.clone();
        }
        for func in &info.functions {
            for param in &func.params {
                if param.starts_with("Rd") {
                    draft.has_rd = true;
                }
                if param.starts_with("Rs1") {
                    draft.has_rs1 = true;
                }
                if param.starts_with("Rs2") {
                    draft.has_rs2 = true;
                }
                if param.starts_with("imm") {
                    draft.has_imm = true;
                }
            }
        }
        for var in &info.variables {
            let Some(token) = &var.value_token else {
                continue;
            };
            let slot = match var.name.as_str() {
                "opc" => &mut draft.opcode,
                "funct3" => &mut draft.funct3,
                "funct7" => &mut draft.funct7,
                "cycles" => &mut draft.cycles,
                _ => continue,
            };
            *slot = parse_numeric_literal(token).map_err(|message| ExtError::Value {
                subject: format!("{} = {token}", var.name),
                message: message.to_string(),
            })?;
        }
        draft.body = info.body.unwrap_or_default();

        draft.check()
    }

    /// Synthetic model for the built-in custom-register read instruction.
    pub fn read_custreg() -> Result<Self, ExtError> {
        Self::custreg("read_custreg", 0x7e, "{\n    Rd = xc->readMiscReg(Rs2);\n}")
    }

    /// Synthetic model for the built-in custom-register write instruction.
    pub fn write_custreg() -> Result<Self, ExtError> {
        Self::custreg("write_custreg", 0x7f, "{\n    xc->setMiscReg(Rs2, Rs1);\n}")
    }

    fn custreg(name: &str, funct7: u32, body: &str) -> Result<Self, ExtError> {
        let draft = ModelDraft {
            name: name.to_string(),
            ret_type: "void".to_string(),
            opcode: 0x1e,
            funct3: 0x7,
            funct7,
            cycles: 1,
            body: body.to_string(),
            has_rd: true,
            has_rs1: true,
            has_rs2: true,
            has_imm: false,
        };
        draft.check()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn funct3(&self) -> u8 {
        self.funct3
    }

    pub fn funct7(&self) -> u8 {
        self.funct7
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Verbatim brace-delimited semantics, opaque to the encoding process.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Fields and validity flags collected while parsing, before the
/// consistency check fixes the format and freezes the model.
#[derive(Debug)]
struct ModelDraft {
    name: String,
    ret_type: String,
    opcode: u32,
    funct3: u32,
    funct7: u32,
    cycles: u32,
    body: String,
    has_rd: bool,
    has_rs1: bool,
    has_rs2: bool,
    has_imm: bool,
}

impl Default for ModelDraft {
    fn default() -> Self {
        // Sentinels chosen to fail validation when a field is missing;
        // cycles alone has a meaningful default.
        Self {
            name: String::new(),
            ret_type: String::new(),
            opcode: 0,
            funct3: 0xff,
            funct7: 0xff,
            cycles: 1,
            body: String::new(),
            has_rd: false,
            has_rs1: false,
            has_rs2: false,
            has_imm: false,
        }
    }
}

impl ModelDraft {
    /// Runs the contract checks in fixed order; the first violation wins.
    fn check(self) -> Result<Model, ExtError> {
        if !self.has_rd {
            return Err(self.consistency("model definition requires parameter Rd"));
        }
        if !self.has_rs1 {
            return Err(self.consistency("model definition requires parameter Rs1"));
        }
        let format = match (self.has_rs2, self.has_imm) {
            (true, false) => Format::R,
            (false, true) => Format::I,
            _ => return Err(self.consistency("model definition requires parameter Op2")),
        };
        if self.ret_type != "void" {
            return Err(self.consistency("function has to be of type void"));
        }
        if !LEGAL_OPCODES.iter().any(|&opc| u32::from(opc) == self.opcode) {
            return Err(self.value("invalid opcode"));
        }
        if self.funct3 > 0x7 {
            return Err(self.value("invalid funct3"));
        }
        if format == Format::R && self.funct7 > 0x7f {
            return Err(self.value("invalid funct7"));
        }
        if self.cycles == 0 {
            return Err(self.value("missing cycle information"));
        }
        if !self.body.starts_with('{') {
            return Err(self.consistency("function definition not found"));
        }
        if !self.body.ends_with('}') {
            return Err(self.consistency("closing bracket missing"));
        }

        Ok(Model {
            funct7: if format == Format::R {
                self.funct7 as u8
            } else {
                0xff
            },
            name: self.name,
            format,
            opcode: self.opcode as u8,
            funct3: self.funct3 as u8,
            cycles: self.cycles,
            body: self.body,
        })
    }

    fn consistency(&self, message: &str) -> ExtError {
        ExtError::Consistency {
            subject: self.subject(),
            message: message.to_string(),
        }
    }

    fn value(&self, message: &str) -> ExtError {
        ExtError::Value {
            subject: self.subject(),
            message: message.to_string(),
        }
    }

    fn subject(&self) -> String {
        if self.name.is_empty() {
            "<unnamed model>".to_string()
        } else {
            self.name.clone()
        }
    }
}
