//! Shared constructors for encoding-layer tests.

use super::model::{FunctionInfo, Model, SourceInfo, VarInfo};

pub(crate) fn rtype_model(name: &str, opcode: u32, funct3: u32, funct7: u32) -> Model {
    build_model(name, &["Rd", "Rs1", "Rs2"], opcode, funct3, Some(funct7))
}

pub(crate) fn itype_model(name: &str, opcode: u32, funct3: u32) -> Model {
    build_model(name, &["Rd", "Rs1", "imm"], opcode, funct3, None)
}

fn build_model(
    name: &str,
    params: &[&str],
    opcode: u32,
    funct3: u32,
    funct7: Option<u32>,
) -> Model {
    let mut variables = vec![
        VarInfo {
            name: "opc".to_string(),
            value_token: Some(format!("{opcode:#x}")),
        },
        VarInfo {
            name: "funct3".to_string(),
            value_token: Some(format!("{funct3:#x}")),
        },
    ];
    if let Some(funct7) = funct7 {
        variables.push(VarInfo {
            name: "funct7".to_string(),
            value_token: Some(format!("{funct7:#x}")),
        });
    }

    let info = SourceInfo {
        functions: vec![FunctionInfo {
            name: name.to_string(),
            ret_type: "void".to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            has_body: true,
        }],
        variables,
        body: Some("{\n}".to_string()),
    };
    Model::from_info(info).expect("test model must validate")
}
