use std::path::PathBuf;

use rvext::{process, ExtError};

fn manifest_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[test]
fn processes_extension_tree_in_sorted_order() {
    let exts = process(&manifest_path("extensions")).expect("bundled extensions must encode");
    let insts = exts.instructions();

    let names: Vec<_> = insts.iter().map(|i| i.name()).collect();
    assert_eq!(
        names,
        vec!["binom", "foo", "itype", "read_custreg", "write_custreg"]
    );

    let binom = &insts[0];
    assert_eq!(binom.mask_name(), "MASK_BINOM");
    assert_eq!(binom.mask_value(), 0xfe00707f);
    assert_eq!(binom.match_value(), 0x200000b);
    assert_eq!(binom.operands().as_str(), "d,s,t");

    let foo = &insts[1];
    assert_eq!(foo.match_value(), 0xb);

    let itype = &insts[2];
    assert_eq!(itype.mask_value(), 0x707f);
    assert_eq!(itype.match_value(), 0x102b);
    assert_eq!(itype.operands().as_str(), "d,s,j");

    let read = &insts[3];
    assert_eq!(read.match_value(), 0xfc00707b);
    let write = &insts[4];
    assert_eq!(write.match_value(), 0xfe00707b);
}

#[test]
fn header_fragment_uses_extension_specific_names() {
    let exts = process(&manifest_path("extensions")).unwrap();
    let header = exts.cust_header();

    assert!(header.contains("#ifndef RISCV_CUSTOM_ENCODING_H"));
    assert!(!header.contains("#ifndef RISCV_ENCODING_H"));
    assert!(header.contains("#define MATCH_READ_CUSTREG 0xfc00707b"));
    assert!(header.contains("#define MASK_WRITE_CUSTREG  0xfe00707f"));
    assert!(header.contains("DECLARE_INSN(binom, MATCH_BINOM, MASK_BINOM)"));
}

#[test]
fn processes_a_single_file() {
    let exts = process(&manifest_path("extensions/foo/foo.cc")).unwrap();
    let names: Vec<_> = exts.instructions().iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["foo", "read_custreg", "write_custreg"]);
}

#[test]
fn conflicting_models_reject_the_whole_batch() {
    let err = process(&manifest_path("tests/fixtures/conflict")).unwrap_err();
    match err {
        ExtError::Opcode(message) => {
            assert!(message.contains("overlap"), "message: {message}");
            assert!(
                message.contains("itype0") && message.contains("itype1"),
                "message: {message}"
            );
        }
        other => panic!("expected opcode error, got {other}"),
    }
}

#[test]
fn cycle_counts_survive_parsing() {
    use rvext::{CcIntrospector, Model};

    let model = Model::from_file(
        &manifest_path("extensions/itype/itype.cc"),
        &CcIntrospector,
    )
    .unwrap();
    assert_eq!(model.cycles(), 2);
    assert_eq!(model.body(), "{\n    Rd_uw = Rs1_uw ^ imm;\n}");
}
