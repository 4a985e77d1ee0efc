//! Read-only source introspection for reference models.
//!
//! The original tool leaned on a full C++ front-end plus a separate
//! syntax-only compiler pass. Reference models only ever use one small
//! function-signature shape, so a hand-rolled scanner over the token stream
//! covers the same ground in-process: the structural pass stands in for the
//! external syntax check, and scan failures surface as compile errors.

use std::path::Path;

use smallvec::SmallVec;

use super::super::error::ExtError;
use super::lexer::{Lexer, Token, TokenKind};

/// One function declaration or definition, in source order.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    /// The leading return-type token of the declaration.
    pub ret_type: String,
    pub params: SmallVec<[String; 4]>,
    pub has_body: bool,
}

/// A variable declaration with an initializer, in source order.
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub name: String,
    /// First initializer token that looks like a numeric literal, if any.
    pub value_token: Option<String>,
}

/// Everything a [`Model`](super::Model) needs to know about one source file.
#[derive(Debug, Default)]
pub struct SourceInfo {
    pub functions: Vec<FunctionInfo>,
    pub variables: Vec<VarInfo>,
    /// Verbatim text of the first function body, braces included.
    pub body: Option<String>,
}

/// Pluggable source-to-structure seam. Production code uses
/// [`CcIntrospector`]; tests may substitute canned [`SourceInfo`] values.
pub trait SourceIntrospector {
    fn introspect(&self, path: &Path) -> Result<SourceInfo, ExtError>;
}

/// Scanner for the `.cc` reference-model subset.
#[derive(Debug, Default)]
pub struct CcIntrospector;

impl SourceIntrospector for CcIntrospector {
    fn introspect(&self, path: &Path) -> Result<SourceInfo, ExtError> {
        let src = std::fs::read_to_string(path)?;
        self.introspect_source(path, &src)
    }
}

impl CcIntrospector {
    pub fn introspect_source(&self, origin: &Path, src: &str) -> Result<SourceInfo, ExtError> {
        let compile_err = |message: String| ExtError::Compile {
            file: origin.to_path_buf(),
            message,
        };

        let tokens = Lexer::new(src).tokenize().map_err(&compile_err)?;
        syntax_check(&tokens).map_err(&compile_err)?;

        let mut info = SourceInfo::default();
        let mut i = 0;
        while i + 1 < tokens.len() {
            if tokens[i].kind != TokenKind::Identifier
                || tokens[i + 1].kind != TokenKind::Identifier
            {
                i += 1;
                continue;
            }
            match tokens.get(i + 2).map(|t| t.kind) {
                Some(TokenKind::LParen) => {
                    i = scan_function(src, &tokens, i, &mut info).map_err(&compile_err)?;
                }
                Some(TokenKind::Equals) => {
                    i = scan_variable(&tokens, i, &mut info);
                }
                _ => i += 1,
            }
        }
        Ok(info)
    }
}

/// Verifies that parentheses and braces pair up across the whole stream.
fn syntax_check(tokens: &[Token]) -> Result<(), String> {
    let mut stack: SmallVec<[&Token; 8]> = SmallVec::new();
    for token in tokens {
        match token.kind {
            TokenKind::LParen | TokenKind::LBrace => stack.push(token),
            TokenKind::RParen | TokenKind::RBrace => {
                let expected = if token.kind == TokenKind::RParen {
                    TokenKind::LParen
                } else {
                    TokenKind::LBrace
                };
                match stack.pop() {
                    Some(open) if open.kind == expected => {}
                    _ => {
                        return Err(format!(
                            "unmatched '{}' at line {}",
                            token.lexeme, token.line
                        ));
                    }
                }
            }
            _ => {}
        }
    }
    if let Some(open) = stack.last() {
        return Err(format!(
            "unclosed '{}' at line {}",
            open.lexeme, open.line
        ));
    }
    Ok(())
}

/// Scans a `ret name ( params ) [{ body } | ;]` shape starting at the
/// return-type token. Returns the index to resume scanning from; for a
/// definition that is just inside the body, so declarations within it are
/// still picked up.
fn scan_function(
    src: &str,
    tokens: &[Token],
    start: usize,
    info: &mut SourceInfo,
) -> Result<usize, String> {
    let ret_type = tokens[start].lexeme.clone();
    let name = tokens[start + 1].lexeme.clone();
    let lparen = start + 2;
    let rparen = matching_delim(tokens, lparen, TokenKind::LParen, TokenKind::RParen)?;

    let mut params: SmallVec<[String; 4]> = SmallVec::new();
    let mut current: Option<String> = None;
    for token in &tokens[lparen + 1..rparen] {
        match token.kind {
            // The parameter name is the last identifier before the comma.
            TokenKind::Identifier => current = Some(token.lexeme.clone()),
            TokenKind::Comma => {
                if let Some(param) = current.take() {
                    params.push(param);
                }
            }
            _ => {}
        }
    }
    if let Some(param) = current.take() {
        params.push(param);
    }

    let mut has_body = false;
    let mut resume = rparen + 1;
    match tokens.get(rparen + 1).map(|t| t.kind) {
        Some(TokenKind::LBrace) => {
            let lbrace = rparen + 1;
            let rbrace = matching_delim(tokens, lbrace, TokenKind::LBrace, TokenKind::RBrace)?;
            has_body = true;
            if info.body.is_none() {
                info.body =
                    Some(src[tokens[lbrace].offset..tokens[rbrace].end_offset()].to_string());
            }
            resume = lbrace + 1;
        }
        Some(TokenKind::Semicolon) => resume = rparen + 2,
        _ => {}
    }

    info.functions.push(FunctionInfo {
        name,
        ret_type,
        params,
        has_body,
    });
    Ok(resume)
}

/// Scans a `type name = ... ;` shape starting at the type token. The value
/// token is the first initializer token with a leading digit, mirroring how
/// the original read numeric literals out of declarations.
fn scan_variable(tokens: &[Token], start: usize, info: &mut SourceInfo) -> usize {
    let name = tokens[start + 1].lexeme.clone();
    let mut value_token = None;
    let mut i = start + 3;
    while i < tokens.len() && tokens[i].kind != TokenKind::Semicolon {
        if value_token.is_none()
            && tokens[i]
                .lexeme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        {
            value_token = Some(tokens[i].lexeme.clone());
        }
        i += 1;
    }
    info.variables.push(VarInfo { name, value_token });
    i + 1
}

fn matching_delim(
    tokens: &[Token],
    open: usize,
    open_kind: TokenKind,
    close_kind: TokenKind,
) -> Result<usize, String> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.kind == open_kind {
            depth += 1;
        } else if token.kind == close_kind {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
    }
    Err(format!(
        "unclosed '{}' at line {}",
        tokens[open].lexeme, tokens[open].line
    ))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::CcIntrospector;
    use crate::ext::error::ExtError;

    fn introspect(src: &str) -> Result<super::SourceInfo, ExtError> {
        CcIntrospector.introspect_source(Path::new("test.cc"), src)
    }

    const FOO: &str = "\
#include <cstdint>

uint8_t opc    = 0x02;  // opc, 5 bits
uint8_t funct3 = 0x00;  // funct3, 3 bits
uint8_t funct7 = 0x00;  // funct7, 7 bits

void foo(
    uint32_t Rd_uw,
    uint32_t Rs1_uw,
    uint32_t Rs2_uw
)
{
    Rd_uw = Rs1_uw % Rs2_uw;
}
";

    #[test]
    fn extracts_function_and_variables() {
        let info = introspect(FOO).unwrap();
        assert_eq!(info.functions.len(), 1);
        let func = &info.functions[0];
        assert_eq!(func.name, "foo");
        assert_eq!(func.ret_type, "void");
        assert_eq!(func.params.as_slice(), ["Rd_uw", "Rs1_uw", "Rs2_uw"]);
        assert!(func.has_body);

        let vars: Vec<_> = info
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.value_token.as_deref()))
            .collect();
        assert_eq!(
            vars,
            vec![
                ("opc", Some("0x02")),
                ("funct3", Some("0x00")),
                ("funct7", Some("0x00")),
            ]
        );
    }

    #[test]
    fn body_span_is_verbatim() {
        let info = introspect(FOO).unwrap();
        assert_eq!(info.body.as_deref(), Some("{\n    Rd_uw = Rs1_uw % Rs2_uw;\n}"));
    }

    #[test]
    fn prototype_has_no_body() {
        let info = introspect("void fmod(uint32_t Rd, uint32_t Rs1, uint32_t Rs2);").unwrap();
        assert_eq!(info.functions.len(), 1);
        assert!(!info.functions[0].has_body);
        assert!(info.body.is_none());
    }

    #[test]
    fn declarations_inside_body_are_visible() {
        let src = "void mac(uint32_t Rd, uint32_t Rs1, uint32_t Rs2)\n{\n    uint32_t tmp = Rs1 * Rs2;\n    Rd = Rd + tmp;\n}\n";
        let info = introspect(src).unwrap();
        assert_eq!(info.variables.len(), 1);
        assert_eq!(info.variables[0].name, "tmp");
    }

    #[test]
    fn unbalanced_braces_fail_the_syntax_pass() {
        let err = introspect("void f(uint32_t Rd) {").unwrap_err();
        assert!(matches!(err, ExtError::Compile { .. }), "got {err}");
    }
}
