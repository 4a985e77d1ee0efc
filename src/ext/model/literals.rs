pub(crate) fn parse_numeric_literal(text: &str) -> Result<u32, &'static str> {
    if text.starts_with('-') {
        return Err("negative values are not supported here");
    }
    let cleaned = text.replace('_', "");
    let (radix, digits) = if let Some(stripped) = cleaned.strip_prefix("0x") {
        (16, stripped)
    } else if let Some(stripped) = cleaned.strip_prefix("0b") {
        (2, stripped)
    } else if let Some(stripped) = cleaned.strip_prefix("0o") {
        (8, stripped)
    } else {
        (10, cleaned.as_str())
    };
    if digits.is_empty() {
        return Err("numeric literal missing digits");
    }
    u32::from_str_radix(digits, radix).map_err(|_| "numeric literal out of range")
}

#[cfg(test)]
mod tests {
    use super::parse_numeric_literal;

    #[test]
    fn parses_hex_literal() {
        assert_eq!(parse_numeric_literal("0x1e").unwrap(), 0x1e);
    }

    #[test]
    fn parses_decimal_literal() {
        assert_eq!(parse_numeric_literal("12").unwrap(), 12);
    }

    #[test]
    fn rejects_negative_literal() {
        assert!(parse_numeric_literal("-1").is_err());
    }

    #[test]
    fn rejects_malformed_literal() {
        assert!(parse_numeric_literal("0xzz").is_err());
    }
}
