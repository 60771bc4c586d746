// ─────────────────────────────────────────────────────────────
// Decoder — turns `$_(N).$_(N)...` chains back into literals
// ─────────────────────────────────────────────────────────────

const TERM_OPEN: &[u8] = b"$_(";

/// Parse one `$_(N)` term at `pos`. Returns the byte and the index after `)`.
fn term_at(src: &[u8], pos: usize) -> Option<(u8, usize)> {
    let rest = src.get(pos..)?;
    if !rest.starts_with(TERM_OPEN) {
        return None;
    }
    let digits_start = pos + TERM_OPEN.len();
    let digits_len = src[digits_start..].iter().take_while(|b| b.is_ascii_digit()).count();
    let close = digits_start + digits_len;
    if digits_len == 0 || src.get(close) != Some(&b')') {
        return None;
    }

    let digits = std::str::from_utf8(&src[digits_start..close]).ok()?;
    let value = if digits.len() > 1 && digits.starts_with('0') {
        u32::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    Some((u8::try_from(value).ok()?, close + 1))
}

/// Longest chain starting at `pos`: decoded bytes and the index after it.
fn chain_at(src: &[u8], pos: usize) -> Option<(Vec<u8>, usize)> {
    let (first, mut end) = term_at(src, pos)?;
    let mut bytes = vec![first];
    while src.get(end) == Some(&b'.') {
        match term_at(src, end + 1) {
            Some((b, next)) => {
                bytes.push(b);
                end = next;
            }
            None => break,
        }
    }
    Some((bytes, end))
}

/// Decode an expression that is exactly one chain (or `''`).
pub fn decode_chain(expr: &str) -> Option<Vec<u8>> {
    let expr = expr.trim();
    if expr == "''" {
        return Some(Vec::new());
    }
    let (bytes, end) = chain_at(expr.as_bytes(), 0)?;
    (end == expr.len()).then_some(bytes)
}

/// Single-quoted PHP literal for `bytes`.
pub fn php_literal(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Rewrite every chain in a generated program as a quoted literal.
pub fn decode_program(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match chain_at(bytes, pos) {
            Some((decoded, end)) => {
                out.extend_from_slice(php_literal(&decoded).as_bytes());
                pos = end;
            }
            None => {
                out.push(bytes[pos]);
                pos += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_and_octal_chain() {
        assert_eq!(decode_chain("$_(115).$_(0171).$_(115)"), Some(b"sys".to_vec()));
        assert_eq!(decode_chain("''"), Some(Vec::new()));
        assert_eq!(decode_chain("$_(0)"), Some(vec![0]));
    }

    #[test]
    fn rejects_partial_or_out_of_range() {
        assert_eq!(decode_chain("$_(115).x"), None);
        assert_eq!(decode_chain("$_(256)"), None);
        assert_eq!(decode_chain("$_()"), None);
        assert_eq!(decode_chain("$_(09)"), None);
    }

    #[test]
    fn program_rewrite_keeps_structure() {
        let src = "$_3=$_(95).$_(71);$__3=($_(0146))(${$_3},1);";
        assert_eq!(decode_program(src), "$_3='_G';$__3=('f')(${$_3},1);");
    }

    #[test]
    fn literal_escaping() {
        assert_eq!(php_literal(b"it's a \\"), r"'it\'s a \\'");
    }
}
