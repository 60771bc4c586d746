use colored::*;
use simpleshell_core::ConvertError;

// ─────────────────────────────────────────────────────────────
// Status lines — stderr, stdout carries the generated script
// ─────────────────────────────────────────────────────────────
pub fn step_ok(msg: &str) {
    eprintln!("{} {}", "[+]".green().bold(), msg);
}

pub fn step_err(msg: &str) {
    eprintln!("{} {}", "[x]".red().bold(), msg.red());
}

pub fn step_warn(msg: &str) {
    eprintln!("{} {}", "[!]".yellow().bold(), msg.yellow());
}

pub fn step_info(msg: &str) {
    eprintln!("{} {}", "[*]".blue(), msg.dimmed());
}

// ─────────────────────────────────────────────────────────────
// Conversion errors with the offending line
// ─────────────────────────────────────────────────────────────
pub fn render_error(source: &str, err: &ConvertError) -> String {
    let line = err.line();
    let text = source.lines().nth(line).unwrap_or("");
    format!("{}\n  {:>4} | {}", err, line, text)
}

pub fn report_error(source: &str, err: &ConvertError, statements: usize) {
    step_err(&render_error(source, err));
    step_warn(&format!(
        "output is partial: {} statement(s) before line {}",
        statements,
        err.line()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpleshell_core::Malformed;

    #[test]
    fn error_shows_failing_line() {
        let err = ConvertError::MalformedStatement { line: 1, reason: Malformed::MissingTerminator };
        let rendered = render_error("f(1);\noops\n", &err);
        assert_eq!(
            rendered,
            "line 1: malformed statement: line does not end with `);`\n     1 | oops"
        );
    }
}
