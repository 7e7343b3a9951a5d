//! Console output for CI logs. Non-interactive: status lines only, no
//! prompts. Diagnostics go to stderr so stdout stays clean.

use console::style;

/// Trace line written before every external command invocation.
pub fn trace_command(program: &str, args: &[&str]) {
    eprintln!("{} {} {}", style("Executing:").dim(), program, args.join(" "));
}

pub fn info(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn error_detail(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Captured stderr of a failed command, surfaced verbatim line by line.
pub fn emit_stderr(text: &str) {
    for line in text.lines() {
        eprintln!("{} {}", style("|").dim(), line);
    }
}
