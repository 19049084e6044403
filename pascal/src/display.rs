use std::fmt::Write;

use crate::compile::{Compilation, Execution};

pub fn display_header() -> String {
    [
        "Turbo Pascal subset",
        "Compiler and interpreter for integer, real, boolean, char and string programs",
        "Type 'help' for usage",
    ]
    .join("\n")
}

pub fn display_results(compilation: &Compilation) -> String {
    let mut out = String::new();
    if compilation.success {
        let _ = writeln!(out, "Compilation successful");
        let _ = writeln!(out, "Statements: {}", compilation.statement_count);
    } else {
        let _ = writeln!(out, "Compilation failed with {} error(s)", compilation.errors.len());
        for error in &compilation.errors {
            let _ = writeln!(out, "{error}");
        }
    }
    out.trim_end().to_string()
}

pub fn display_execution_results(exec: &Execution) -> String {
    let mut out = String::new();
    if !exec.output.is_empty() {
        let _ = writeln!(out, "Program output:");
        for line in &exec.output {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Statements executed: {}", exec.statements_executed);
    if !exec.errors.is_empty() {
        let _ = writeln!(out, "\nRuntime errors:");
        for error in &exec.errors {
            let _ = writeln!(out, "{error}");
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, execute};

    #[test]
    fn successful_report() {
        let compilation = compile("program T; begin writeln('hi'); writeln('there') end.");
        assert_eq!(display_results(&compilation), "Compilation successful\nStatements: 2");
    }

    #[test]
    fn failed_report() {
        let compilation = compile("program T; begin writeln('hi');");
        let text = display_results(&compilation);
        assert!(text.starts_with("Compilation failed with 1 error(s)"));
        assert!(text.contains("Missing 'end.'"));
    }

    #[test]
    fn execution_report() {
        let exec = execute(&compile("program T; begin writeln('hi') end."));
        assert_eq!(
            display_execution_results(&exec),
            "Program output:\nhi\n\nStatements executed: 1"
        );
    }

    #[test]
    fn runtime_error_report() {
        let exec = execute(&compile("program T; var x: integer; begin x := 1 div 0 end."));
        let text = display_execution_results(&exec);
        assert!(text.contains("Runtime errors:\nDivision by zero"));
    }
}
