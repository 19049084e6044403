use std::fmt::Write;

use color_print::cformat;

use crate::assembler::{Assembly, ObjectCode};
use crate::cpu::{Execution, Halt};
use crate::label::LabelType;

pub fn display_header() -> String {
    [
        "x86 Assembler (TASM/MASM compatible subset)",
        "Two-pass assembler with a 16-bit real mode CPU simulator",
        "Type 'help' for usage",
    ]
    .join("\n")
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl ObjectCode {
    /// `0100: B8 00 00  ; mov ax, @data`
    pub fn listing(&self) -> String {
        format!("{:04X}: {}  ; {}", self.address, hex_bytes(&self.bytes), self.source)
    }

    pub fn cformat(&self) -> String {
        cformat!(
            "<c>{:04X}</> | <y>{:<12}</> | {}",
            self.address,
            hex_bytes(&self.bytes),
            self.inst.cformat()
        )
    }
}

pub fn display_results(asm: &Assembly) -> String {
    let mut out = String::new();
    if asm.success {
        let _ = writeln!(out, "Assembly successful");
    } else {
        let _ = writeln!(out, "Assembly failed with {} error(s)", asm.errors.len());
    }

    if !asm.object_code.is_empty() {
        let _ = writeln!(out, "\nObject code:");
        let mut records: Vec<&ObjectCode> = asm.object_code.iter().collect();
        records.sort_by_key(|code| code.address);
        for code in records {
            let _ = writeln!(out, "{}", code.listing());
        }
    }

    if !asm.labels.is_empty() {
        let _ = writeln!(out, "\nSymbols:");
        for (name, label) in asm.labels.iter() {
            let kind = match label.kind {
                LabelType::Code => "code",
                LabelType::Data => "data",
            };
            let _ = writeln!(out, "{name:<16} {kind}  {:04X}h", label.addr);
        }
    }

    if !asm.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &asm.warnings {
            let _ = writeln!(out, "{warning}");
        }
    }
    if !asm.errors.is_empty() {
        let _ = writeln!(out, "\nErrors:");
        for error in &asm.errors {
            let _ = writeln!(out, "{error}");
        }
    }
    out.trim_end().to_string()
}

pub fn display_execution_results(exec: &Execution) -> String {
    let mut out = String::new();
    if !exec.success {
        let _ = writeln!(out, "Execution failed");
        for error in &exec.errors {
            let _ = writeln!(out, "{error}");
        }
        return out.trim_end().to_string();
    }

    let _ = writeln!(out, "Execution trace:");
    for line in &exec.output {
        let _ = writeln!(out, "{line}");
    }

    if !exec.console.is_empty() {
        let _ = writeln!(out, "\nProgram output:");
        let _ = writeln!(out, "{}", exec.console.trim_end_matches(['\r', '\n']));
    }

    let _ = writeln!(out, "\nRegisters:");
    for (reg, val) in &exec.registers {
        let _ = writeln!(out, "{}: {val:04X}h", reg.to_string().to_uppercase());
    }

    let halt = match exec.halt {
        Halt::Terminated => "program terminated",
        Halt::EndOfProgram => "end of program",
        Halt::StepLimit => "step limit",
        Halt::NotAssembled => "not assembled",
    };
    let _ = writeln!(out, "\nInstructions executed: {} ({halt})", exec.instructions_executed);
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, execute};

    #[test]
    fn listing_line() {
        let asm = assemble("start: mov ax, 1 ; one\n");
        assert_eq!(asm.object_code[0].listing(), "0100: B8 01 00  ; start: mov ax, 1");
        let text = display_results(&asm);
        assert!(text.starts_with("Assembly successful"));
        assert!(text.contains("start"));
    }

    #[test]
    fn failed_listing() {
        let asm = assemble("bogus\n");
        let text = display_results(&asm);
        assert!(text.contains("Assembly failed with 1 error(s)"));
        assert!(text.contains("Line 1: Unknown instruction or directive"));
    }

    #[test]
    fn register_dump() {
        let exec = execute(&assemble("mov ax, 4C00h\n"));
        let text = display_execution_results(&exec);
        assert!(text.contains("AX: 4C00h"));
        assert!(text.contains("BX: 0000h"));
        assert!(text.contains("SP: FFFEh"));
        assert!(text.contains("Instructions executed: 1 (end of program)"));
    }
}
