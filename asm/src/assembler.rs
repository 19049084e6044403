use arch::{Inst, Operand};
use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::label::{LabelType, Labels};
use crate::parser::{Directive, Line, Stmt};

/// Load address of the first instruction (`.com` style origin).
pub const ORIGIN: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    None,
    Code,
    Data,
}

/// One assembled instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectCode {
    pub address: u16,
    pub bytes: Vec<u8>,
    /// Declared size. Drives addressing even when `bytes` differs in length.
    pub size: u16,
    pub source: String,
    pub line: usize,
    pub inst: Inst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub success: bool,
    pub object_code: Vec<ObjectCode>,
    pub errors: Vec<Error>,
    pub warnings: Vec<Error>,
    pub labels: Labels,
    /// Data area image, placed at offset 0 of memory.
    pub data: Vec<u8>,
    /// Label named by `end <label>`.
    pub entry: Option<String>,
}

impl Assembly {
    /// Address execution starts from: the `end` label when it resolves,
    /// otherwise the origin.
    pub fn entry_point(&self) -> u16 {
        self.entry
            .as_deref()
            .and_then(|name| self.labels.get_val(name))
            .unwrap_or(ORIGIN)
    }
}

pub fn assemble(source: &str) -> Assembly {
    let lines: Vec<Line> = source
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::parse(idx + 1, raw))
        .filter(|line| !line.is_blank())
        .collect();

    let mut errors = vec![];
    let mut warnings = vec![];

    // ------------------------------------------------------------------------
    // Pass 1: collect labels

    let mut labels = Labels::new();
    let mut data = vec![];
    let mut entry = None;
    let mut end_line = 0;
    let mut segment = Segment::None;
    let mut addr = ORIGIN;

    for line in &lines {
        if let Some(name) = &line.label {
            // `msg: db ...` names the data, not the next instruction
            let (kind, at) = match &line.stmt {
                Some(Stmt::Directive(Directive::Define { name: None, .. })) => (LabelType::Data, data.len() as u16),
                _ => (LabelType::Code, addr),
            };
            define(&mut labels, &mut warnings, name, kind, at, line.no);
        }
        match &line.stmt {
            Some(Stmt::Code(inst)) => addr = addr.wrapping_add(inst.size),
            Some(Stmt::Directive(directive)) => match directive {
                Directive::Code => segment = Segment::Code,
                Directive::Data => segment = Segment::Data,
                Directive::Define { name, .. } => {
                    if let Some(name) = name {
                        define(&mut labels, &mut warnings, name, LabelType::Data, data.len() as u16, line.no);
                    }
                    for item in directive.invalid_items() {
                        warnings.push(Error::InvalidData(line.no, item.to_string()));
                    }
                    data.extend(directive.data());
                }
                Directive::Proc(name) => {
                    define(&mut labels, &mut warnings, name, LabelType::Code, addr, line.no);
                }
                Directive::End(name) => {
                    entry = name.clone();
                    end_line = line.no;
                }
                Directive::Model(_) | Directive::Stack(_) | Directive::Endp(_) => {}
            },
            Some(Stmt::Unknown(_)) => errors.push(Error::UnknownLine(line.no)),
            None => {}
        }
    }
    debug!(
        labels = labels.len(),
        data = data.len(),
        end = addr,
        ?segment,
        "pass 1 done"
    );

    // ------------------------------------------------------------------------
    // Pass 2: emit object code

    let mut object_code = vec![];
    let mut addr = ORIGIN;
    for line in &lines {
        let Some(Stmt::Code(inst)) = &line.stmt else {
            continue;
        };
        for operand in &inst.operands {
            match operand {
                Operand::Label(name) if labels.get(name).is_none() => {
                    warnings.push(Error::UndefinedLabel(line.no, name.clone()));
                }
                Operand::Memory(text) => {
                    warnings.push(Error::UnsupportedOperand(line.no, text.clone()));
                }
                _ => {}
            }
        }
        if let (Some(Operand::Register(dst)), Some(Operand::Immediate(v))) = (inst.dst(), inst.src()) {
            // Negative bytes arrive sign-extended, e.g. `-1` as FFFFh
            if !dst.is_word() && *v > 0xFF && *v < 0xFF80 {
                warnings.push(Error::ByteOverflow(line.no, *v));
            }
        }
        object_code.push(ObjectCode {
            address: addr,
            bytes: inst.encode(|name| labels.get_val(name)),
            size: inst.size,
            source: line.source().to_string(),
            line: line.no,
            inst: inst.clone(),
        });
        addr = addr.wrapping_add(inst.size);
    }

    if let Some(name) = &entry {
        if labels.get(name).is_none() {
            warnings.push(Error::UndefinedLabel(end_line, name.clone()));
        }
    }
    if object_code.is_empty() {
        warnings.push(Error::NoInstructions);
    }
    debug!(
        records = object_code.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "pass 2 done"
    );

    Assembly {
        success: errors.is_empty(),
        object_code,
        errors,
        warnings,
        labels,
        data,
        entry,
    }
}

fn define(labels: &mut Labels, warnings: &mut Vec<Error>, name: &str, kind: LabelType, addr: u16, line: usize) {
    if let Some(prev) = labels.insert(name.to_string(), kind, addr, line) {
        warnings.push(Error::RedefinedLabel(line, name.to_string(), prev.line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_reference() {
        let asm = assemble("jmp done\nmov ax, 1\ndone: ret\n");
        assert!(asm.success);
        assert_eq!(asm.labels.get_val("done"), Some(0x0105));
        assert_eq!(asm.object_code[0].bytes, vec![0xEB, 0x05, 0x01]);
    }

    #[test]
    fn data_labels() {
        let asm = assemble(".data\na db 1, 2\nb dw 3\n.code\nmov dx, offset b\n");
        assert_eq!(asm.data, vec![1, 2, 3, 0]);
        assert_eq!(asm.labels.get("b").map(|l| (l.kind, l.addr)), Some((LabelType::Data, 2)));
        assert_eq!(asm.object_code[0].bytes, vec![0xBA, 0x02, 0x00]);
    }

    #[test]
    fn colon_label_on_data() {
        let asm = assemble(".data\nmsg: db 'x'\n.code\nmov dx, offset msg\n");
        assert!(asm.success);
        assert_eq!(asm.labels.get("msg").map(|l| (l.kind, l.addr)), Some((LabelType::Data, 0)));
        assert_eq!(asm.object_code[0].bytes, vec![0xBA, 0x00, 0x00]);
    }

    #[test]
    fn colon_label_on_code() {
        let asm = assemble("ret\nnext: mov ax, 1\n");
        assert_eq!(asm.labels.get("next").map(|l| (l.kind, l.addr)), Some((LabelType::Code, 0x0101)));
    }

    #[test]
    fn byte_overflow() {
        let asm = assemble("mov al, 300\nmov bl, 255\nmov cl, -1\nadd dh, 1000h\nmov ax, 300\n");
        assert!(asm.success);
        assert_eq!(
            asm.warnings,
            vec![Error::ByteOverflow(1, 300), Error::ByteOverflow(4, 0x1000)]
        );
        assert_eq!(asm.warnings[0].to_string(), "Line 1: Immediate 12Ch does not fit in a byte register");
    }

    #[test]
    fn redefined_label() {
        let asm = assemble("x: ret\nx: ret\n");
        assert!(asm.success);
        assert_eq!(asm.warnings, vec![Error::RedefinedLabel(2, "x".into(), 1)]);
        assert_eq!(asm.labels.get_val("x"), Some(0x0101));
    }

    #[test]
    fn undefined_label() {
        let asm = assemble("jmp nowhere\n");
        assert!(asm.success);
        assert_eq!(asm.warnings, vec![Error::UndefinedLabel(1, "nowhere".into())]);
        assert_eq!(asm.object_code[0].bytes, vec![0xEB, 0x00]);
    }

    #[test]
    fn empty_source() {
        let asm = assemble("; nothing\n\n");
        assert!(asm.success);
        assert!(asm.object_code.is_empty());
        assert_eq!(asm.warnings, vec![Error::NoInstructions]);
    }

    #[test]
    fn unknown_lines_are_collected() {
        let asm = assemble("foo\nmov ax, 1\nbar baz\n");
        assert!(!asm.success);
        assert_eq!(asm.errors, vec![Error::UnknownLine(1), Error::UnknownLine(3)]);
        assert_eq!(asm.object_code.len(), 1);
    }

    #[test]
    fn proc_and_entry() {
        let asm = assemble("ret\nmain proc\nmov ax, 1\nmain endp\nend main\n");
        assert!(asm.success);
        assert_eq!(asm.labels.get_val("main"), Some(0x0101));
        assert_eq!(asm.entry_point(), 0x0101);
    }
}
