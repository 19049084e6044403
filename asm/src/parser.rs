use arch::inst::{is_ident, parse_number};
use arch::{Inst, Mnemonic, Operand};
use serde::Serialize;

// ----------------------------------------------------------------------------
// Line

/// One source line split into its optional label and statement.
#[derive(Debug, Clone)]
pub struct Line {
    /// 1-based line number
    pub no: usize,
    pub raw: String,
    pub label: Option<String>,
    pub stmt: Option<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Directive(Directive),
    Code(Inst),
    Unknown(String),
}

impl Line {
    pub fn parse(no: usize, raw: &str) -> Line {
        let code = strip_comment(raw).trim();

        let (label, body) = match split_label(code) {
            Some((label, rest)) => (Some(label.to_string()), rest.trim()),
            None => (None, code),
        };

        let stmt = if body.is_empty() {
            None
        } else if let Some(directive) = parse_directive(body) {
            Some(Stmt::Directive(directive))
        } else if let Some(inst) = parse_instruction(body) {
            Some(Stmt::Code(inst))
        } else {
            Some(Stmt::Unknown(body.to_string()))
        };

        Line {
            no,
            raw: raw.to_string(),
            label,
            stmt,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.is_none() && self.stmt.is_none()
    }

    /// Source text without the trailing comment, as shown in listings.
    pub fn source(&self) -> &str {
        strip_comment(&self.raw).trim()
    }
}

// ----------------------------------------------------------------------------
// Directive

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    Db,
    Dw,
    Dd,
}

impl Width {
    fn parse(s: &str) -> Option<Width> {
        match s.to_ascii_lowercase().as_str() {
            "db" => Some(Width::Db),
            "dw" => Some(Width::Dw),
            "dd" => Some(Width::Dd),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Width::Db => 1,
            Width::Dw => 2,
            Width::Dd => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataItem {
    Text(String),
    Value(u16),
    /// `?`
    Uninit,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Directive {
    Model(String),
    Code,
    Data,
    Stack(Option<u16>),
    Define {
        name: Option<String>,
        width: Width,
        items: Vec<DataItem>,
    },
    /// `name proc` opens a procedure; `name` becomes a code label.
    Proc(String),
    Endp(String),
    End(Option<String>),
}

impl Directive {
    /// Bytes laid down by a data definition. Strings emit one unit per
    /// character; invalid items still occupy one zeroed unit.
    pub fn data(&self) -> Vec<u8> {
        let Directive::Define { width, items, .. } = self else {
            return vec![];
        };
        let unit = |v: u16| {
            let mut bytes = (v as u32).to_le_bytes().to_vec();
            bytes.truncate(width.bytes());
            bytes
        };
        items
            .iter()
            .flat_map(|item| match item {
                DataItem::Text(text) => text.bytes().flat_map(|b| unit(b as u16)).collect(),
                DataItem::Value(v) => unit(*v),
                DataItem::Uninit | DataItem::Invalid(_) => vec![0; width.bytes()],
            })
            .collect()
    }

    pub fn invalid_items(&self) -> Vec<&str> {
        match self {
            Directive::Define { items, .. } => items
                .iter()
                .filter_map(|item| match item {
                    DataItem::Invalid(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }
}

/// Classifies `.model`, `.code`, `.data`, `.stack`, `db/dw/dd`, `proc/endp`
/// and `end` lines. Returns `None` for anything else.
pub fn parse_directive(line: &str) -> Option<Directive> {
    let line = strip_comment(line).trim();
    let (head, rest) = split_word(line);
    let rest = rest.trim();

    match head.to_ascii_lowercase().as_str() {
        ".model" => return Some(Directive::Model(rest.to_string())),
        ".code" => return Some(Directive::Code),
        ".data" => return Some(Directive::Data),
        ".stack" => return Some(Directive::Stack(parse_number(rest))),
        "end" => {
            let entry = split_word(rest).0;
            let entry = (!entry.is_empty()).then(|| entry.to_string());
            return Some(Directive::End(entry));
        }
        _ => {}
    }

    if let Some(width) = Width::parse(head) {
        return Some(Directive::Define {
            name: None,
            width,
            items: parse_items(rest),
        });
    }

    // msg db 'Hello', 0dh, 0ah, '$'
    let (second, items) = split_word(rest);
    if !is_ident(head) {
        return None;
    }
    if let Some(width) = Width::parse(second) {
        return Some(Directive::Define {
            name: Some(head.to_string()),
            width,
            items: parse_items(items.trim()),
        });
    }
    match second.to_ascii_lowercase().as_str() {
        "proc" => Some(Directive::Proc(head.to_string())),
        "endp" => Some(Directive::Endp(head.to_string())),
        _ => None,
    }
}

fn parse_items(text: &str) -> Vec<DataItem> {
    split_outside_quotes(text, ',')
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let quoted = item.len() >= 2
                && (item.starts_with('\'') && item.ends_with('\'')
                    || item.starts_with('"') && item.ends_with('"'));
            if item.len() > 3 && quoted {
                DataItem::Text(item[1..item.len() - 1].to_string())
            } else if item == "?" {
                DataItem::Uninit
            } else if let Some(v) = parse_number(item) {
                DataItem::Value(v)
            } else if quoted {
                DataItem::Text(item[1..item.len() - 1].to_string())
            } else {
                DataItem::Invalid(item.to_string())
            }
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Instruction

/// Parses `mnemonic operand, operand`. Unknown mnemonics return `None`.
pub fn parse_instruction(line: &str) -> Option<Inst> {
    let line = strip_comment(line).trim();
    let (head, rest) = split_word(line);
    let mnemonic = Mnemonic::parse(head)?;
    let operands = split_outside_quotes(rest, ',')
        .into_iter()
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(Operand::parse)
        .collect();
    Some(Inst::new(mnemonic, operands))
}

// ----------------------------------------------------------------------------
// Helpers

/// `name:` at the start of a line
fn split_label(code: &str) -> Option<(&str, &str)> {
    let (head, rest) = code.split_once(':')?;
    let head = head.trim();
    is_ident(head).then_some((head, rest))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

pub fn strip_comment(raw: &str) -> &str {
    let mut quote = None;
    for (idx, ch) in raw.char_indices() {
        match (quote, ch) {
            (None, ';') => return &raw[..idx],
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if q == c => quote = None,
            _ => {}
        }
    }
    raw
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<&str> {
    let mut parts = vec![];
    let mut quote = None;
    let mut start = 0;
    for (idx, ch) in s.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if q == c => quote = None,
            (None, c) if c == sep => {
                parts.push(&s[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives() {
        assert_eq!(parse_directive(".model small"), Some(Directive::Model("small".into())));
        assert_eq!(parse_directive(".CODE"), Some(Directive::Code));
        assert_eq!(parse_directive(".data"), Some(Directive::Data));
        assert_eq!(parse_directive(".stack 100h"), Some(Directive::Stack(Some(0x100))));
        assert_eq!(parse_directive("end"), Some(Directive::End(None)));
        assert_eq!(parse_directive("end start"), Some(Directive::End(Some("start".into()))));
        assert_eq!(parse_directive("main proc"), Some(Directive::Proc("main".into())));
        assert_eq!(parse_directive("main ENDP"), Some(Directive::Endp("main".into())));
        assert_eq!(parse_directive("mov ax, 1"), None);
        assert_eq!(parse_directive("hello world"), None);
    }

    #[test]
    fn data_definition() {
        let directive = parse_directive("msg db 'Hi; there',0dh,0ah,'$' ; comment").unwrap();
        match &directive {
            Directive::Define { name, width, items } => {
                assert_eq!(name.as_deref(), Some("msg"));
                assert_eq!(*width, Width::Db);
                assert_eq!(items.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(directive.data(), b"Hi; there\r\n$".to_vec());
    }

    #[test]
    fn word_data() {
        let directive = parse_directive("dw 1234h, ?, 'A'").unwrap();
        assert_eq!(directive.data(), vec![0x34, 0x12, 0x00, 0x00, 0x41, 0x00]);
        let directive = parse_directive("big dd 1").unwrap();
        assert_eq!(directive.data(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn invalid_data() {
        let directive = parse_directive("x db 1, foo+").unwrap();
        assert_eq!(directive.invalid_items(), vec!["foo+"]);
        assert_eq!(directive.data(), vec![1, 0]);
    }

    #[test]
    fn instructions() {
        let inst = parse_instruction("MOV AH, 09h").unwrap();
        assert_eq!(inst.mnemonic, Mnemonic::Mov);
        assert_eq!(inst.opcode, 0xB4);
        assert_eq!(parse_instruction("ret").unwrap().operands.len(), 0);
        assert!(parse_instruction("lea dx, msg").is_none());
        let inst = parse_instruction("mov dl, ','").unwrap();
        assert_eq!(inst.src(), Some(&Operand::Immediate(b',' as u16)));
    }

    #[test]
    fn lines() {
        let line = Line::parse(3, "start: mov ax, 1 ; init");
        assert_eq!(line.label.as_deref(), Some("start"));
        assert!(matches!(line.stmt, Some(Stmt::Code(_))));
        assert_eq!(line.source(), "start: mov ax, 1");

        let line = Line::parse(4, "done:");
        assert_eq!(line.label.as_deref(), Some("done"));
        assert!(line.stmt.is_none());

        assert!(Line::parse(5, "   ; only a comment").is_blank());
        assert!(matches!(Line::parse(6, "foo bar").stmt, Some(Stmt::Unknown(_))));
    }
}
