use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Assembler,
    Pascal,
}

impl EngineKind {
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.to_ascii_lowercase().as_str() {
            "asm" | "assembler" | "tasm" | "masm" => Ok(EngineKind::Assembler),
            "pascal" | "pas" | "tp" => Ok(EngineKind::Pascal),
            _ => Err(Error::UnknownEngine(name.to_string())),
        }
    }

    /// Engine for a source file, by extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "asm" => Some(EngineKind::Assembler),
            "pas" => Some(EngineKind::Pascal),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            EngineKind::Assembler => "asm",
            EngineKind::Pascal => "pas",
        }
    }

    pub fn banner(&self) -> String {
        match self {
            EngineKind::Assembler => x86asm::display_header(),
            EngineKind::Pascal => tpas::display_header(),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Assembler => write!(f, "assembler"),
            EngineKind::Pascal => write!(f, "pascal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse {
        ($name:ident, $input:expr, $expect:expr) => {
            #[test]
            fn $name() {
                assert_eq!(EngineKind::parse($input).ok(), $expect);
            }
        };
    }

    test_parse!(asm, "asm", Some(EngineKind::Assembler));
    test_parse!(tasm_upper, "TASM", Some(EngineKind::Assembler));
    test_parse!(masm, "masm", Some(EngineKind::Assembler));
    test_parse!(pascal, "pascal", Some(EngineKind::Pascal));
    test_parse!(tp, "tp", Some(EngineKind::Pascal));
    test_parse!(unknown, "cobol", None);

    #[test]
    fn by_extension() {
        assert_eq!(EngineKind::from_path(Path::new("hello.ASM")), Some(EngineKind::Assembler));
        assert_eq!(EngineKind::from_path(Path::new("calc.pas")), Some(EngineKind::Pascal));
        assert_eq!(EngineKind::from_path(Path::new("notes.txt")), None);
    }
}
