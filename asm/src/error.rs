use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Line {0}: Unknown instruction or directive")]
    UnknownLine(usize),

    #[error("Line {0}: Undefined label '{1}'")]
    UndefinedLabel(usize, String),

    #[error("Line {0}: Label '{1}' redefined (first defined on line {2})")]
    RedefinedLabel(usize, String, usize),

    #[error("Line {0}: Invalid data item '{1}'")]
    InvalidData(usize, String),

    #[error("Line {0}: Unsupported operand '{1}' encoded as 00h")]
    UnsupportedOperand(usize, String),

    #[error("Line {0}: Immediate {1:X}h does not fit in a byte register")]
    ByteOverflow(usize, u16),

    #[error("No instructions found")]
    NoInstructions,
}

impl Error {
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::UnknownLine(line)
            | Error::UndefinedLabel(line, _)
            | Error::RedefinedLabel(line, _, _)
            | Error::InvalidData(line, _)
            | Error::UnsupportedOperand(line, _)
            | Error::ByteOverflow(line, _) => Some(*line),
            Error::NoInstructions => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, lines: &[&str], warn: bool) {
        if warn {
            cprintln!("<yellow,bold>warn</>: {}", self);
        } else {
            cprintln!("<red,bold>error</>: {}", self);
        }

        let Some(line_num) = self.line() else {
            return;
        };
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");

        let line_content = lines
            .get(line_num.saturating_sub(1))
            .copied()
            .unwrap_or("");

        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</>");
    }
}

impl serde::Serialize for Error {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
