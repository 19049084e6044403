use std::path::Path;

use crate::emulator::Emulator;
use crate::engine::EngineKind;
use crate::error::Error;

/// Outcome of one shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Run one terminal-style command against the emulator
pub fn command(emu: &mut Emulator, line: &str) -> Result<Reply, Error> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(Reply::Text(String::new()));
    };
    let arg = words.next();

    let text = match (cmd.to_ascii_lowercase().as_str(), arg) {
        ("exit" | "quit", _) => return Ok(Reply::Quit),
        ("help", Some(name)) => emu.help(Some(EngineKind::parse(name)?)),
        ("help", None) => emu.help(None),
        ("engine", Some(name)) => emu.initialize(EngineKind::parse(name)?),
        ("load", Some(name)) => {
            if emu.engine().is_none() {
                if let Some(kind) = EngineKind::from_path(Path::new(name)) {
                    emu.initialize(kind);
                }
            }
            let text = emu.load_file(name)?;
            format!("Loaded {name} ({} bytes)", text.len())
        }
        ("save", Some(name)) => {
            let source = emu.source().ok_or(Error::NoSource)?.to_string();
            emu.save_file(name, &source)?;
            format!("Saved {name}")
        }
        ("compile", None) => {
            let source = emu.source().ok_or(Error::NoSource)?.to_string();
            emu.compile(&source)?.text
        }
        ("execute", None) => emu.execute()?.text,
        ("run", None) => {
            let source = emu.source().ok_or(Error::NoSource)?.to_string();
            emu.compile_and_execute(&source)?.text
        }
        ("ls" | "dir" | "list", None) => {
            let files = emu.list_files()?;
            if files.is_empty() {
                "No files".to_string()
            } else {
                files
                    .iter()
                    .map(|file| format!("{:<24} {:>8}  {}", file.name, file.size, file.extension))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ("sample", Some(name)) => {
            let kind = emu.engine().ok_or(Error::NoEngine)?;
            emu.create_sample(kind, name)?
        }
        (name, None) => match EngineKind::parse(name) {
            Ok(kind) => emu.initialize(kind),
            Err(_) => format!("Unknown command '{cmd}'. Type 'help' for usage"),
        },
        _ => format!("Unknown command '{cmd}'. Type 'help' for usage"),
    };
    Ok(Reply::Text(text))
}
