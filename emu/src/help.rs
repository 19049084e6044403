use crate::engine::EngineKind;

const GENERAL: &str = "\
Commands:
  asm | pascal         select an engine
  load <file>          read a file from the workspace
  save <file>          write the current source to the workspace
  compile              compile the current source
  execute              run the last compilation
  run                  compile and run the current source
  ls                   list workspace files
  sample <name>        write a sample program for the current engine
  help                 show this text
  exit                 leave the shell";

const ASSEMBLER: &str = "\
x86 assembler
  Directives : .model .stack .data .code db dw dd proc endp end
  Instructions: mov add sub cmp jmp je jne call ret int push pop
  Registers  : ax bx cx dx si di sp bp (al..dh) cs ds es ss
  Immediates : 10, 0Ah, 0x0A, 1010b, 'A'
  DOS (int 21h): ah=02h print dl, ah=09h print $-string at dx, ah=4Ch exit
  Execution stops after 1000 instructions by default
  Samples    : hello, add, factorial";

const PASCAL: &str = "\
Turbo Pascal subset
  program Name; [const ...] [var ...] begin ... end.
  Types      : integer real boolean char string
  Statements : := write writeln read readln if while for repeat case begin..end
  Operators  : + - * / div mod and or not = <> < <= > >=
  Functions  : abs sqr sqrt trunc round odd ord chr length
  read/readln assign the default value (no input stream)
  Execution stops after 10000 steps by default
  Samples    : hello, factorial, calculator";

/// Usage text for an engine, or the shell commands when none is given
pub fn help(kind: Option<EngineKind>) -> String {
    match kind {
        None => GENERAL.to_string(),
        Some(EngineKind::Assembler) => format!("{ASSEMBLER}\n\n{GENERAL}"),
        Some(EngineKind::Pascal) => format!("{PASCAL}\n\n{GENERAL}"),
    }
}
