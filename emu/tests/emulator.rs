use std::path::PathBuf;

use retroemu::shell::{self, Reply};
use retroemu::{Config, Emulator, EngineKind, Error, Stage};

/// Fresh emulator over its own temporary workspace
fn setup(test: &str) -> (Emulator, PathBuf) {
    let dir = std::env::temp_dir().join(format!("retroemu-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = Config {
        workspace: dir.clone(),
        ..Config::default()
    };
    (Emulator::new(config), dir)
}

#[test]
fn starts_uninitialized() {
    let (emu, _) = setup("uninit");
    assert_eq!(emu.stage(), Stage::Uninitialized);
    assert_eq!(emu.engine(), None);
}

#[test]
fn compile_requires_engine() {
    let (mut emu, _) = setup("noengine");
    assert!(matches!(emu.compile("mov ax, 1"), Err(Error::NoEngine)));
}

#[test]
fn execute_before_compile() {
    let (mut emu, _) = setup("notcompiled");
    emu.initialize(EngineKind::Pascal);
    assert!(matches!(emu.execute(), Err(Error::NotCompiled)));
}

#[test]
fn initialize_returns_banner() {
    let (mut emu, _) = setup("banner");
    let banner = emu.initialize(EngineKind::Assembler);
    assert!(banner.starts_with("x86 Assembler"));
    assert_eq!(emu.stage(), Stage::EngineSelected);
}

#[test]
fn stage_transitions() {
    let (mut emu, _) = setup("stages");
    emu.initialize(EngineKind::Pascal);
    emu.save_file("t.pas", "program T; begin writeln('hi') end.").unwrap();
    let source = emu.load_file("t.pas").unwrap();
    assert_eq!(emu.stage(), Stage::SourceLoaded);
    assert!(emu.compile(&source).unwrap().success);
    assert_eq!(emu.stage(), Stage::Compiled);
    let report = emu.execute().unwrap();
    assert!(report.success);
    assert!(report.text.contains("hi"));
    assert_eq!(emu.stage(), Stage::Executed);

    emu.initialize(EngineKind::Assembler);
    assert_eq!(emu.stage(), Stage::EngineSelected);
    assert_eq!(emu.source(), None);
    assert!(matches!(emu.execute(), Err(Error::NotCompiled)));
}

#[test]
fn missing_file() {
    let (mut emu, _) = setup("missing");
    let err = emu.load_file("nothing.asm").unwrap_err();
    assert_eq!(err.to_string(), "File not found: nothing.asm");
}

#[test]
fn file_names_stay_in_workspace() {
    let (mut emu, _) = setup("confine");
    assert!(matches!(emu.save_file("../escape.asm", "x"), Err(Error::InvalidFileName(_))));
    assert!(matches!(emu.load_file("/etc/hostname"), Err(Error::InvalidFileName(_))));
}

#[test]
fn list_files_sorted() {
    let (emu, _) = setup("list");
    emu.save_file("b.pas", "program B; begin end.").unwrap();
    emu.save_file("a.asm", "ret").unwrap();
    let files = emu.list_files().unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.asm", "b.pas"]);
    assert_eq!(files[0].size, 3);
    assert_eq!(files[0].extension, "asm");
    assert_eq!(files[1].extension, "pas");
}

#[test]
fn empty_workspace_lists_nothing() {
    let (emu, _) = setup("empty");
    assert!(emu.list_files().unwrap().is_empty());
}

#[test]
fn compile_and_execute_short_circuits() {
    let (mut emu, _) = setup("shortcircuit");
    emu.initialize(EngineKind::Pascal);
    let report = emu.compile_and_execute("program T; begin writeln('hi');").unwrap();
    assert!(!report.success);
    assert!(report.text.starts_with("Compilation failed"));
    assert!(!report.text.contains("Statements executed"));
}

#[test]
fn compile_and_execute_assembler() {
    let (mut emu, _) = setup("asmrun");
    emu.initialize(EngineKind::Assembler);
    let report = emu.compile_and_execute("mov ah, 2\nmov dl, 'A'\nint 21h\nint 20h\n").unwrap();
    assert!(report.success);
    assert!(report.text.contains("Assembly successful"));
    assert!(report.text.contains("Program output:\nA"));
}

#[test]
fn asm_step_limit_from_config() {
    let dir = std::env::temp_dir().join(format!("retroemu-limit-{}", std::process::id()));
    let config = Config {
        workspace: dir,
        asm_step_limit: 5,
        ..Config::default()
    };
    let mut emu = Emulator::new(config);
    emu.initialize(EngineKind::Assembler);
    let report = emu.compile_and_execute("top: jmp top\n").unwrap();
    assert!(report.text.contains("Execution limit reached (5 instructions)"));
}

#[test]
fn create_sample_writes_file() {
    let (mut emu, dir) = setup("sample");
    let text = emu.create_sample(EngineKind::Assembler, "hello").unwrap();
    assert!(text.contains("int 21h"));
    assert!(dir.join("hello.asm").is_file());

    emu.initialize(EngineKind::Assembler);
    let source = emu.load_file("hello.asm").unwrap();
    let report = emu.compile_and_execute(&source).unwrap();
    assert!(report.success);
    assert!(report.text.contains("Hello, World!"));
}

#[test]
fn unknown_sample() {
    let (emu, _) = setup("unknownsample");
    assert!(matches!(
        emu.create_sample(EngineKind::Assembler, "calculator"),
        Err(Error::UnknownSample(..))
    ));
}

#[test]
fn help_texts() {
    let (emu, _) = setup("help");
    assert!(emu.help(Some(EngineKind::Pascal)).contains("writeln"));
    assert!(emu.help(Some(EngineKind::Assembler)).contains("int 21h"));
    assert!(emu.help(None).contains("compile"));
}

#[test]
fn shell_session() {
    let (mut emu, _) = setup("shell");
    let mut say = |line: &str| match shell::command(&mut emu, line) {
        Ok(Reply::Text(text)) => text,
        Ok(Reply::Quit) => "<quit>".to_string(),
        Err(e) => format!("error: {e}"),
    };
    assert!(say("pascal").starts_with("Turbo Pascal"));
    assert_eq!(say("compile"), "error: No source loaded");
    assert!(say("sample calculator").contains("program Calculator"));
    assert_eq!(say("load calculator.pas"), format!("Loaded calculator.pas ({} bytes)", retroemu::samples::sample(EngineKind::Pascal, "calculator").unwrap().len()));
    assert!(say("run").contains("17 + 5 = 22"));
    assert!(say("ls").starts_with("calculator.pas"));
    assert_eq!(say("frobnicate"), "Unknown command 'frobnicate'. Type 'help' for usage");
    assert_eq!(say("exit"), "<quit>");
}

#[test]
fn shell_load_picks_engine() {
    let (mut emu, _) = setup("shellpick");
    emu.save_file("prog.asm", "ret\n").unwrap();
    shell::command(&mut emu, "load prog.asm").unwrap();
    assert_eq!(emu.engine(), Some(EngineKind::Assembler));
    assert_eq!(emu.stage(), Stage::SourceLoaded);
}
