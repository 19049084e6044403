use arch::Reg;
use x86asm::{assemble, execute, execute_with, Halt, Limits};

fn run(source: &str) -> x86asm::Execution {
    let asm = assemble(source);
    assert!(asm.success, "{:?}", asm.errors);
    let exec = execute(&asm);
    for line in &exec.output {
        println!("{line}");
    }
    exec
}

#[test]
fn infinite_loop_hits_cap() {
    let exec = run("loop1: jmp loop1\n");
    assert!(exec.success);
    assert_eq!(exec.halt, Halt::StepLimit);
    assert_eq!(exec.instructions_executed, 1000);
    assert_eq!(exec.output.last().map(String::as_str), Some("Execution limit reached (1000 instructions)"));
}

#[test]
fn custom_limit() {
    let asm = assemble("top: jmp top\n");
    let exec = execute_with(&asm, &Limits { max_steps: 10 });
    assert_eq!(exec.instructions_executed, 10);
    assert_eq!(exec.output.len(), 11);
}

#[test]
fn hello_console() {
    let exec = run(".data\nmsg db 'Hi',0dh,0ah,'$'\n.code\nmov ax, @data\nmov ds, ax\nmov ah, 09h\nmov dx, offset msg\nint 21h\nmov ah, 4ch\nint 21h\nend\n");
    assert_eq!(exec.console, "Hi\r\n");
    assert_eq!(exec.halt, Halt::Terminated);
    assert_eq!(exec.instructions_executed, 7);
    assert_eq!(exec.output[0], "[0100] mov ax, @data -> AX = 0000h");
    assert_eq!(&exec.memory[..5], b"Hi\r\n$");
}

#[test]
fn count_down_loop() {
    let exec = run("mov cx, 3\nmov ax, 0\nagain: add ax, 2\nsub cx, 1\ncmp cx, 0\njne again\n");
    assert_eq!(exec.registers[&Reg::AX], 6);
    assert_eq!(exec.registers[&Reg::CX], 0);
    assert_eq!(exec.halt, Halt::EndOfProgram);
}

#[test]
fn call_and_return() {
    let exec = run("call twice\nmov ah, 4ch\nint 21h\ntwice: mov bx, 2\nadd bx, bx\nret\n");
    assert_eq!(exec.registers[&Reg::BX], 4);
    assert_eq!(exec.registers[&Reg::SP], 0xFFFE);
    assert_eq!(exec.halt, Halt::Terminated);
}

#[test]
fn print_chars() {
    let exec = run("mov ah, 2\nmov dl, 'O'\nint 21h\nmov dl, 'K'\nint 21h\nint 20h\n");
    assert_eq!(exec.console, "OK");
}

#[test]
fn failed_assembly_does_not_run() {
    let asm = assemble("bogus line\nmov ax, 1\n");
    let exec = execute(&asm);
    assert!(!exec.success);
    assert_eq!(exec.halt, Halt::NotAssembled);
    assert_eq!(exec.instructions_executed, 0);
    assert_eq!(exec.errors, vec!["Line 1: Unknown instruction or directive".to_string()]);
}

#[test]
fn fresh_state_per_run() {
    let asm = assemble("add ax, 1\n");
    let first = execute(&asm);
    let second = execute(&asm);
    assert_eq!(first.registers[&Reg::AX], 1);
    assert_eq!(second.registers[&Reg::AX], 1);
}
