use crate::engine::EngineKind;
use crate::error::Error;

const ASM_HELLO: &str = "\
; Print a greeting through DOS
.model small
.stack 100h
.data
msg db 'Hello, World!', 0dh, 0ah, '$'
.code
main proc
    mov ax, @data
    mov ds, ax
    mov ah, 09h
    mov dx, offset msg
    int 21h
    mov ah, 4ch
    int 21h
main endp
end main
";

const ASM_ADD: &str = "\
; Add two numbers and print the digit
.model small
.stack 100h
.code
main proc
    mov al, 3
    add al, 4
    add al, '0'
    mov dl, al
    mov ah, 02h
    int 21h
    mov ah, 4ch
    int 21h
main endp
end main
";

const ASM_FACTORIAL: &str = "\
; 5! by repeated addition, result left in BX (0078h)
.model small
.stack 100h
.code
main proc
    mov ax, 1
    mov cx, 2
outer:
    mov bx, ax
    mov dx, cx
    sub dx, 1
inner:
    add ax, bx
    sub dx, 1
    cmp dx, 0
    jne inner
    add cx, 1
    cmp cx, 6
    jne outer
    mov bx, ax
    mov ah, 4ch
    int 21h
main endp
end main
";

const PAS_HELLO: &str = "\
program Hello;
begin
  writeln('Hello, World!');
end.
";

const PAS_FACTORIAL: &str = "\
program Factorial;
var
  i, n: integer;
  fact: longint;
begin
  n := 10;
  fact := 1;
  for i := 1 to n do
    fact := fact * i;
  writeln('Factorial of ', n, ' is ', fact);
end.
";

const PAS_CALCULATOR: &str = "\
program Calculator;
var
  a, b: integer;
  x: real;
begin
  a := 17;
  b := 5;
  writeln(a, ' + ', b, ' = ', a + b);
  writeln(a, ' - ', b, ' = ', a - b);
  writeln(a, ' * ', b, ' = ', a * b);
  writeln(a, ' div ', b, ' = ', a div b);
  writeln(a, ' mod ', b, ' = ', a mod b);
  x := a / b;
  writeln(a, ' / ', b, ' = ', x:0:2);
end.
";

const ASM_SAMPLES: &[(&str, &str)] = &[
    ("hello", ASM_HELLO),
    ("add", ASM_ADD),
    ("factorial", ASM_FACTORIAL),
];

const PAS_SAMPLES: &[(&str, &str)] = &[
    ("hello", PAS_HELLO),
    ("factorial", PAS_FACTORIAL),
    ("calculator", PAS_CALCULATOR),
];

fn table(kind: EngineKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        EngineKind::Assembler => ASM_SAMPLES,
        EngineKind::Pascal => PAS_SAMPLES,
    }
}

pub fn names(kind: EngineKind) -> Vec<&'static str> {
    table(kind).iter().map(|(name, _)| *name).collect()
}

pub fn sample(kind: EngineKind, name: &str) -> Result<&'static str, Error> {
    table(kind)
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, text)| *text)
        .ok_or_else(|| Error::UnknownSample(name.to_string(), names(kind).join(", ")))
}
