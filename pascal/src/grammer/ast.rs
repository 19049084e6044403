use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub consts: Vec<(String, Expr)>,
    pub vars: Vec<(String, Type)>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer, // "integer" | "longint" | "word" | "byte" | "shortint"
    Real,    // "real" | "double" | "single"
    Boolean, // "boolean"
    Char,    // "char"
    String,  // "string"
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Integer => "integer",
            Type::Real => "real",
            Type::Boolean => "boolean",
            Type::Char => "char",
            Type::String => "string",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty,                                       //
    Compound(Vec<Stmt>),                         // "begin" stmts "end"
    Assign(String, Expr),                        // ident ":=" expr
    Write(bool, Vec<WriteArg>),                  // ( "write" | "writeln" ) [ "(" args ")" ]
    Read(bool, Vec<String>),                     // ( "read" | "readln" ) [ "(" idents ")" ]
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),      // "if" expr "then" stmt [ "else" stmt ]
    While(Expr, Box<Stmt>),                      // "while" expr "do" stmt
    For(String, Expr, Expr, bool, Box<Stmt>),    // "for" ident ":=" expr ( "to" | "downto" ) expr "do" stmt
    Repeat(Vec<Stmt>, Expr),                     // "repeat" stmts "until" expr
    Case(Expr, Vec<CaseArm>, Option<Box<Stmt>>), // "case" expr "of" arms [ "else" stmt ] "end"
}

impl Stmt {
    /// Number of simple statements, counting nested ones.
    pub fn count(&self) -> usize {
        match self {
            Stmt::Empty => 0,
            Stmt::Compound(stmts) => stmts.iter().map(Stmt::count).sum(),
            Stmt::Assign(..) | Stmt::Write(..) | Stmt::Read(..) => 1,
            Stmt::If(_, then, other) => 1 + then.count() + other.as_ref().map_or(0, |s| s.count()),
            Stmt::While(_, body) | Stmt::For(_, _, _, _, body) => 1 + body.count(),
            Stmt::Repeat(body, _) => 1 + body.iter().map(Stmt::count).sum::<usize>(),
            Stmt::Case(_, arms, other) => {
                1 + arms.iter().map(|arm| arm.body.count()).sum::<usize>()
                    + other.as_ref().map_or(0, |s| s.count())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteArg {
    pub expr: Expr,
    pub width: Option<Expr>,
    pub decimals: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub labels: Vec<CaseLabel>,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    Value(Expr),       // expr
    Range(Expr, Expr), // expr ".." expr
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryOp, Box<Expr>, Box<Expr>), // expr (binop) expr
    Unary(UnaryOp, Box<Expr>),              // ( "+" | "-" | "not" ) expr
    Call(String, Vec<Expr>),                // ident "(" [ expr { "," expr } ] ")"
    Ident(String),                          // ident
    Integer(i64),                           // int-lit
    Real(f64),                              // real-lit
    Text(String),                           // string-lit
    Bool(bool),                             // "true" | "false"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos, // "+"
    Neg, // "-"
    Not, // "not"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // "+"
    Sub,    // "-"
    Mul,    // "*"
    Div,    // "/"
    IntDiv, // "div"
    Mod,    // "mod"
    And,    // "and"
    Or,     // "or"
    Eq,     // "="
    Ne,     // "<>"
    Lt,     // "<"
    Le,     // "<="
    Gt,     // ">"
    Ge,     // ">="
}
