use super::builtin;
use super::store::Store;
use super::value::{mismatch, Value, MAX_FIELD, MAX_STRING};
use crate::error::Error;
use crate::grammer::ast::{BinaryOp, CaseLabel, Expr, Program, Stmt, UnaryOp, WriteArg};
use std::cmp::Ordering;
use tracing::trace;

/// Tree-walking interpreter state for one run
pub struct Interp {
    store: Store,
    output: Vec<String>,
    /// Text written since the last `writeln`
    line: String,
    steps: usize,
    statements: usize,
    max_steps: usize,
}

impl Interp {
    pub fn new(max_steps: usize) -> Self {
        Interp {
            store: Store::new(),
            output: Vec::new(),
            line: String::new(),
            steps: 0,
            statements: 0,
            max_steps,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        for (name, expr) in &program.consts {
            let value = self.eval(expr)?;
            self.store.define_const(name, value);
        }
        for (name, ty) in &program.vars {
            self.store.declare(name, *ty);
        }
        self.exec_block(&program.body)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Output lines, including an unterminated last line
    pub fn output(&self) -> Vec<String> {
        let mut output = self.output.clone();
        if !self.line.is_empty() {
            output.push(self.line.clone());
        }
        output
    }

    fn step(&mut self) -> Result<(), Error> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(Error::StepLimit(self.max_steps));
        }
        trace!(step = self.steps, "step");
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl Interp {
    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), Error> {
        for stmt in stmts {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Empty => return Ok(()),
            Stmt::Compound(stmts) => return self.exec_block(stmts),
            _ => {}
        }
        self.step()?;
        self.statements += 1;

        match stmt {
            Stmt::Empty | Stmt::Compound(_) => Ok(()),
            Stmt::Assign(name, expr) => {
                let value = self.eval(expr)?;
                self.store.assign(name, value)
            }
            Stmt::Write(newline, args) => {
                for arg in args {
                    let text = self.render(arg)?;
                    self.line.push_str(&text);
                }
                if *newline {
                    self.output.push(std::mem::take(&mut self.line));
                }
                Ok(())
            }
            // No input stream: variables receive their default value
            Stmt::Read(_, vars) => {
                for var in vars {
                    self.store.reset(var)?;
                }
                Ok(())
            }
            Stmt::If(cond, then, other) => {
                if self.eval(cond)?.as_bool()? {
                    self.exec(then)
                } else if let Some(other) = other {
                    self.exec(other)
                } else {
                    Ok(())
                }
            }
            Stmt::While(cond, body) => {
                loop {
                    self.step()?;
                    if !self.eval(cond)?.as_bool()? {
                        break;
                    }
                    self.exec(body)?;
                }
                Ok(())
            }
            Stmt::For(var, from, to, down, body) => {
                let from = self.eval(from)?.as_int()?;
                let to = self.eval(to)?.as_int()?;
                let mut i = from;
                loop {
                    if (*down && i < to) || (!*down && i > to) {
                        break;
                    }
                    self.step()?;
                    self.store.assign(var, Value::Integer(i))?;
                    self.exec(body)?;
                    if i == to {
                        break;
                    }
                    i = if *down { i - 1 } else { i + 1 };
                }
                Ok(())
            }
            Stmt::Repeat(body, cond) => {
                loop {
                    self.step()?;
                    self.exec_block(body)?;
                    if self.eval(cond)?.as_bool()? {
                        break;
                    }
                }
                Ok(())
            }
            Stmt::Case(selector, arms, other) => {
                let selector = self.eval(selector)?;
                for arm in arms {
                    for label in &arm.labels {
                        if self.case_matches(&selector, label)? {
                            return self.exec(&arm.body);
                        }
                    }
                }
                match other {
                    Some(other) => self.exec(other),
                    None => Ok(()),
                }
            }
        }
    }

    fn case_matches(&mut self, selector: &Value, label: &CaseLabel) -> Result<bool, Error> {
        match label {
            CaseLabel::Value(expr) => {
                let value = self.eval(expr)?;
                Ok(compare(selector, &value)? == Ordering::Equal)
            }
            CaseLabel::Range(lo, hi) => {
                let lo = self.eval(lo)?;
                let hi = self.eval(hi)?;
                Ok(compare(selector, &lo)? != Ordering::Less && compare(selector, &hi)? != Ordering::Greater)
            }
        }
    }

    fn render(&mut self, arg: &WriteArg) -> Result<String, Error> {
        let value = self.eval(&arg.expr)?;
        let width = match &arg.width {
            Some(expr) => Some(field(self.eval(expr)?.as_int()?)),
            None => None,
        };
        let decimals = match &arg.decimals {
            Some(expr) => Some(field(self.eval(expr)?.as_int()?)),
            None => None,
        };
        Ok(value.format(width, decimals))
    }
}

/// Clamp a `:width` or `:decimals` count to `0..=MAX_FIELD`
fn field(n: i64) -> usize {
    n.clamp(0, MAX_FIELD as i64) as usize
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl Interp {
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, Error> {
        match expr {
            Expr::Integer(val) => Ok(Value::Integer(*val)),
            Expr::Real(val) => Ok(Value::Real(*val)),
            Expr::Bool(val) => Ok(Value::Boolean(*val)),
            Expr::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Ok(Value::Str(text.clone())),
                }
            }
            Expr::Ident(name) => self.store.get(name).cloned(),
            Expr::Call(name, args) => {
                let args = args.iter().map(|arg| self.eval(arg)).collect::<Result<Vec<_>, _>>()?;
                builtin::call(name, &args)
            }
            Expr::Unary(op, operand) => {
                let value = self.eval(operand)?;
                unary(*op, value)
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                // Short-circuit boolean operators
                match (op, &lhs) {
                    (BinaryOp::And, Value::Boolean(false)) => return Ok(Value::Boolean(false)),
                    (BinaryOp::Or, Value::Boolean(true)) => return Ok(Value::Boolean(true)),
                    _ => {}
                }
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs)
            }
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, Error> {
    match (op, value) {
        (UnaryOp::Pos, value) if value.is_numeric() => Ok(value),
        (UnaryOp::Neg, Value::Integer(val)) => Ok(Value::Integer(val.wrapping_neg())),
        (UnaryOp::Neg, Value::Real(val)) => Ok(Value::Real(-val)),
        (UnaryOp::Not, Value::Boolean(val)) => Ok(Value::Boolean(!val)),
        (UnaryOp::Not, Value::Integer(val)) => Ok(Value::Integer(!val)),
        (UnaryOp::Not, value) => Err(mismatch("boolean", &value)),
        (_, value) => Err(mismatch("number", &value)),
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, Error> {
    use BinaryOp::*;
    match op {
        Add | Sub | Mul => {
            if op == Add {
                if let (Some(l), Some(r)) = (lhs.as_text(), rhs.as_text()) {
                    if l.chars().count() + r.chars().count() > MAX_STRING {
                        return Err(Error::StringTooLong(MAX_STRING));
                    }
                    return Ok(Value::Str(l + &r));
                }
            }
            match (&lhs, &rhs) {
                (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(match op {
                    Add => l.wrapping_add(*r),
                    Sub => l.wrapping_sub(*r),
                    _ => l.wrapping_mul(*r),
                })),
                _ => {
                    let (l, r) = (lhs.as_real()?, rhs.as_real()?);
                    Ok(Value::Real(match op {
                        Add => l + r,
                        Sub => l - r,
                        _ => l * r,
                    }))
                }
            }
        }
        Div => {
            let (l, r) = (lhs.as_real()?, rhs.as_real()?);
            if r == 0.0 {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Real(l / r))
        }
        IntDiv | Mod => {
            let (l, r) = (lhs.as_int()?, rhs.as_int()?);
            if r == 0 {
                return Err(Error::DivisionByZero);
            }
            Ok(Value::Integer(if op == IntDiv {
                l.wrapping_div(r)
            } else {
                l.wrapping_rem(r)
            }))
        }
        And | Or => match (lhs, rhs) {
            (Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(if op == And { l && r } else { l || r })),
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(if op == And { l & r } else { l | r })),
            (Value::Boolean(_), other) => Err(mismatch("boolean", &other)),
            (other, _) => Err(mismatch("boolean", &other)),
        },
        Eq | Ne | Lt | Le | Gt | Ge => {
            let ord = compare(&lhs, &rhs)?;
            Ok(Value::Boolean(match op {
                Eq => ord == Ordering::Equal,
                Ne => ord != Ordering::Equal,
                Lt => ord == Ordering::Less,
                Le => ord != Ordering::Greater,
                Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            }))
        }
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering, Error> {
    match (lhs, rhs) {
        (Value::Integer(l), Value::Integer(r)) => Ok(l.cmp(r)),
        (Value::Boolean(l), Value::Boolean(r)) => Ok(l.cmp(r)),
        (l, r) if l.is_numeric() && r.is_numeric() => {
            let (l, r) = (l.as_real()?, r.as_real()?);
            l.partial_cmp(&r)
                .ok_or_else(|| Error::TypeMismatch("cannot compare NaN".to_string()))
        }
        (l, r) => match (l.as_text(), r.as_text()) {
            (Some(l), Some(r)) => Ok(l.cmp(&r)),
            _ => Err(Error::TypeMismatch(format!(
                "cannot compare {} with {}",
                l.type_of(),
                r.type_of()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_binary {
        ($name:ident, $op:expr, $lhs:expr, $rhs:expr, $expect:expr) => {
            #[test]
            fn $name() {
                assert_eq!(binary($op, $lhs, $rhs), $expect);
            }
        };
    }

    test_binary!(add_int, BinaryOp::Add, Value::Integer(2), Value::Integer(3), Ok(Value::Integer(5)));
    test_binary!(add_mixed, BinaryOp::Add, Value::Integer(2), Value::Real(0.5), Ok(Value::Real(2.5)));
    test_binary!(add_text, BinaryOp::Add, Value::Str("ab".into()), Value::Char('c'), Ok(Value::Str("abc".into())));
    test_binary!(div_real, BinaryOp::Div, Value::Integer(7), Value::Integer(2), Ok(Value::Real(3.5)));
    test_binary!(div_zero, BinaryOp::Div, Value::Integer(1), Value::Integer(0), Err(Error::DivisionByZero));
    test_binary!(intdiv, BinaryOp::IntDiv, Value::Integer(7), Value::Integer(2), Ok(Value::Integer(3)));
    test_binary!(modulo, BinaryOp::Mod, Value::Integer(7), Value::Integer(3), Ok(Value::Integer(1)));
    test_binary!(mod_zero, BinaryOp::Mod, Value::Integer(7), Value::Integer(0), Err(Error::DivisionByZero));
    test_binary!(and_bits, BinaryOp::And, Value::Integer(6), Value::Integer(3), Ok(Value::Integer(2)));
    test_binary!(lt_mixed, BinaryOp::Lt, Value::Integer(1), Value::Real(1.5), Ok(Value::Boolean(true)));
    test_binary!(eq_text, BinaryOp::Eq, Value::Char('a'), Value::Str("a".into()), Ok(Value::Boolean(true)));
    test_binary!(
        concat_too_long,
        BinaryOp::Add,
        Value::Str("a".repeat(200)),
        Value::Str("b".repeat(56)),
        Err(Error::StringTooLong(255))
    );
    test_binary!(wrapping_mul, BinaryOp::Mul, Value::Integer(i64::MAX), Value::Integer(2), Ok(Value::Integer(-2)));

    #[test]
    fn compare_mismatch() {
        assert!(matches!(
            binary(BinaryOp::Lt, Value::Integer(1), Value::Boolean(true)),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn step_limit() {
        let mut interp = Interp::new(2);
        assert_eq!(interp.step(), Ok(()));
        assert_eq!(interp.step(), Ok(()));
        assert_eq!(interp.step(), Err(Error::StepLimit(2)));
    }
}
