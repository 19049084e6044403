use super::ast::{BinaryOp, CaseArm, CaseLabel, Expr, Program, Stmt, Type, UnaryOp, WriteArg};
use super::parsercore::Parser;
use super::token::{Token, TokenKind, TokenKind::*};
use crate::error::{Error, TokenInfo};
use crate::{check, expect, optional, recover, repeat};

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn parse(mut self) -> (Option<Program>, Vec<Error>) {
        let program = match self.parse_program() {
            Ok(program) => Some(program),
            Err(err) => {
                self.error(err);
                None
            }
        };
        (program, self.geterrors())
    }
}

fn starts_stmt(kind: &TokenKind) -> bool {
    matches!(
        kind,
        Ident(_)
            | KwBegin
            | KwIf
            | KwWhile
            | KwFor
            | KwRepeat
            | KwCase
            | KwWrite
            | KwWriteln
            | KwRead
            | KwReadln
    )
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// program = "program" ident [ "(" idents ")" ] ";" [ uses ] { const-decls | var-decls } "begin" stmts "end" "."
    fn parse_program(&mut self) -> Result<Program, Error> {
        expect!(self, KwProgram)?;
        let name = self.parse_ident()?;
        if optional!(self, LParen).is_some() {
            repeat!(self, self.parse_ident(), Comma, RParen);
            expect!(self, RParen)?;
        }
        expect!(self, Semicolon)?;

        // uses = "uses" ident { "," ident } ";"
        if optional!(self, KwUses).is_some() {
            repeat!(self, self.parse_ident(), Comma, Semicolon);
            expect!(self, Semicolon)?;
        }

        let mut consts: Vec<(String, Expr)> = Vec::new();
        let mut vars: Vec<(String, Type)> = Vec::new();
        loop {
            if optional!(self, KwConst).is_some() {
                while check!(self, Ident(_)) {
                    match self.parse_const() {
                        Ok(def) => consts.push(def),
                        Err(err) => self.sync_decl(err),
                    }
                }
            } else if optional!(self, KwVar).is_some() {
                while check!(self, Ident(_)) {
                    match self.parse_var_group() {
                        Ok(group) => vars.extend(group),
                        Err(err) => self.sync_decl(err),
                    }
                }
            } else {
                break;
            }
        }
        self.check_duplicates(&consts, &vars);

        expect!(self, KwBegin)?;
        let body = self.parse_stmts();
        let line = self.line();
        match self.peek() {
            None => return Err(Error::MissingProgramEnd(line)),
            Some(token) if token.kind != KwEnd => return Err(Error::UnexpectedToken(token.into())),
            Some(_) => {}
        }
        expect!(self, KwEnd)?;
        if optional!(self, Period).is_none() {
            return Err(Error::MissingProgramEnd(self.line()));
        }

        Ok(Program {
            name,
            consts,
            vars,
            body,
        })
    }

    fn sync_decl(&mut self, err: Error) {
        self.error(err);
        recover!(self, Semicolon | KwBegin | KwVar | KwConst);
        optional!(self, Semicolon);
    }

    fn check_duplicates(&mut self, consts: &[(String, Expr)], vars: &[(String, Type)]) {
        let mut seen = std::collections::HashSet::new();
        let names = consts.iter().map(|(name, _)| name).chain(vars.iter().map(|(name, _)| name));
        for name in names {
            if !seen.insert(name.clone()) {
                let line = self.line();
                self.error(Error::Duplicate(line, name.clone()));
            }
        }
    }

    /// const-decl = ident "=" expr ";"
    fn parse_const(&mut self) -> Result<(String, Expr), Error> {
        let name = self.parse_ident()?;
        expect!(self, Equal)?;
        let expr = self.parse_expr()?;
        expect!(self, Semicolon)?;
        Ok((name, expr))
    }

    /// var-decl = ident { "," ident } ":" type ";"
    fn parse_var_group(&mut self) -> Result<Vec<(String, Type)>, Error> {
        let names = repeat!(self, self.parse_ident(), Comma, Colon);
        expect!(self, Colon)?;
        let ty = self.parse_type()?;
        expect!(self, Semicolon)?;
        Ok(names.into_iter().map(|name| (name, ty)).collect())
    }

    /// type = "integer" | "real" | "boolean" | "char" | "string" [ "[" int "]" ]
    fn parse_type(&mut self) -> Result<Type, Error> {
        let token = self.next().ok_or_else(|| self.eof())?;
        match &token.kind {
            KwInteger => Ok(Type::Integer),
            KwReal => Ok(Type::Real),
            KwBoolean => Ok(Type::Boolean),
            KwChar => Ok(Type::Char),
            KwString => {
                if optional!(self, LBracket).is_some() {
                    expect!(self, Integer(_))?;
                    expect!(self, RBracket)?;
                }
                Ok(Type::String)
            }
            Ident(name) => match name.as_str() {
                "longint" | "word" | "byte" | "shortint" => Ok(Type::Integer),
                "double" | "single" | "extended" => Ok(Type::Real),
                _ => Err(Error::UnknownType(token.pos.line, token.text.clone())),
            },
            _ => Err(Error::UnexpectedToken((&token).into())),
        }
    }

    /// stmts = stmt { ";" stmt }
    fn parse_stmts(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            match self.parse_stmt() {
                Ok(Stmt::Empty) => {}
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.error(err);
                    recover!(self, Semicolon | KwEnd | KwUntil);
                }
            }
            if optional!(self, Semicolon).is_some() {
                continue;
            }
            // Missing ';' between two statements
            match self.peek() {
                Some(token) if starts_stmt(&token.kind) => {
                    let err = Error::UnexpectedToken(token.into());
                    self.error(err);
                }
                _ => break,
            }
        }
        stmts
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        self.enter()?;
        let stmt = self.parse_stmt_body();
        self.leave();
        stmt
    }

    /// stmt = compound | assign | write | read | if | while | for | repeat | case | empty
    fn parse_stmt_body(&mut self) -> Result<Stmt, Error> {
        let Some(token) = self.peek().cloned() else {
            return Ok(Stmt::Empty);
        };
        match &token.kind {
            // Empty statement
            Semicolon | KwEnd | KwUntil => Ok(Stmt::Empty),

            // Compound statement: "begin" stmts "end"
            KwBegin => {
                expect!(self, KwBegin)?;
                let stmts = self.parse_stmts();
                expect!(self, KwEnd)?;
                Ok(Stmt::Compound(stmts))
            }

            // If statement: "if" expr "then" stmt [ "else" stmt ]
            KwIf => {
                expect!(self, KwIf)?;
                let cond = self.parse_expr()?;
                expect!(self, KwThen)?;
                let then = Box::new(self.parse_stmt()?);
                let other = optional!(self, KwElse, Box::new(self.parse_stmt()?));
                Ok(Stmt::If(cond, then, other))
            }

            // While statement: "while" expr "do" stmt
            KwWhile => {
                expect!(self, KwWhile)?;
                let cond = self.parse_expr()?;
                expect!(self, KwDo)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While(cond, body))
            }

            // For statement: "for" ident ":=" expr ( "to" | "downto" ) expr "do" stmt
            KwFor => {
                expect!(self, KwFor)?;
                let var = self.parse_ident()?;
                expect!(self, Assign)?;
                let from = self.parse_expr()?;
                let down = expect!(self, KwTo | KwDownto)?.kind == KwDownto;
                let to = self.parse_expr()?;
                expect!(self, KwDo)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::For(var, from, to, down, body))
            }

            // Repeat statement: "repeat" stmts "until" expr
            KwRepeat => {
                expect!(self, KwRepeat)?;
                let body = self.parse_stmts();
                expect!(self, KwUntil)?;
                let cond = self.parse_expr()?;
                Ok(Stmt::Repeat(body, cond))
            }

            KwCase => self.parse_case(),

            // Write statement: ( "write" | "writeln" ) [ "(" [ write-arg { "," write-arg } ] ")" ]
            KwWrite | KwWriteln => {
                self.next();
                let args = if optional!(self, LParen).is_some() {
                    let args = repeat!(self, self.parse_write_arg(), Comma, RParen);
                    expect!(self, RParen)?;
                    args
                } else {
                    Vec::new()
                };
                Ok(Stmt::Write(token.kind == KwWriteln, args))
            }

            // Read statement: ( "read" | "readln" ) [ "(" [ ident { "," ident } ] ")" ]
            KwRead | KwReadln => {
                self.next();
                let vars = if optional!(self, LParen).is_some() {
                    let vars = repeat!(self, self.parse_ident(), Comma, RParen);
                    expect!(self, RParen)?;
                    vars
                } else {
                    Vec::new()
                };
                Ok(Stmt::Read(token.kind == KwReadln, vars))
            }

            // Assignment: ident ":=" expr
            Ident(name) => {
                self.next();
                if optional!(self, Assign).is_none() {
                    return Err(Error::UnknownStatement(token.pos.line, token.text.clone()));
                }
                let expr = self.parse_expr()?;
                Ok(Stmt::Assign(name.clone(), expr))
            }

            _ => Err(Error::UnexpectedToken((&token).into())),
        }
    }

    /// case = "case" expr "of" arm { ";" arm } [ ";" ] [ "else" stmts ] "end"
    /// arm = case-label { "," case-label } ":" stmt
    fn parse_case(&mut self) -> Result<Stmt, Error> {
        expect!(self, KwCase)?;
        let selector = self.parse_expr()?;
        expect!(self, KwOf)?;

        let mut arms = Vec::new();
        let mut other = None;
        loop {
            if check!(self, KwEnd) {
                break;
            }
            if optional!(self, KwElse).is_some() {
                other = Some(Box::new(Stmt::Compound(self.parse_stmts())));
                break;
            }
            let labels = repeat!(self, self.parse_case_label(), Comma, Colon);
            expect!(self, Colon)?;
            let body = self.parse_stmt()?;
            arms.push(CaseArm { labels, body });
            optional!(self, Semicolon);
        }
        expect!(self, KwEnd)?;
        Ok(Stmt::Case(selector, arms, other))
    }

    /// case-label = expr [ ".." expr ]
    fn parse_case_label(&mut self) -> Result<CaseLabel, Error> {
        let lo = self.parse_simple_expr()?;
        match optional!(self, DotDot, self.parse_simple_expr()?) {
            Some(hi) => Ok(CaseLabel::Range(lo, hi)),
            None => Ok(CaseLabel::Value(lo)),
        }
    }

    /// write-arg = expr [ ":" expr [ ":" expr ] ]
    fn parse_write_arg(&mut self) -> Result<WriteArg, Error> {
        let expr = self.parse_expr()?;
        let mut width = None;
        let mut decimals = None;
        if optional!(self, Colon).is_some() {
            width = Some(self.parse_simple_expr()?);
            decimals = optional!(self, Colon, self.parse_simple_expr()?);
        }
        Ok(WriteArg {
            expr,
            width,
            decimals,
        })
    }

    /// expr = simple-expr [ ( "=" | "<>" | "<" | "<=" | ">" | ">=" ) simple-expr ]
    fn parse_expr(&mut self) -> Result<Expr, Error> {
        let lhs = self.parse_simple_expr()?;
        let op = match self.peek().map(|token| &token.kind) {
            Some(Equal) => BinaryOp::Eq,
            Some(NotEqual) => BinaryOp::Ne,
            Some(LAngle) => BinaryOp::Lt,
            Some(LAngleEqual) => BinaryOp::Le,
            Some(RAngle) => BinaryOp::Gt,
            Some(RAngleEqual) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.next();
        let rhs = self.parse_simple_expr()?;
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    /// simple-expr = term { ( "+" | "-" | "or" ) term }
    fn parse_simple_expr(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek().map(|token| &token.kind) {
                Some(Plus) => BinaryOp::Add,
                Some(Minus) => BinaryOp::Sub,
                Some(KwOr) => BinaryOp::Or,
                _ => return Ok(lhs),
            };
            self.next();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    /// term = factor { ( "*" | "/" | "div" | "mod" | "and" ) factor }
    fn parse_term(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek().map(|token| &token.kind) {
                Some(Star) => BinaryOp::Mul,
                Some(Slash) => BinaryOp::Div,
                Some(KwDiv) => BinaryOp::IntDiv,
                Some(KwMod) => BinaryOp::Mod,
                Some(KwAnd) => BinaryOp::And,
                _ => return Ok(lhs),
            };
            self.next();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_factor(&mut self) -> Result<Expr, Error> {
        self.enter()?;
        let factor = self.parse_factor_body();
        self.leave();
        factor
    }

    /// factor = ( "+" | "-" | "not" ) factor | "(" expr ")" | ident [ "(" args ")" ] | literal
    fn parse_factor_body(&mut self) -> Result<Expr, Error> {
        let token = self.next().ok_or_else(|| self.eof())?;
        let info = TokenInfo::from(&token);
        match token.kind {
            Plus => Ok(Expr::Unary(UnaryOp::Pos, Box::new(self.parse_factor()?))),
            Minus => Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.parse_factor()?))),
            KwNot => Ok(Expr::Unary(UnaryOp::Not, Box::new(self.parse_factor()?))),
            LParen => {
                let inner = self.parse_expr()?;
                expect!(self, RParen)?;
                Ok(inner)
            }
            Ident(name) => {
                if optional!(self, LParen).is_some() {
                    let args = repeat!(self, self.parse_expr(), Comma, RParen);
                    expect!(self, RParen)?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Integer(val) => Ok(Expr::Integer(val)),
            Real(val) => Ok(Expr::Real(val)),
            Text(text) => Ok(Expr::Text(text)),
            KwTrue => Ok(Expr::Bool(true)),
            KwFalse => Ok(Expr::Bool(false)),
            _ => Err(Error::UnexpectedToken(info)),
        }
    }

    fn parse_ident(&mut self) -> Result<String, Error> {
        let token = expect!(self, Ident(_))?;
        let info = TokenInfo::from(&token);
        match token.kind {
            Ident(name) => Ok(name),
            _ => Err(Error::UnexpectedToken(info)),
        }
    }
}
