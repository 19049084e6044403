use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::eval::interp::Interp;
use crate::grammer::ast::{Program, Stmt};
use crate::grammer::lexer::Lexer;
use crate::grammer::parsercore::Parser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compilation {
    pub success: bool,
    pub errors: Vec<Error>,
    #[serde(skip)]
    pub program: Option<Program>,
    pub statement_count: usize,
}

/// Tokenize and parse a whole program. Errors are collected, not returned.
pub fn compile(source: &str) -> Compilation {
    let tokens = Lexer::new(source).parse();
    debug!(tokens = tokens.len(), "tokenized");

    let (program, errors) = Parser::new(tokens.into_iter()).parse();
    let statement_count = program
        .as_ref()
        .map_or(0, |program| program.body.iter().map(Stmt::count).sum());
    debug!(errors = errors.len(), statements = statement_count, "parsed");

    let success = errors.is_empty() && program.is_some();
    Compilation {
        success,
        errors,
        program: if success { program } else { None },
        statement_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_steps: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub success: bool,
    pub output: Vec<String>,
    pub errors: Vec<String>,
    pub statements_executed: usize,
    pub steps: usize,
    /// Final variable values, rendered as `write` would
    pub variables: IndexMap<String, String>,
}

pub fn execute(compilation: &Compilation) -> Execution {
    execute_with(compilation, &Limits::default())
}

/// Interpret a compiled program with a fresh variable store.
pub fn execute_with(compilation: &Compilation, limits: &Limits) -> Execution {
    let Some(program) = compilation.program.as_ref().filter(|_| compilation.success) else {
        return Execution {
            success: false,
            output: vec![],
            errors: vec![Error::NotCompiled.to_string()],
            statements_executed: 0,
            steps: 0,
            variables: IndexMap::new(),
        };
    };

    let mut interp = Interp::new(limits.max_steps);
    let result = interp.run(program);
    debug!(
        statements = interp.statements(),
        steps = interp.steps(),
        "execution finished"
    );

    let errors = match result {
        Ok(()) => vec![],
        Err(err @ Error::StepLimit(_)) => {
            warn!(limit = limits.max_steps, "step limit reached");
            vec![err.to_string()]
        }
        Err(err) => vec![err.to_string()],
    };

    Execution {
        success: errors.is_empty(),
        output: interp.output(),
        errors,
        statements_executed: interp.statements(),
        steps: interp.steps().min(limits.max_steps),
        variables: interp
            .store()
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect(),
    }
}
