use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::EngineKind;
use crate::error::Error;
use crate::help;
use crate::samples;
use crate::workspace::{FileEntry, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Uninitialized,
    EngineSelected,
    SourceLoaded,
    Compiled,
    Executed,
}

/// Result of the last compilation, per engine
#[derive(Debug, Clone)]
enum Artifact {
    Assembly(x86asm::Assembly),
    Pascal(tpas::Compilation),
}

/// Engine result together with its text rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub success: bool,
    pub text: String,
}

pub struct Emulator {
    config: Config,
    workspace: Workspace,
    engine: Option<EngineKind>,
    stage: Stage,
    source: Option<String>,
    artifact: Option<Artifact>,
}

impl Emulator {
    pub fn new(config: Config) -> Self {
        let workspace = Workspace::new(config.workspace.clone());
        Emulator {
            config,
            workspace,
            engine: None,
            stage: Stage::Uninitialized,
            source: None,
            artifact: None,
        }
    }

    pub fn engine(&self) -> Option<EngineKind> {
        self.engine
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Select the active engine and clear everything downstream of it
    pub fn initialize(&mut self, kind: EngineKind) -> String {
        info!(engine = %kind, "engine selected");
        self.engine = Some(kind);
        self.stage = Stage::EngineSelected;
        self.source = None;
        self.artifact = None;
        kind.banner()
    }

    pub fn load_file(&mut self, name: &str) -> Result<String, Error> {
        let text = self.workspace.read(name)?;
        debug!(file = name, bytes = text.len(), "loaded");
        if self.engine.is_some() {
            self.source = Some(text.clone());
            self.artifact = None;
            self.stage = Stage::SourceLoaded;
        }
        Ok(text)
    }

    pub fn save_file(&self, name: &str, text: &str) -> Result<(), Error> {
        self.workspace.write(name, text)?;
        debug!(file = name, bytes = text.len(), "saved");
        Ok(())
    }

    pub fn compile(&mut self, source: &str) -> Result<Report, Error> {
        let kind = self.engine.ok_or(Error::NoEngine)?;
        let (artifact, report) = match kind {
            EngineKind::Assembler => {
                let asm = x86asm::assemble(source);
                let report = Report {
                    success: asm.success,
                    text: x86asm::display_results(&asm),
                };
                (Artifact::Assembly(asm), report)
            }
            EngineKind::Pascal => {
                let compilation = tpas::compile(source);
                let report = Report {
                    success: compilation.success,
                    text: tpas::display_results(&compilation),
                };
                (Artifact::Pascal(compilation), report)
            }
        };
        debug!(engine = %kind, success = report.success, "compiled");
        self.source = Some(source.to_string());
        self.artifact = Some(artifact);
        self.stage = Stage::Compiled;
        Ok(report)
    }

    pub fn execute(&mut self) -> Result<Report, Error> {
        if self.engine.is_none() {
            return Err(Error::NoEngine);
        }
        let artifact = self.artifact.as_ref().ok_or(Error::NotCompiled)?;
        let report = match artifact {
            Artifact::Assembly(asm) => {
                let exec = x86asm::execute_with(asm, &self.config.asm_limits());
                Report {
                    success: exec.success,
                    text: x86asm::display_execution_results(&exec),
                }
            }
            Artifact::Pascal(compilation) => {
                let exec = tpas::execute_with(compilation, &self.config.pascal_limits());
                Report {
                    success: exec.success,
                    text: tpas::display_execution_results(&exec),
                }
            }
        };
        debug!(success = report.success, "executed");
        self.stage = Stage::Executed;
        Ok(report)
    }

    /// Compile, then run only if compilation succeeded
    pub fn compile_and_execute(&mut self, source: &str) -> Result<Report, Error> {
        let compiled = self.compile(source)?;
        if !compiled.success {
            return Ok(compiled);
        }
        let executed = self.execute()?;
        Ok(Report {
            success: executed.success,
            text: format!("{}\n\n{}", compiled.text, executed.text),
        })
    }

    pub fn list_files(&self) -> Result<Vec<FileEntry>, Error> {
        self.workspace.list()
    }

    /// Write a canned program as `<template>.<ext>` and return its text
    pub fn create_sample(&self, kind: EngineKind, template: &str) -> Result<String, Error> {
        let text = samples::sample(kind, template)?;
        let name = format!("{}.{}", template.to_ascii_lowercase(), kind.extension());
        self.workspace.write(&name, text)?;
        info!(file = %name, "sample created");
        Ok(text.to_string())
    }

    pub fn help(&self, kind: Option<EngineKind>) -> String {
        help::help(kind.or(self.engine))
    }
}
