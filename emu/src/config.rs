use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspace: PathBuf,
    pub asm_step_limit: usize,
    pub pascal_step_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace: PathBuf::from("./workspace"),
            asm_step_limit: x86asm::Limits::default().max_steps,
            pascal_step_limit: tpas::Limits::default().max_steps,
        }
    }
}

impl Config {
    /// Load from a YAML file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }

    pub fn asm_limits(&self) -> x86asm::Limits {
        x86asm::Limits {
            max_steps: self.asm_step_limit,
        }
    }

    pub fn pascal_limits(&self) -> tpas::Limits {
        tpas::Limits {
            max_steps: self.pascal_step_limit,
        }
    }
}
