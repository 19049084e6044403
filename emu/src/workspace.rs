use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    /// Seconds since the Unix epoch
    pub modified: u64,
    pub extension: String,
}

/// Directory holding the user's source files. Names never leave it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workspace { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, Error> {
        let invalid = name.is_empty()
            || name.contains(['/', '\\'])
            || name.contains("..")
            || Path::new(name).is_absolute();
        if invalid {
            return Err(Error::InvalidFileName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    pub fn read(&self, name: &str) -> Result<String, Error> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(Error::FileNotFound(name.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn write(&self, name: &str, text: &str) -> Result<(), Error> {
        let path = self.resolve(name)?;
        fs::create_dir_all(&self.root)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Regular files in the workspace, sorted by name
    pub fn list(&self) -> Result<Vec<FileEntry>, Error> {
        if !self.root.is_dir() {
            return Ok(vec![]);
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let path = entry.path();
            let modified = meta
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |elapsed| elapsed.as_secs());
            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                modified,
                extension: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_reject {
        ($name:ident, $file:expr) => {
            #[test]
            fn $name() {
                let ws = Workspace::new("/tmp/retroemu-unused");
                assert!(matches!(ws.resolve($file), Err(Error::InvalidFileName(_))));
            }
        };
    }

    test_reject!(reject_empty, "");
    test_reject!(reject_parent, "../secret.asm");
    test_reject!(reject_slash, "dir/file.asm");
    test_reject!(reject_backslash, "dir\\file.asm");
    test_reject!(reject_absolute, "/etc/passwd");

    #[test]
    fn plain_name_resolves_inside() {
        let ws = Workspace::new("/tmp/ws");
        assert_eq!(ws.resolve("hello.asm").unwrap(), PathBuf::from("/tmp/ws/hello.asm"));
    }
}
