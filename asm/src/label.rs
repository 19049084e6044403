use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    /// `name:` in front of an instruction, address in the code segment
    Code,
    /// `name db ...`, offset in the data area
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub kind: LabelType,
    pub addr: u16,
    /// 1-based source line of the definition
    pub line: usize,
}

/// Symbol table built in pass 1. Insertion order is kept so listings show
/// labels in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Labels {
    labels: IndexMap<String, Label>,
}

impl Labels {
    pub fn new() -> Self {
        Labels {
            labels: IndexMap::new(),
        }
    }

    /// Returns the previous definition if the name was already taken. The
    /// new value replaces it.
    pub fn insert(&mut self, name: String, kind: LabelType, addr: u16, line: usize) -> Option<Label> {
        self.labels.insert(name, Label { kind, addr, line })
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.labels.get(name)
    }

    pub fn get_val(&self, name: &str) -> Option<u16> {
        self.labels.get(name).map(|label| label.addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Label)> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
