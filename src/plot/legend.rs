//! Legend entries and legend style for a panel.

use crate::options::OptionStore;

/// Legend shared by reference with the panel that displays it.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: Vec<String>,
    style: OptionStore,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: &str) {
        self.entries.push(entry.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Options written into the panel's `legend style={...}`.
    pub fn style(&self) -> &OptionStore {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut OptionStore {
        &mut self.style
    }

    /// The `\legend{...}` command.
    pub fn render(&self) -> String {
        let mut out = String::from("\t\\legend{\n");
        for entry in &self.entries {
            out.push_str(&format!("\t\t{{{entry}}},\n"));
        }
        out.push_str("\t}\n");
        out
    }
}
