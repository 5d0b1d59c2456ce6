//! The `tikzpicture` environment holding one or more figures.

use super::Figure;
use super::group::GridLayout;
use super::panel::Panel;
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Colorbrewer2 qualitative sets known to the pgfplots `colorbrewer` library.
const COLORBREWER_SETS: [&str; 8] = [
    "Set1", "Set2", "Set3", "Dark2", "Paired", "Pastel1", "Pastel2", "Accent",
];

/// A figure owned by a picture.
#[derive(Debug, Clone)]
pub enum PictureItem<'a> {
    Axis(Panel<'a>),
    Group(GridLayout<'a>),
}

impl<'a> From<Panel<'a>> for PictureItem<'a> {
    fn from(panel: Panel<'a>) -> Self {
        PictureItem::Axis(panel)
    }
}

impl<'a> From<GridLayout<'a>> for PictureItem<'a> {
    fn from(grid: GridLayout<'a>) -> Self {
        PictureItem::Group(grid)
    }
}

impl PictureItem<'_> {
    fn render(&mut self) -> String {
        match self {
            PictureItem::Axis(panel) => panel.render(),
            PictureItem::Group(grid) => grid.render(),
        }
    }
}

/// `\begin{tikzpicture} ... \end{tikzpicture}` plus the preamble lines it needs.
#[derive(Debug, Clone, Default)]
pub struct Picture<'a> {
    options: String,
    preamble: String,
    palette: Option<String>,
    items: Vec<PictureItem<'a>>,
}

impl<'a> Picture<'a> {
    pub fn new(options: &str, preamble: &str) -> Self {
        Self {
            options: options.to_string(),
            preamble: preamble.to_string(),
            palette: None,
            items: Vec::new(),
        }
    }

    /// Add an axis or a group plot. Group plots pull in the `groupplots` library.
    pub fn add<F: Into<PictureItem<'a>>>(&mut self, figure: F) {
        let item = figure.into();
        if matches!(item, PictureItem::Group(_)) && !self.preamble.contains("{groupplots}") {
            if !self.preamble.is_empty() {
                self.preamble.push('\n');
            }
            self.preamble.push_str("\\usepgfplotslibrary{groupplots}");
        }
        self.items.push(item);
    }

    pub fn items(&self) -> &[PictureItem<'a>] {
        &self.items
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Use a colorbrewer2 palette (e.g. `Dark2`, `Set1-5`) as the plot cycle list.
    /// Unknown names are kept, with a warning.
    pub fn set_palette(&mut self, palette: &str) {
        if !COLORBREWER_SETS.iter().any(|set| palette.contains(set)) {
            log::warn!("colorbrewer2 palette '{palette}' may not exist");
        }
        self.palette = Some(palette.to_string());
    }

    pub fn palette(&self) -> Option<&str> {
        self.palette.as_deref()
    }

    /// Full markup of the picture. Group plots are unified as part of this.
    pub fn render(&mut self) -> String {
        let mut out = String::new();
        if !self.preamble.is_empty() {
            out.push_str(&self.preamble);
            out.push('\n');
        }
        if let Some(palette) = &self.palette {
            out.push_str("\\usepgfplotslibrary{colorbrewer}\n");
            out.push_str(&format!("\\pgfplotsset{{cycle list/{palette}}}\n"));
        }
        if self.options.is_empty() {
            out.push_str("\\begin{tikzpicture}\n");
        } else {
            out.push_str(&format!("\\begin{{tikzpicture}}[{}]\n", self.options));
        }
        for item in &mut self.items {
            out.push_str(&item.render());
        }
        out.push_str("\\end{tikzpicture}\n");
        out
    }

    pub fn write_to(&mut self, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.render().as_bytes())?;
        Ok(())
    }

    /// Write the picture to `path`, replacing any existing file.
    pub fn write_to_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::info!("wrote {} figure(s) to {}", self.items.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hist1D;

    #[test]
    fn group_plots_add_library_once() {
        let mut picture = Picture::new("", "\\usepackage{pgfplots}");
        picture.add(GridLayout::new(1, 1, "").unwrap());
        picture.add(GridLayout::new(1, 2, "").unwrap());
        assert_eq!(
            picture.preamble(),
            "\\usepackage{pgfplots}\n\\usepgfplotslibrary{groupplots}"
        );
    }

    #[test]
    fn palette_and_environment() {
        let h = Hist1D::new("h", vec![0.0, 1.0], vec![1.0]).unwrap();
        let mut panel = Panel::new("");
        panel.attach_series(&h, "", "").unwrap();
        let mut picture = Picture::new("scale=0.8", "");
        picture.set_palette("Dark2");
        picture.add(panel);
        let out = picture.render();
        assert!(out.starts_with(
            "\\usepgfplotslibrary{colorbrewer}\n\\pgfplotsset{cycle list/Dark2}\n\\begin{tikzpicture}[scale=0.8]\n\t\\begin{axis}["
        ));
        assert!(out.ends_with("\t\\end{axis}\n\\end{tikzpicture}\n"));
    }
}
