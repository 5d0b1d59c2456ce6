//! pgfplots markup: axes, group plots, legends and the surrounding `tikzpicture`.
//!
//! - [`Panel`]: a single `axis` environment that infers labels and limits from its series
//! - [`GridLayout`]: a `groupplot` of panels that hoists shared labels and limits
//! - [`Legend`], [`PlotItem`]: legend entries and `\addplot` commands
//! - [`Picture`]: preamble, colour palette and the `tikzpicture` environment

pub mod group;
pub mod item;
pub mod legend;
pub mod panel;
pub mod picture;
pub mod types;

pub use group::GridLayout;
pub use item::PlotItem;
pub use legend::Legend;
pub use panel::Panel;
pub use picture::Picture;
pub use types::{Axis, AxisMeta, AxisSelector, Bound, Range};

/// An environment that can be written into a `tikzpicture`.
///
/// The header line carries the options and legend style of [`Figure::frame`]; the
/// body follows the legend. [`Figure::preprocess`] runs on every [`Figure::render`].
pub trait Figure<'a> {
    fn env_header(&self) -> &'static str;

    fn env_footer(&self) -> &'static str;

    /// Panel providing the environment options and legend.
    fn frame(&self) -> &Panel<'a>;

    /// Everything between the legend and the footer.
    fn render_body(&self) -> String;

    fn preprocess(&mut self) {}

    fn render(&mut self) -> String {
        self.preprocess();
        let body = self.render_body();
        self.frame()
            .render_environment(self.env_header(), self.env_footer(), &body)
    }
}
