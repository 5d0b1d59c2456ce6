//! `\addplot` commands for the supported series kinds.

use crate::models::{Graph, Hist1D, Hist2D, SeriesRef};
use crate::options::OptionStore;

/// A series attached to a panel, together with how it should be drawn.
///
/// `render_style` follows the ROOT draw options:
/// - 1D histograms: `""`/`HIST` step line, `E` error bars only, `E1` error bars with marks.
/// - Graphs: `""` marks and line, `P` marks, `L` line.
/// - 2D histograms: `matrix plot*` by default, `surf` for a surface plot.
#[derive(Debug, Clone)]
pub struct PlotItem<'a> {
    series: SeriesRef<'a>,
    render_style: String,
    options: OptionStore,
    nodes: Vec<(String, String)>,
}

impl<'a> PlotItem<'a> {
    pub fn new(series: SeriesRef<'a>, render_style: &str, options: &str) -> Self {
        Self {
            series,
            render_style: render_style.to_string(),
            options: OptionStore::parse(options),
            nodes: Vec::new(),
        }
    }

    pub fn series(&self) -> SeriesRef<'a> {
        self.series
    }

    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionStore {
        &mut self.options
    }

    /// Attach a `node` to the end of the plot path.
    pub fn add_node(&mut self, label: &str, options: &str) {
        self.nodes.push((label.to_string(), options.to_string()));
    }

    /// Markup for this item.
    pub fn render(&self) -> String {
        let mut out = match self.series {
            SeriesRef::Hist1D(h) => plot_hist1d(h, &self.render_style, &self.options),
            SeriesRef::Graph(g) => plot_graph(g, &self.render_style, &self.options),
            SeriesRef::Hist2D(h) => plot_hist2d(h, &self.render_style, &self.options),
        };
        if !self.nodes.is_empty() {
            // Nodes go between the coordinate list and the terminating `;`.
            if let Some(loc) = out.rfind('}') {
                let nodes: String = self
                    .nodes
                    .iter()
                    .map(|(label, opts)| format!("\n\t\t{}", node_string(label, opts)))
                    .collect();
                out.insert_str(loc + 1, &nodes);
            }
        }
        out
    }
}

pub fn node_string(label: &str, options: &str) -> String {
    if options.is_empty() {
        format!("node {{{label}}}")
    } else {
        format!("node[{options}] {{{label}}}")
    }
}

fn extra_options(options: &OptionStore) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!(", {}", options.to_inline())
    }
}

fn plot_hist1d(hist: &Hist1D, style: &str, options: &OptionStore) -> String {
    let include_errors = style.contains('E');
    let error_marks = style.contains("E1");
    let mut out = String::from("\t\\addplot+[");

    if include_errors {
        if !error_marks {
            out.push_str("scatter, mark=none, ");
        }
        out.push_str("only marks, ");
        out.push_str(&options.to_inline());
        if !options.is_empty() {
            out.push_str(", ");
        }
        // Keys after `/.cd` are resolved relative to `error bars`.
        out.push_str("error bars/.cd, y dir=both, y explicit, x dir=both, x explicit");
        if !error_marks {
            out.push_str(", error mark=none");
        }
    } else {
        out.push_str("const plot, no marks");
        out.push_str(&extra_options(options));
    }
    out.push_str("]\n\t\tcoordinates { ");

    let n = hist.n_bins();
    if !include_errors && n > 0 {
        out.push_str(&format!("({},0) ", hist.low_edge(0)));
    }
    for bin in 0..n {
        let content = hist.content(bin);
        let previous = if bin == 0 { 0.0 } else { hist.content(bin - 1) };
        // Runs of empty bins only need their first point.
        if !error_marks && content == 0.0 && previous == 0.0 && bin != 0 {
            continue;
        }
        if include_errors {
            out.push_str(&format!(
                "({},{}) +- ({},{}) ",
                hist.center(bin),
                content,
                hist.width(bin) / 2.0,
                hist.error(bin)
            ));
        } else {
            out.push_str(&format!("({},{}) ", hist.low_edge(bin), content));
        }
    }
    if !include_errors && n > 0 {
        let last = n - 1;
        out.push_str(&format!("({},{}) ", hist.high_edge(last), hist.content(last)));
        out.push_str(&format!("({},0) ", hist.high_edge(last)));
    }
    out.push_str("};\n\n");
    out
}

fn plot_graph(graph: &Graph, style: &str, options: &OptionStore) -> String {
    let (marks, lines) = if style.is_empty() {
        (true, true)
    } else {
        (style.contains('P'), style.contains('L'))
    };

    let mut out = String::from("\t\\addplot+[\n");
    if !lines {
        out.push_str("\t\t\tonly marks,\n");
    }
    if !marks {
        out.push_str("\t\t\tmark=none,\n");
    }
    out.push_str(&options.render("\t\t\t"));
    out.push_str("\t\t]\n\t\tcoordinates { ");
    for (x, y) in graph.points() {
        out.push_str(&format!("({x},{y}) "));
    }
    out.push_str("};\n\n");
    out
}

fn plot_hist2d(hist: &Hist2D, style: &str, options: &OptionStore) -> String {
    let surf = style.contains("surf");
    let (nx, ny) = (hist.n_bins_x(), hist.n_bins_y());

    let mut out = String::from("\t\\addplot3[");
    out.push_str(if surf { "surf,\n" } else { "matrix plot*,\n" });
    out.push_str("\t\tshader=flat corner,\n");
    out.push_str(&format!(
        "\t\tmesh/cols={nx}, mesh/rows={ny}, mesh/ordering=rowwise,\n"
    ));
    out.push_str(&options.render("\t\t"));
    out.push_str("\t]\n\t\tcoordinates {\n");

    for iy in 0..ny {
        out.push_str("\t\t\t");
        let y = if surf {
            hist.y_edges[iy]
        } else {
            0.5 * (hist.y_edges[iy] + hist.y_edges[iy + 1])
        };
        for ix in 0..nx {
            let x = if surf {
                hist.x_edges[ix]
            } else {
                0.5 * (hist.x_edges[ix] + hist.x_edges[ix + 1])
            };
            out.push_str(&format!("({},{},{}) ", x, y, hist.content(ix, iy)));
        }
        out.push('\n');
    }
    out.push_str("\t\t};\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist() -> Hist1D {
        Hist1D::new("h", vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 0.0, 4.0]).unwrap()
    }

    #[test]
    fn step_histogram_is_closed_to_zero() {
        let h = hist();
        let item = PlotItem::new(SeriesRef::from(&h), "", "red");
        let out = item.render();
        assert!(out.starts_with("\t\\addplot+[const plot, no marks, red]"));
        assert!(out.contains("coordinates { (0,0) (0,1) (1,0) (2,4) (3,4) (3,0) };"));
    }

    #[test]
    fn error_bars_use_centres() {
        let h = hist();
        let out = PlotItem::new(SeriesRef::from(&h), "E1", "").render();
        assert!(out.contains("only marks, error bars/.cd"));
        assert!(!out.contains("error mark=none"));
        assert!(out.contains("(2.5,4) +- (0.5,2) "));
    }

    #[test]
    fn graph_styles() {
        let g = Graph::new("g", vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        let marks_only = PlotItem::new(SeriesRef::from(&g), "P", "").render();
        assert!(marks_only.contains("only marks,"));
        assert!(!marks_only.contains("mark=none"));
        let both = PlotItem::new(SeriesRef::from(&g), "", "").render();
        assert!(!both.contains("only marks"));
        assert!(both.contains("coordinates { (1,3) (2,4) };"));
    }

    #[test]
    fn matrix_plot_rows() {
        let h = Hist2D::new(
            "m",
            vec![0.0, 2.0, 4.0],
            vec![0.0, 1.0],
            vec![5.0, 6.0],
        )
        .unwrap();
        let out = PlotItem::new(SeriesRef::from(&h), "", "").render();
        assert!(out.contains("matrix plot*"));
        assert!(out.contains("mesh/cols=2, mesh/rows=1"));
        assert!(out.contains("\t\t\t(1,0.5,5) (3,0.5,6) \n"));
    }

    #[test]
    fn nodes_follow_coordinates() {
        let h = hist();
        let mut item = PlotItem::new(SeriesRef::from(&h), "", "");
        item.add_node("peak", "pos=0.5");
        let out = item.render();
        assert!(out.contains("}\n\t\tnode[pos=0.5] {peak};"));
    }
}
