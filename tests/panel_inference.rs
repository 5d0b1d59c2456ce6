use tikzplot::plot::Bound;
use tikzplot::{Axis, Figure, Graph, Hist1D, Hist2D, Legend, Panel, PlotError};

fn graph(name: &str, x: Vec<f64>, y: Vec<f64>, x_title: &str, y_title: &str) -> Graph {
    Graph::new(name, x, y).unwrap().with_titles(x_title, y_title)
}

#[test]
fn ranges_only_widen() {
    let a = graph("a", vec![0.0, 10.0], vec![1.0, 2.0], "t", "v");
    let b = graph("b", vec![-5.0, 8.0], vec![1.0, 2.0], "t", "v");
    let narrow = graph("c", vec![2.0, 3.0], vec![1.5, 1.6], "t", "v");

    let mut panel = Panel::new("");
    panel.attach_series(&a, "", "").unwrap();
    panel.attach_series(&b, "", "").unwrap();
    panel.attach_series(&narrow, "", "").unwrap();

    assert_eq!(panel.options().get("xmin"), Some("-5"));
    assert_eq!(panel.options().get("xmax"), Some("10"));
    assert_eq!(panel.axis(Axis::X).range.min, Bound::Inferred(-5.0));
}

#[test]
fn explicit_limits_are_never_touched() {
    let a = graph("a", vec![-20.0, 30.0], vec![1.0, 2.0], "t", "v");
    let mut panel = Panel::new("xmin=-1, ymax=100");
    panel.attach_series(&a, "", "").unwrap();

    assert_eq!(panel.options().get("xmin"), Some("-1"));
    assert_eq!(panel.options().get("xmax"), Some("30"));
    assert_eq!(panel.options().get("ymax"), Some("100"));
    assert!(panel.axis(Axis::X).range.min.is_explicit());
}

#[test]
fn first_series_title_wins() {
    let energy = graph("a", vec![0.0, 1.0], vec![1.0, 2.0], "E", "N");
    let time = graph("b", vec![0.0, 1.0], vec![1.0, 2.0], "T", "rate");
    let mut panel = Panel::new("");
    panel.attach_series(&energy, "", "").unwrap();
    panel.attach_series(&time, "", "").unwrap();

    assert_eq!(panel.axis(Axis::X).label, "E");
    assert_eq!(panel.options().get("xlabel"), Some("{E}"));
    assert_eq!(panel.options().get("ylabel"), Some("{N}"));
}

#[test]
fn user_label_beats_series_title() {
    let energy = graph("a", vec![0.0, 1.0], vec![1.0, 2.0], "E", "N");
    let mut panel = Panel::new("xlabel={Energy [GeV]}");
    panel.attach_series(&energy, "", "").unwrap();
    assert_eq!(panel.options().get("xlabel"), Some("{Energy [GeV]}"));
    assert_eq!(panel.options().get("ylabel"), Some("{N}"));
}

#[test]
fn histogram_contents_are_padded() {
    let h = Hist1D::new("h", vec![0.0, 1.0, 2.0], vec![10.0, 20.0]).unwrap();
    let mut panel = Panel::new("");
    panel.attach_series(&h, "", "").unwrap();
    assert_eq!(panel.options().get("xmin"), Some("0"));
    assert_eq!(panel.options().get("xmax"), Some("2"));
    assert_eq!(panel.options().get("ymin"), Some("9"));
    assert_eq!(panel.options().get("ymax"), Some("22"));
}

#[test]
fn two_dimensional_series_sets_up_colorbar() {
    let h = Hist2D::new(
        "map",
        vec![0.0, 1.0, 2.0],
        vec![0.0, 1.0],
        vec![10.0, 20.0],
    )
    .unwrap()
    .with_titles("x", "y", "counts");
    let mut panel = Panel::new("");
    panel.attach_series(&h, "", "").unwrap();

    assert_eq!(panel.options().get("view"), Some("{0}{90}"));
    assert!(panel.options().is_defined("colorbar"));
    assert_eq!(panel.options().get("colorbar style"), Some("{title={counts}}"));
    assert_eq!(panel.options().get("point meta min"), Some("9"));
    assert_eq!(panel.options().get("point meta max"), Some("22"));
    assert_eq!(panel.options().get("ymin"), Some("0"));
    assert_eq!(panel.options().get("ymax"), Some("1"));
}

#[test]
fn empty_series_is_rejected_and_panel_unchanged() {
    let empty = Graph::new("nothing", vec![], vec![]).unwrap();
    let mut panel = Panel::new("width=5cm");
    let err = panel.attach_series(&empty, "", "").unwrap_err();
    assert!(matches!(err, PlotError::NullSeries(name) if name == "nothing"));
    assert!(panel.is_empty());
    assert_eq!(panel.options().len(), 1);
}

#[test]
fn log_mode_accepts_only_three_axes() {
    let mut panel = Panel::new("");
    panel.set_log_mode(1, true).unwrap();
    assert_eq!(panel.options().get("ymode"), Some("log"));
    panel.set_log_mode(1, false).unwrap();
    assert!(!panel.options().is_defined("ymode"));
    assert!(matches!(
        panel.set_log_mode(3, true),
        Err(PlotError::InvalidArgument(_))
    ));
}

#[test]
fn axis_markup_with_legend() {
    let g = graph("g", vec![0.0, 2.0], vec![1.0, 3.0], "", "");
    let mut legend = Legend::new();
    legend.add_entry("data");
    legend.style_mut().add("at={(0.5,0.9)}");

    let mut panel = Panel::new("width=6cm");
    panel.set_legend(&legend);
    panel.attach_series(&g, "P", "red").unwrap();
    let out = panel.render();

    assert!(out.starts_with("\t\\begin{axis}[\n"));
    assert!(out.contains("\t\t\twidth=6cm,\n"));
    assert!(out.contains("\t\t\tlegend style={\n\t\t\t\tat={(0.5,0.9)},\n\t\t\t},\n"));
    assert!(out.contains("\t\\legend{\n\t\t{data},\n\t}\n"));
    assert!(out.contains("\\addplot"));
    assert!(out.ends_with("\t\\end{axis}\n"));
}
