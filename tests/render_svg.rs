use balance_chart::{Chart, ChartError, GradientBand, PlotPoint, Rgba, assemble_chart, fill_gradient};
use plotters_svg::SVGBackend;

fn render(points: Vec<PlotPoint>, backdrop: Option<Rgba>) -> String {
    let mut svg = String::new();
    {
        let gradient = fill_gradient(GradientBand::for_canvas(400, 50, 54)).unwrap();
        let spec = assemble_chart("USD", points, gradient);
        let chart = Chart::new(SVGBackend::with_string(&mut svg, (800, 400)), spec)
            .with_backdrop(backdrop);
        chart.draw().expect("svg render");
    }
    svg.to_lowercase()
}

fn sample() -> Vec<PlotPoint> {
    vec![
        PlotPoint { x: 1_713_260_476_000, y: 4.25412 },
        PlotPoint { x: 1_713_263_000_000, y: 4.1 },
        PlotPoint { x: 1_713_266_000_000, y: 3.95 },
        PlotPoint { x: 1_713_269_445_000, y: 3.679 },
    ]
}

#[test]
fn svg_contains_labels_line_and_glow() {
    let svg = render(sample(), None);
    assert!(svg.starts_with("<svg"));
    for text in ["usd", "time", "profit (price)"] {
        assert!(svg.contains(text), "missing {text:?}");
    }
    assert!(svg.contains("#954ce9"), "line / fill color");
    assert!(svg.contains("#e15bff"), "glow color");
    assert!(svg.contains("<polygon"), "gradient fill");
}

#[test]
fn time_labels_are_utc_clock_times() {
    // 09:41 .. 12:10 UTC on 2024-04-16
    let svg = render(sample(), None);
    assert!(svg.contains("10:00") || svg.contains("11:00"));
}

#[test]
fn empty_series_renders_axes_only() {
    let svg = render(vec![], Some(Rgba::opaque(24, 24, 32)));
    assert!(svg.contains("time"));
    assert!(!svg.contains("#e15bff"));
    assert!(svg.contains("#181820"), "backdrop");
}

#[test]
fn unrepresentable_value_spread_is_an_error() {
    let mut svg = String::new();
    let gradient = fill_gradient(GradientBand::for_canvas(400, 50, 54)).unwrap();
    let points = vec![PlotPoint { x: 1, y: -1e308 }, PlotPoint { x: 2, y: 1e308 }];
    let spec = assemble_chart("USD", points, gradient);
    let chart = Chart::new(SVGBackend::with_string(&mut svg, (800, 400)), spec);
    let err = chart.draw().unwrap_err();
    assert!(matches!(err, ChartError::ValueRange { .. }), "{err}");
}

#[test]
fn huge_but_representable_values_render() {
    let points = vec![PlotPoint { x: 1, y: -1e300 }, PlotPoint { x: 2, y: 1e300 }];
    let svg = render(points, None);
    assert!(svg.contains("<polyline") || svg.contains("<path"));
}
