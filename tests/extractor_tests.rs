use chart_extract::ExtractError;
use chart_extract::core::{
    ApproximateFontMetrics, Axis, AxisCoordinate2D, AxisDirection, DataTable, ElementKind,
    FontDescriptor, PathOp, Rect, ShapeCommand, ShapeStyle, TextRun, Transform,
};
use chart_extract::extract::{
    ExtractionTuning, accurate_tick_position, apply_axis_text, extract_series,
};
use chart_extract::text::{TextChunk, texts_from_text_shapes};

fn glyph_run(text: &str, x: f64, baseline: f64) -> Vec<ShapeCommand> {
    text.chars()
        .enumerate()
        .map(|(index, c)| {
            ShapeCommand::text(
                TextRun::new(c.to_string(), x + 6.0 * index as f64, baseline, FontDescriptor::default()),
                ShapeStyle::default(),
                Transform::IDENTITY,
                &ApproximateFontMetrics::default(),
            )
        })
        .collect()
}

fn segment(x0: f64, y0: f64, x1: f64, y1: f64, style: ShapeStyle) -> ShapeCommand {
    ShapeCommand::path(
        vec![PathOp::move_to(x0, y0), PathOp::line_to(x1, y1)],
        style,
        Transform::IDENTITY,
    )
}

fn rectangle(x: f64, y: f64, width: f64, height: f64, style: ShapeStyle) -> ShapeCommand {
    ShapeCommand::path(
        vec![
            PathOp::Begin,
            PathOp::move_to(x, y),
            PathOp::line_to(x + width, y),
            PathOp::line_to(x + width, y + height),
            PathOp::line_to(x, y + height),
            PathOp::Close,
        ],
        style,
        Transform::IDENTITY,
    )
}

fn pixels(table: &DataTable, id: chart_extract::core::ElementId) -> Vec<(f64, f64)> {
    table
        .element(id)
        .expect("element")
        .data()
        .iter()
        .map(|point| (point.x.pixel, point.y.pixel))
        .collect()
}

#[test]
fn line_extraction_takes_every_vertex() {
    let mut table = DataTable::new();
    let line = table.add_series(ElementKind::Line, "line").expect("series");
    let path = ShapeCommand::path(
        vec![
            PathOp::move_to(10.0, 100.0),
            PathOp::line_to(20.0, 80.0),
            PathOp::line_to(30.0, 90.0),
        ],
        ShapeStyle::stroked("#1f77b4"),
        Transform::IDENTITY,
    );

    let outcome = extract_series(&mut table, line, &[path.clone()], &[], &ExtractionTuning::default())
        .expect("line extraction");
    assert_eq!(outcome.points_written, 3);
    assert_eq!(pixels(&table, line), vec![(10.0, 100.0), (20.0, 80.0), (30.0, 90.0)]);
    assert!(table.element(line).expect("line").has_shape(path.id()));
}

#[test]
fn scatter_extraction_uses_marker_centers() {
    let mut table = DataTable::new();
    let scatter = table.add_series(ElementKind::Scatter, "dots").expect("series");
    let markers = [
        rectangle(8.0, 48.0, 4.0, 4.0, ShapeStyle::filled("#2ca02c")),
        rectangle(18.0, 28.0, 4.0, 4.0, ShapeStyle::filled("#2ca02c")),
    ];

    extract_series(&mut table, scatter, &markers, &[], &ExtractionTuning::default())
        .expect("scatter extraction");
    assert_eq!(pixels(&table, scatter), vec![(10.0, 50.0), (20.0, 30.0)]);
}

#[test]
fn single_bar_path_is_split_into_bars() {
    let mut table = DataTable::new();
    let bars = table.add_series(ElementKind::Bar, "bars").expect("series");
    let combined = ShapeCommand::path(
        vec![
            PathOp::move_to(0.0, 100.0),
            PathOp::line_to(0.0, 40.0),
            PathOp::line_to(10.0, 40.0),
            PathOp::line_to(10.0, 100.0),
            PathOp::move_to(20.0, 100.0),
            PathOp::line_to(20.0, 70.0),
            PathOp::line_to(30.0, 70.0),
            PathOp::line_to(30.0, 100.0),
        ],
        ShapeStyle::filled("#ff7f0e"),
        Transform::IDENTITY,
    );

    let outcome = extract_series(&mut table, bars, &[combined.clone()], &[], &ExtractionTuning::default())
        .expect("bar extraction");
    assert_eq!(outcome.points_written, 2);
    assert_eq!(pixels(&table, bars), vec![(5.0, 40.0), (25.0, 70.0)]);
    let attached = table.element(bars).expect("bars").shapes();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].id(), combined.id());
}

#[test]
fn legend_entry_renames_the_series() {
    let mut table = DataTable::new();
    let line = table.add_series(ElementKind::Line, "Line 1").expect("series");
    let data = segment(0.0, 100.0, 200.0, 50.0, ShapeStyle::stroked("#d62728"));
    let swatch = segment(300.0, 20.0, 320.0, 20.0, ShapeStyle::stroked("#d62728"));

    let mut page = vec![data.clone(), swatch];
    page.extend(glyph_run("Revenue", 325.0, 24.0));
    page.extend(glyph_run("Costs", 500.0, 24.0));
    page.push(segment(480.0, 20.0, 495.0, 20.0, ShapeStyle::stroked("#1f77b4")));

    let outcome = extract_series(&mut table, line, &[data], &page, &ExtractionTuning::default())
        .expect("line extraction");
    assert_eq!(outcome.legend_name.as_deref(), Some("Revenue"));
    assert_eq!(table.element(line).expect("line").name(), "Revenue");
}

#[test]
fn distant_legend_words_are_skipped_not_terminal() {
    let mut table = DataTable::new();
    let line = table.add_series(ElementKind::Line, "Line 1").expect("series");
    let data = segment(0.0, 100.0, 200.0, 50.0, ShapeStyle::stroked("#2ca02c"));
    let swatch = segment(300.0, 20.0, 320.0, 20.0, ShapeStyle::stroked("#2ca02c"));

    let mut page = vec![data.clone(), swatch];
    page.extend(glyph_run("Revenue", 325.0, 24.0));
    // 23px after "Revenue": too far for a 6px glyph.
    page.extend(glyph_run("x", 390.0, 24.0));
    // 43px after "Revenue", but a 24px glyph allows up to 48px.
    page.push(ShapeCommand::text(
        TextRun::new("Q", 410.0, 34.0, FontDescriptor::new("sans-serif", 40.0)),
        ShapeStyle::default(),
        Transform::IDENTITY,
        &ApproximateFontMetrics::default(),
    ));

    let outcome = extract_series(&mut table, line, &[data], &page, &ExtractionTuning::default())
        .expect("line extraction");
    assert_eq!(outcome.legend_name.as_deref(), Some("Revenue Q"));
}

#[test]
fn legend_is_skipped_without_a_matching_swatch() {
    let mut table = DataTable::new();
    let line = table.add_series(ElementKind::Line, "Line 1").expect("series");
    let data = segment(0.0, 100.0, 200.0, 50.0, ShapeStyle::stroked("#d62728"));
    let mut page = vec![data.clone()];
    page.extend(glyph_run("Revenue", 325.0, 24.0));

    let outcome = extract_series(&mut table, line, &[data], &page, &ExtractionTuning::default())
        .expect("line extraction");
    assert_eq!(outcome.legend_name, None);
    assert_eq!(table.element(line).expect("line").name(), "Line 1");
}

fn box_plot_shapes(x: f64) -> Vec<ShapeCommand> {
    vec![
        segment(x, 10.0, x, 50.0, ShapeStyle::stroked("#000")),
        rectangle(x - 5.0, 20.0, 10.0, 20.0, ShapeStyle::stroked("#000")),
        segment(x - 5.0, 30.0, x + 5.0, 30.0, ShapeStyle::stroked("#000")),
    ]
}

#[test]
fn box_plot_fills_series_and_quartile_parts() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    let mut selected = box_plot_shapes(100.0);
    selected.extend(box_plot_shapes(200.0));

    let outcome = extract_series(&mut table, boxes, &selected, &[], &ExtractionTuning::default())
        .expect("box plot extraction");
    assert_eq!(outcome.points_written, 2);

    let [q3, q1, min, max] = table.ensure_box_plot_parts(boxes).expect("parts exist");
    assert_eq!(pixels(&table, boxes), vec![(100.0, 30.0), (200.0, 30.0)]);
    assert_eq!(pixels(&table, q3), vec![(100.0, 40.0), (200.0, 40.0)]);
    assert_eq!(pixels(&table, q1), vec![(100.0, 20.0), (200.0, 20.0)]);
    assert_eq!(pixels(&table, min), vec![(100.0, 10.0), (200.0, 10.0)]);
    assert_eq!(pixels(&table, max), vec![(100.0, 50.0), (200.0, 50.0)]);
    assert_eq!(table.len(), 5);
}

#[test]
fn box_plot_reextraction_replaces_points() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    let tuning = ExtractionTuning::default();
    extract_series(&mut table, boxes, &box_plot_shapes(100.0), &[], &tuning).expect("first");
    extract_series(&mut table, boxes, &box_plot_shapes(100.0), &[], &tuning).expect("second");
    assert_eq!(pixels(&table, boxes), vec![(100.0, 30.0)]);
}

#[test]
fn box_plot_without_box_falls_back_to_extent() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    let whisker = segment(50.0, 0.0, 50.0, 100.0, ShapeStyle::stroked("#000"));
    extract_series(&mut table, boxes, &[whisker], &[], &ExtractionTuning::default())
        .expect("box plot extraction");
    assert_eq!(pixels(&table, boxes), vec![(50.0, 50.0)]);
}

#[test]
fn error_bars_only_ever_widen() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Scatter, "s").expect("series");
    {
        let element = table.element_mut(series).expect("series");
        element.push_point(AxisCoordinate2D::new(100.0, 50.0));
        element.push_point(AxisCoordinate2D::new(200.0, 60.0));
    }
    let (upper, lower) = table.add_error_bars(series).expect("error bars");
    let tuning = ExtractionTuning::default();
    let whiskers = [
        segment(100.0, 30.0, 100.0, 70.0, ShapeStyle::stroked("#000")),
        segment(200.5, 45.0, 200.5, 75.0, ShapeStyle::stroked("#000")),
        segment(150.0, 0.0, 150.0, 90.0, ShapeStyle::stroked("#000")),
    ];

    let outcome = extract_series(&mut table, upper, &whiskers, &[], &tuning).expect("upper");
    assert_eq!(outcome.points_written, 2);
    extract_series(&mut table, lower, &whiskers, &[], &tuning).expect("lower");
    assert_eq!(pixels(&table, upper), vec![(100.0, 30.0), (200.0, 45.0)]);
    assert_eq!(pixels(&table, lower), vec![(100.0, 70.0), (200.0, 75.0)]);

    let narrower = [segment(100.0, 40.0, 100.0, 60.0, ShapeStyle::stroked("#000"))];
    extract_series(&mut table, upper, &narrower, &[], &tuning).expect("upper again");
    extract_series(&mut table, lower, &narrower, &[], &tuning).expect("lower again");
    assert_eq!(pixels(&table, upper)[0], (100.0, 30.0));
    assert_eq!(pixels(&table, lower)[0], (100.0, 70.0));
}

#[test]
fn unsupported_kinds_leave_the_table_untouched() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    let [_, q1, _, _] = table.ensure_box_plot_parts(boxes).expect("parts");
    let before = table.len();

    let err = extract_series(&mut table, q1, &box_plot_shapes(10.0), &[], &ExtractionTuning::default())
        .expect_err("sub-element has no extractor");
    assert!(matches!(err, ExtractError::Unsupported { kind: ElementKind::BoxPlotQ1 }));
    assert_eq!(table.len(), before);
    assert!(table.element(q1).expect("q1").data().is_empty());
    assert!(table.element(q1).expect("q1").shapes().is_empty());
}

fn axis_page() -> (Vec<ShapeCommand>, Vec<ShapeCommand>) {
    let mut labels = glyph_run("0", 7.0, 220.0);
    labels.extend(glyph_run("50", 54.0, 220.0));
    labels.extend(glyph_run("100", 101.0, 220.0));
    labels.extend(glyph_run("abc", 150.0, 220.0));
    let marks = vec![
        segment(10.0, 205.0, 10.0, 210.0, ShapeStyle::stroked("#000")),
        segment(60.0, 205.0, 60.0, 210.0, ShapeStyle::stroked("#000")),
        segment(110.0, 205.0, 110.0, 210.0, ShapeStyle::stroked("#000")),
    ];
    let mut page = labels.clone();
    page.extend(marks);
    (labels, page)
}

#[test]
fn axis_labels_snap_to_tick_marks_and_noise_is_dropped() {
    let (labels, page) = axis_page();
    let lines = texts_from_text_shapes(&labels).expect("labels");
    let mut axis = Axis::new("x", AxisDirection::Horizontal);

    let outcome = apply_axis_text(&mut axis, &lines, &labels, &page, &ExtractionTuning::default());
    let ticks: Vec<(f64, &str)> = axis.ticks().iter().map(|t| (t.pixel, t.label.as_str())).collect();
    assert_eq!(ticks, vec![(10.0, "0"), (60.0, "50"), (110.0, "100")]);
    assert_eq!(outcome.discarded_labels, vec!["abc".to_owned()]);
    assert!(outcome.warning().expect("warning").contains("abc"));
    assert!(!axis.is_categorical());
    assert_eq!(axis.pixel_to_tick(35.0), "25");
    assert_eq!(axis.shapes().len(), labels.len());
}

#[test]
fn mostly_textual_labels_make_a_categorical_axis() {
    let mut labels = glyph_run("Jan", 0.0, 220.0);
    labels.extend(glyph_run("Feb", 50.0, 220.0));
    labels.extend(glyph_run("2", 100.0, 220.0));
    let lines = texts_from_text_shapes(&labels).expect("labels");
    let mut axis = Axis::new("x", AxisDirection::Horizontal);

    let outcome = apply_axis_text(&mut axis, &lines, &labels, &labels, &ExtractionTuning::default());
    assert!(outcome.discarded_labels.is_empty());
    assert!(outcome.warning().is_none());
    assert!(axis.is_categorical());
    let ticks: Vec<(f64, &str)> = axis.ticks().iter().map(|t| (t.pixel, t.label.as_str())).collect();
    assert_eq!(ticks, vec![(9.0, "Jan"), (59.0, "Feb"), (103.0, "2")]);
}

#[test]
fn vertical_labels_look_for_marks_to_their_right() {
    let label_rect = Rect::new(0.0, 96.5, 12.0, 9.5);
    let label = TextChunk {
        text: "10".to_owned(),
        rect: label_rect,
        aligned_rect: label_rect,
    };
    let marks = [
        segment(15.0, 100.0, 20.0, 100.0, ShapeStyle::stroked("#000")),
        segment(15.0, 300.0, 20.0, 300.0, ShapeStyle::stroked("#000")),
    ];

    let pixel = accurate_tick_position(AxisDirection::Vertical, &label, &marks, 4.0);
    assert_eq!(pixel, 100.0);
    let fallback = accurate_tick_position(AxisDirection::Vertical, &label, &marks[1..], 4.0);
    assert_eq!(fallback, 101.25);
}
