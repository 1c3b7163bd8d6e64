use chart_extract::ExtractError;
use chart_extract::core::{
    AxisCoordinate2D, DataTable, ElementKind, LinkSlot, PathOp, ShapeCommand, ShapeStyle,
    Transform,
};

fn swatch(color: &str) -> ShapeCommand {
    ShapeCommand::path(
        vec![PathOp::move_to(0.0, 0.0), PathOp::line_to(10.0, 0.0)],
        ShapeStyle::stroked(color),
        Transform::IDENTITY,
    )
}

fn names(table: &DataTable) -> Vec<&str> {
    table.elements().iter().map(|element| element.name()).collect()
}

#[test]
fn new_table_has_default_names() {
    let table = DataTable::new();
    assert_eq!(table.name(), "Chart Title");
    assert_eq!(table.x_axis().name(), "Horizontal (X) Axis");
    assert_eq!(table.y_axis().name(), "Vertical (Y) Axis");
    assert!(table.is_empty());
}

#[test]
fn only_series_kinds_can_be_added_directly() {
    let mut table = DataTable::new();
    assert!(table.add_series(ElementKind::Line, "line").is_ok());
    for kind in [ElementKind::Axis, ElementKind::ErrorBar, ElementKind::BoxPlotQ1] {
        let err = table.add_series(kind, "bad").expect_err("not a series kind");
        assert!(matches!(err, ExtractError::Unsupported { kind: rejected } if rejected == kind));
    }
    assert_eq!(table.len(), 1);
}

#[test]
fn error_bars_are_inserted_right_after_their_series() {
    let mut table = DataTable::new();
    let first = table.add_series(ElementKind::Scatter, "first").expect("series");
    let _second = table.add_series(ElementKind::Line, "second").expect("series");

    let (upper, lower) = table.add_error_bars(first).expect("error bars");
    assert_eq!(names(&table), ["first", "↳ Error ⏉", "↳ Error ⏊", "second"]);

    let series = table.element(first).expect("series");
    assert_eq!(series.upper_error_bar(), Some(upper));
    assert_eq!(series.lower_error_bar(), Some(lower));
    assert!(series.has_error_bars());
    assert_eq!(table.element(upper).expect("upper").owner(), Some(first));
    assert_eq!(table.element(upper).expect("upper").kind(), ElementKind::ErrorBar);

    let again = table.add_error_bars(first).expect("idempotent");
    assert_eq!(again, (upper, lower));
    assert_eq!(table.len(), 4);
}

#[test]
fn error_bars_are_refused_where_they_make_no_sense() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    assert!(table.add_error_bars(boxes).is_err());

    let line = table.add_series(ElementKind::Line, "line").expect("series");
    let (upper, _) = table.add_error_bars(line).expect("error bars");
    assert!(table.add_error_bars(upper).is_err());
}

#[test]
fn box_plot_parts_follow_the_series_in_order() {
    let mut table = DataTable::new();
    let boxes = table.add_series(ElementKind::BoxPlot, "boxes").expect("series");
    let tail = table.add_series(ElementKind::Bar, "tail").expect("series");
    let parts = table.ensure_box_plot_parts(boxes).expect("parts");
    assert_eq!(names(&table), ["boxes", "↳ Q3", "↳ Q1", "↳ Min", "↳ Max", "tail"]);
    assert_eq!(table.element(boxes).expect("series").link(LinkSlot::Q1), Some(parts[1]));
    assert_eq!(table.ensure_box_plot_parts(boxes).expect("again"), parts);
    assert!(table.ensure_box_plot_parts(tail).is_err());
}

#[test]
fn cloned_table_keeps_every_reference_inside_the_clone() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Bar, "bars").expect("series");
    let (upper, lower) = table.add_error_bars(series).expect("error bars");
    let boxes = table.add_series(ElementKind::BoxPlot, "box").expect("series");
    table.ensure_box_plot_parts(boxes).expect("parts");

    let mut copy = table.clone();
    copy.check_links().expect("links resolve in the copy");
    let copied = copy.element(series).expect("series in copy");
    assert_eq!(copied.upper_error_bar(), Some(upper));
    assert_eq!(copy.element(lower).expect("lower").owner(), Some(series));

    copy.element_mut(series).expect("series").set_name("renamed");
    assert_eq!(table.element(series).expect("series").name(), "bars");
}

#[test]
fn error_bar_data_is_padded_from_the_series() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Scatter, "s").expect("series");
    {
        let element = table.element_mut(series).expect("series");
        element.push_point(AxisCoordinate2D::new(10.0, 100.0));
        element.push_point(AxisCoordinate2D::new(20.0, 200.0));
        element.push_point(AxisCoordinate2D::new(30.0, 300.0));
    }
    let (upper, _) = table.add_error_bars(series).expect("error bars");
    table
        .element_mut(upper)
        .expect("upper")
        .push_point(AxisCoordinate2D::new(10.0, 90.0));

    let resolved = table.resolved_data(upper).expect("resolved");
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].y.pixel, 90.0);
    assert_eq!(resolved[2], AxisCoordinate2D::new(30.0, 300.0));
    assert_eq!(table.element(upper).expect("upper").data().len(), 1);

    let stored = table.data_mut(upper).expect("padded in place");
    assert_eq!(stored.len(), 3);
    stored[1].y.pixel = 180.0;
    assert_eq!(table.element(upper).expect("upper").data()[1].y.pixel, 180.0);
}

#[test]
fn removing_a_series_removes_its_sub_elements() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Line, "line").expect("series");
    let other = table.add_series(ElementKind::Bar, "bar").expect("series");
    let (upper, lower) = table.add_error_bars(series).expect("error bars");

    let removed = table.remove_element(series).expect("removed");
    assert_eq!(removed.name(), "line");
    assert_eq!(names(&table), ["bar"]);
    assert!(table.element(upper).is_err());
    assert!(table.element(lower).is_err());
    assert!(table.element(other).is_ok());
    table.check_links().expect("no dangling links");
}

#[test]
fn removing_a_sub_element_clears_its_slot() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Scatter, "s").expect("series");
    let (upper, lower) = table.add_error_bars(series).expect("error bars");

    table.remove_element(upper).expect("removed");
    let element = table.element(series).expect("series");
    assert_eq!(element.upper_error_bar(), None);
    assert_eq!(element.lower_error_bar(), Some(lower));
    table.check_links().expect("no dangling links");

    let err = table.remove_element(upper).expect_err("already gone");
    assert!(matches!(err, ExtractError::UnknownElement(id) if id == upper));
}

#[test]
fn main_color_prefers_colorful_majority_and_is_inherited() {
    let mut table = DataTable::new();
    let series = table.add_series(ElementKind::Line, "line").expect("series");
    table.element_mut(series).expect("series").attach_shapes([
        swatch("#000000"),
        swatch("#000000"),
        swatch("#1f77b4"),
    ]);
    let (upper, _) = table.add_error_bars(series).expect("error bars");

    assert_eq!(table.main_color(series).expect("color").as_deref(), Some("#1f77b4"));
    assert_eq!(table.main_color(upper).expect("color").as_deref(), Some("#1f77b4"));

    table.element_mut(series).expect("series").attach_shapes([
        swatch("#ff7f0e"),
        swatch("#ff7f0e"),
    ]);
    assert_eq!(table.main_color(series).expect("color").as_deref(), Some("#ff7f0e"));

    let empty = table.add_series(ElementKind::Bar, "empty").expect("series");
    assert_eq!(table.main_color(empty).expect("color"), None);
}

#[test]
fn lookups_interpolate_only_line_series() {
    let mut table = DataTable::new();
    let line = table.add_series(ElementKind::Line, "line").expect("series");
    let scatter = table.add_series(ElementKind::Scatter, "scatter").expect("series");
    for id in [line, scatter] {
        let element = table.element_mut(id).expect("series");
        element.push_point(AxisCoordinate2D::new(0.0, 0.0));
        element.push_point(AxisCoordinate2D::new(10.0, 100.0));
    }
    table
        .element_mut(scatter)
        .expect("scatter")
        .push_point(AxisCoordinate2D::new(10.0, 50.0));

    let mid = table.at_pixel_x(line, 5.0, 0).expect("lookup").expect("interpolated");
    assert_eq!(mid.y.pixel, 50.0);
    assert_eq!(table.at_pixel_x(scatter, 5.0, 0).expect("lookup"), None);
    let second = table.at_pixel_x(scatter, 10.0, 1).expect("lookup").expect("duplicate");
    assert_eq!(second.y.pixel, 50.0);
    assert_eq!(table.at_pixel_x(line, 11.0, 0).expect("lookup"), None);
}

#[test]
fn cell_edits_move_points_through_the_y_axis() {
    let mut table = DataTable::new();
    table.y_axis_mut().add_tick_value("0", 200.0);
    table.y_axis_mut().add_tick_value("10", 100.0);
    table.x_axis_mut().add_tick_value("A", 10.0);
    table.x_axis_mut().add_tick_value("B", 20.0);
    let bars = table.add_series(ElementKind::Bar, "bars").expect("series");
    table
        .element_mut(bars)
        .expect("bars")
        .push_point(AxisCoordinate2D::new(20.0, 150.0));

    let element = table.element(bars).expect("bars");
    let y = element.at_tick_x("B", table.x_axis()).expect("point at B");
    assert_eq!(y.value(table.y_axis()), "5");
    assert!(element.at_tick_x("A", table.x_axis()).is_none());

    assert!(table.set_y_value(bars, 20.0, 0, "8").expect("numeric"));
    let point = table.element(bars).expect("bars").data()[0];
    assert_eq!(table.values_of(&point), ("B".to_owned(), "8".to_owned()));
    assert!(!table.set_y_value(bars, 99.0, 0, "8").expect("numeric"));
    assert!(table.set_y_value(bars, 20.0, 0, "eight").is_err());
}
