use approx::assert_abs_diff_eq;
use chart_extract::core::axis::{clean_tick_label, format_value, parse_numeric_label};
use chart_extract::core::coordinate::interpolate;
use chart_extract::core::{Axis, AxisCoordinate1D, AxisCoordinate2D, AxisDirection, Interpolation};

fn linear_axis() -> Axis {
    let mut axis = Axis::new("x", AxisDirection::Horizontal);
    axis.add_tick_value("0", 10.0);
    axis.add_tick_value("100", 110.0);
    axis
}

fn month_axis() -> Axis {
    let mut axis = Axis::new("months", AxisDirection::Horizontal);
    axis.add_tick_value("Mar", 90.0);
    axis.add_tick_value("Jan", 10.0);
    axis.add_tick_value("Feb", 50.0);
    axis
}

#[test]
fn linear_axis_maps_both_ways() {
    let axis = linear_axis();
    assert_eq!(axis.interpolation(), Interpolation::Linear);
    assert_eq!(axis.pixel_to_tick(60.0), "50");
    assert_eq!(axis.pixel_to_tick(10.0), "0");
    assert_eq!(axis.pixel_to_tick(160.0), "150");
    let pixel = axis.tick_to_pixel("75").expect("numeric label");
    assert_abs_diff_eq!(pixel, 85.0, epsilon = 1e-9);
}

#[test]
fn linear_axis_rejects_non_numeric_labels() {
    let axis = linear_axis();
    assert!(axis.tick_to_pixel("abc").is_err());
}

#[test]
fn inverted_vertical_axis_projects_between_extreme_ticks() {
    let mut axis = Axis::new("y", AxisDirection::Vertical);
    axis.add_tick_value("0", 400.0);
    axis.add_tick_value("50", 250.0);
    axis.add_tick_value("100", 100.0);
    assert_eq!(axis.ticks()[0].label, "100");
    assert_eq!(axis.pixel_to_tick(250.0), "50");
    let pixel = axis.tick_to_pixel("25").expect("numeric label");
    assert_abs_diff_eq!(pixel, 325.0, epsilon = 1e-9);
}

#[test]
fn ticks_stay_sorted_by_pixel() {
    let axis = month_axis();
    let labels: Vec<&str> = axis.ticks().iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, ["Jan", "Feb", "Mar"]);
    let pixels: Vec<f64> = axis.tick_coordinates().iter().map(|c| c.pixel).collect();
    assert_eq!(pixels, vec![10.0, 50.0, 90.0]);
}

#[test]
fn categorical_axis_snaps_to_nearest_tick() {
    let axis = month_axis();
    assert!(axis.is_categorical());
    assert_eq!(axis.interpolation_name(), "Categorical");
    assert_eq!(axis.pixel_to_tick(45.0), "Feb");
    assert_eq!(axis.pixel_to_tick(-100.0), "Jan");
    assert_eq!(axis.pixel_to_tick(1000.0), "Mar");
    assert_eq!(axis.tick_to_pixel("Mar").expect("known label"), 90.0);
    assert_eq!(axis.tick_to_pixel("Dec").expect("falls back"), 10.0);
}

#[test]
fn categorical_mode_is_never_demoted() {
    let mut axis = Axis::new("x", AxisDirection::Horizontal);
    axis.add_tick_value("n/a", 0.0);
    axis.add_tick_value("1", 10.0);
    axis.add_tick_value("2", 20.0);
    assert_eq!(axis.interpolation(), Interpolation::Categorical);

    axis.clear();
    assert_eq!(axis.interpolation(), Interpolation::Linear);
    assert!(axis.ticks().is_empty());
    assert!(axis.shapes().is_empty());
}

#[test]
fn empty_axis_is_the_identity() {
    let axis = Axis::new("x", AxisDirection::Horizontal);
    assert_eq!(axis.pixel_to_tick(12.5), "12.5");
    assert_eq!(axis.tick_to_pixel("3").expect("numeric"), 3.0);
    assert!(axis.tick_to_pixel("three").is_err());
    assert!(axis.resampled_ticks(5).is_empty());
}

#[test]
fn single_tick_axis_is_constant() {
    let mut axis = Axis::new("x", AxisDirection::Horizontal);
    axis.add_tick_value("2020", 40.0);
    assert_eq!(axis.pixel_to_tick(0.0), "2020");
    assert_eq!(axis.pixel_to_tick(999.0), "2020");
    assert_eq!(axis.tick_to_pixel("1999").expect("single tick"), 40.0);
}

#[test]
fn resampling_spreads_evenly_between_outer_ticks() {
    let axis = linear_axis();
    let pixels: Vec<f64> = axis.resampled_ticks(3).iter().map(|c| c.pixel).collect();
    assert_eq!(pixels, vec![10.0, 60.0, 110.0]);
    assert_eq!(axis.resampled_ticks(1).len(), 1);
    assert!(axis.resampled_ticks(0).is_empty());
}

#[test]
fn snapshot_restores_ticks_and_mode() {
    let mut axis = linear_axis();
    let snapshot = axis.snapshot();
    axis.add_tick_value("oops", 55.0);
    assert!(axis.is_categorical());

    axis.restore(snapshot);
    assert_eq!(axis.interpolation(), Interpolation::Linear);
    assert_eq!(axis.ticks().len(), 2);
}

#[test]
fn coordinate_values_follow_their_axis() {
    let axis = linear_axis();
    let mut coordinate = AxisCoordinate1D::new(35.0);
    assert_eq!(coordinate.value(&axis), "25");
    coordinate.set_value(&axis, "90").expect("numeric");
    assert_abs_diff_eq!(coordinate.pixel, 100.0, epsilon = 1e-9);
}

#[test]
fn interpolation_handles_unsorted_points() {
    let points = [
        AxisCoordinate2D::new(30.0, 300.0),
        AxisCoordinate2D::new(10.0, 100.0),
        AxisCoordinate2D::new(20.0, 200.0),
    ];
    let mid = interpolate(&points, 25.0).expect("inside range");
    assert_abs_diff_eq!(mid.y.pixel, 250.0, epsilon = 1e-9);
    assert_eq!(interpolate(&points, 20.0), Some(points[2]));
    assert_eq!(interpolate(&points, 5.0), None);
    assert_eq!(interpolate(&points, 31.0), None);
}

#[test]
fn label_helpers_normalize_pdf_text() {
    assert_eq!(clean_tick_label("\u{2212}12"), "-12");
    assert_eq!(clean_tick_label("âˆ’3.5"), "-3.5");
    assert_eq!(parse_numeric_label(" 42 "), Some(42.0));
    assert_eq!(parse_numeric_label("inf"), None);
    assert_eq!(parse_numeric_label("NaN"), None);
    assert_eq!(format_value(-0.0), "0");
    assert_eq!(format_value(2.5), "2.5");
    assert_eq!(format_value(100.0), "100");
}
