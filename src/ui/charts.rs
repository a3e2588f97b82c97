use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Line, MarkerShape, Plot, PlotBounds, PlotPoints, Points};

use crate::data::aggregate;
use crate::data::filter::{ChartKind, YearFilter};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared drawing surface
// ---------------------------------------------------------------------------

const FRAME_WIDTH: f32 = 960.0;
const FRAME_HEIGHT: f32 = 500.0;
const MARGIN_TOP: f32 = 40.0;
const MARGIN_RIGHT: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 80.0;
const MARGIN_LEFT: f32 = 80.0;
const CONTENT_WIDTH: f32 = FRAME_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const CONTENT_HEIGHT: f32 = FRAME_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

/// Tooltip offset from the pointer, matching the original dashboard.
const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, -28.0);

const LINE_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // steelblue
const ACCENT_COLOR: Color32 = Color32::from_rgb(255, 165, 0); // orange
const HIGHLIGHT_RING: Color32 = Color32::RED;

/// Render the chart matching the current chart kind.  Everything is redrawn
/// from scratch each frame; the only state carried across renders is the
/// filter and the colour map.
pub fn chart_view(ui: &mut Ui, state: &mut AppState) {
    match state.filter.chart {
        ChartKind::Bar => bar_chart(ui, state),
        ChartKind::Line => line_chart(ui, state),
        ChartKind::Pie => pie_chart(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Bar chart: top-20 states by declaration count
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, state: &mut AppState) {
    let entries = aggregate::by_region(&state.records, &state.visible_indices);
    let max_count = entries.iter().map(|e| e.count).max().unwrap_or(0);

    let colors: Vec<Color32> = entries
        .iter()
        .map(|e| state.colors.color_for(&e.key))
        .collect();

    let title = match state.filter.year {
        YearFilter::All => "Top 20 States by Number of Disasters".to_string(),
        YearFilter::Year(y) => format!("Top 20 States by Number of Disasters ({y})"),
    };

    let tick_labels: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
    let x_formatter = move |mark: GridMark, _range: &RangeInclusive<f64>| -> String {
        let i = mark.value.round();
        if (mark.value - i).abs() < 1e-3 && i >= 0.0 && (i as usize) < tick_labels.len() {
            tick_labels[i as usize].clone()
        } else {
            String::new()
        }
    };

    ui.vertical_centered(|ui| {
        ui.heading(title);

        let response = Plot::new("bar_chart")
            .width(CONTENT_WIDTH)
            .height(CONTENT_HEIGHT)
            .x_axis_label("States")
            .y_axis_label("Number of Disasters")
            .x_axis_formatter(x_formatter)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [-0.6, 0.0],
                    [
                        entries.len().max(1) as f64 - 0.4,
                        max_count.max(1) as f64,
                    ],
                ));

                // Hit-test before drawing so the hovered bar can be dimmed.
                let hovered: Option<usize> = plot_ui.pointer_coordinate().and_then(|p| {
                    let i = p.x.round();
                    if (p.x - i).abs() > 0.4 || i < 0.0 {
                        return None;
                    }
                    let idx = i as usize;
                    (idx < entries.len() && p.y >= 0.0 && p.y <= entries[idx].count as f64)
                        .then_some(idx)
                });

                let bars: Vec<Bar> = entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        let fill = if hovered == Some(i) {
                            colors[i].gamma_multiply(0.7)
                        } else {
                            colors[i]
                        };
                        Bar::new(i as f64, e.count as f64).width(0.8).fill(fill)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars));

                hovered.map(|i| (entries[i].key.clone(), entries[i].count))
            });

        if let Some((key, count)) = response.inner {
            tooltip_at_pointer(ui, |ui| {
                ui.strong(key);
                ui.label(format!("Disasters: {count}"));
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Line chart: declarations per year, full record set
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, state: &mut AppState) {
    // Always the full record set: the trend is context for the selection.
    let series = aggregate::by_year(&state.records);

    let max_count = series.iter().map(|&(_, c)| c).max().unwrap_or(0);
    let y_max = nice_ceil(max_count as f64).max(1.0);
    let (mut x_min, mut x_max) = match (series.first(), series.last()) {
        (Some(&(a, _)), Some(&(b, _))) => (a as f64, b as f64),
        _ => (0.0, 1.0),
    };
    if x_min == x_max {
        x_min -= 0.5;
        x_max += 0.5;
    }

    let dots: Vec<[f64; 2]> = series
        .iter()
        .map(|&(y, c)| [y as f64, c as f64])
        .collect();
    let curve = monotone_curve(&dots);

    // Ring around the selected year's point, when that year has data.
    let selected: Option<[f64; 2]> = match state.filter.year {
        YearFilter::Year(y) => dots.iter().copied().find(|p| p[0] == y as f64),
        YearFilter::All => None,
    };

    let x_formatter = |mark: GridMark, _range: &RangeInclusive<f64>| -> String {
        let v = mark.value;
        if (v - v.round()).abs() < 1e-6 {
            format!("{}", v.round() as i64)
        } else {
            String::new()
        }
    };

    ui.vertical_centered(|ui| {
        ui.heading("Disasters Over Time");

        let response = Plot::new("line_chart")
            .width(CONTENT_WIDTH)
            .height(CONTENT_HEIGHT)
            .x_axis_label("Year")
            .y_axis_label("Number of Disasters")
            .x_axis_formatter(x_formatter)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, 0.0], [x_max, y_max]));

                let bounds = plot_ui.plot_bounds();
                let hovered: Option<(i32, usize)> = plot_ui.pointer_coordinate().and_then(|p| {
                    let tol_x = bounds.width() / 60.0;
                    let tol_y = bounds.height() / 20.0;
                    series
                        .iter()
                        .filter(|&&(y, c)| {
                            (p.x - y as f64).abs() <= tol_x && (p.y - c as f64).abs() <= tol_y
                        })
                        .min_by(|a, b| {
                            let da = (p.x - a.0 as f64).abs();
                            let db = (p.x - b.0 as f64).abs();
                            da.total_cmp(&db)
                        })
                        .copied()
                });

                if dots.len() > 1 {
                    plot_ui.line(
                        Line::new(PlotPoints::from(curve))
                            .color(LINE_COLOR)
                            .width(2.0),
                    );
                }
                if !dots.is_empty() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(dots))
                            .shape(MarkerShape::Circle)
                            .radius(5.0)
                            .filled(true)
                            .color(LINE_COLOR),
                    );
                }
                if let Some((y, c)) = hovered {
                    plot_ui.points(
                        Points::new(vec![[y as f64, c as f64]])
                            .shape(MarkerShape::Circle)
                            .radius(8.0)
                            .filled(true)
                            .color(ACCENT_COLOR),
                    );
                }
                if let Some(point) = selected {
                    plot_ui.points(
                        Points::new(vec![point])
                            .shape(MarkerShape::Circle)
                            .radius(10.0)
                            .filled(false)
                            .color(HIGHLIGHT_RING),
                    );
                }

                hovered
            });

        if let Some((year, count)) = response.inner {
            tooltip_at_pointer(ui, |ui| {
                ui.strong(format!("Year: {year}"));
                ui.label(format!("Disasters: {count}"));
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Pie chart: declarations by incident type
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, state: &mut AppState) {
    let entries = aggregate::by_category(&state.records, &state.visible_indices);
    let total: usize = entries.iter().map(|e| e.count).sum();

    ui.vertical_centered(|ui| {
        ui.heading("Disasters by Incident Type");

        let (response, painter) =
            ui.allocate_painter(Vec2::new(FRAME_WIDTH, FRAME_HEIGHT), Sense::hover());
        let content = Rect::from_min_max(
            response.rect.min + Vec2::new(MARGIN_LEFT, MARGIN_TOP),
            response.rect.max - Vec2::new(MARGIN_RIGHT, MARGIN_BOTTOM),
        );
        let center = content.center();
        let r_full = content.width().min(content.height()) / 2.0;
        let slice_r = r_full * 0.8;
        let ring_r = r_full * 0.9;
        let label_x = r_full * 0.95;

        // Empty-but-valid surface when nothing matches the filter.
        if total == 0 {
            return;
        }

        // Wedge sweep angles, clockwise from 12 o'clock, in aggregate order
        // (count descending).
        let mut wedges: Vec<(f32, f32)> = Vec::with_capacity(entries.len());
        let mut start = 0.0f32;
        for e in &entries {
            let sweep = e.count as f32 / total as f32 * TAU;
            wedges.push((start, start + sweep));
            start += sweep;
        }

        let hovered: Option<usize> = response.hover_pos().and_then(|pos| {
            let v = pos - center;
            if v.length() > slice_r {
                return None;
            }
            let mut angle = v.x.atan2(-v.y); // clockwise from top
            if angle < 0.0 {
                angle += TAU;
            }
            wedges.iter().position(|&(s, e)| angle >= s && angle < e)
        });

        let text_color = ui.visuals().strong_text_color();

        for (i, (&(s, e), entry)) in wedges.iter().zip(&entries).enumerate() {
            let base = state.colors.color_for(&entry.key);
            let fill = if hovered == Some(i) {
                base
            } else {
                base.gamma_multiply(0.7)
            };

            // Fill in convex chunks; a sector wider than a half turn is not
            // convex, so split before tessellation.
            let mut a0 = s;
            while a0 < e {
                let a1 = (a0 + FRAC_PI_2).min(e);
                painter.add(Shape::convex_polygon(
                    sector_points(center, slice_r, a0, a1),
                    fill,
                    Stroke::NONE,
                ));
                a0 = a1;
            }
            // White separator outline over the whole wedge.
            painter.add(Shape::closed_line(
                sector_points(center, slice_r, s, e),
                Stroke::new(2.0, Color32::WHITE),
            ));

            // Connector from the wedge edge through the anchor ring to the
            // label column; first half of the sweep anchors on the right.
            let mid = (s + e) / 2.0;
            let right_side = mid < PI;
            let edge = polar(center, slice_r, mid);
            let elbow = polar(center, ring_r, mid);
            let label_pos = Pos2::new(
                center.x + if right_side { label_x } else { -label_x },
                elbow.y,
            );
            painter.add(Shape::line(
                vec![edge, elbow, label_pos],
                Stroke::new(1.0, text_color),
            ));

            let anchor = if right_side {
                Align2::LEFT_CENTER
            } else {
                Align2::RIGHT_CENTER
            };
            let percent = aggregate::percent_of(entry.count, total);
            painter.text(
                label_pos,
                anchor,
                format!("{}\n{percent}%", truncate_label(&entry.key)),
                FontId::proportional(12.0),
                text_color,
            );
        }

        if let Some(i) = hovered {
            let entry = &entries[i];
            let percent = aggregate::percent_of(entry.count, total);
            let (key, count) = (entry.key.clone(), entry.count);
            tooltip_at_pointer(ui, move |ui| {
                ui.strong(key);
                ui.label(format!("Count: {count}"));
                ui.label(format!("{percent}%"));
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Geometry and formatting helpers
// ---------------------------------------------------------------------------

/// Point on a circle, with the angle measured clockwise from 12 o'clock.
fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(
        center.x + radius * angle.sin(),
        center.y - radius * angle.cos(),
    )
}

/// Closed sector outline: center, then the arc from `start` to `end`.
fn sector_points(center: Pos2, radius: f32, start: f32, end: f32) -> Vec<Pos2> {
    let sweep = end - start;
    let steps = ((sweep / 0.05).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for k in 0..=steps {
        points.push(polar(center, radius, start + sweep * k as f32 / steps as f32));
    }
    points
}

/// Floating tooltip at the pointer with the dashboard's (+10, -28) offset.
fn tooltip_at_pointer(ui: &Ui, add_contents: impl FnOnce(&mut Ui)) {
    if let Some(pos) = ui.ctx().pointer_hover_pos() {
        egui::Area::new(egui::Id::new("chart_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(pos + TOOLTIP_OFFSET)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, add_contents);
            });
    }
}

/// Truncate a category name to 12 characters plus an ellipsis.
fn truncate_label(name: &str) -> String {
    if name.chars().count() > 12 {
        let head: String = name.chars().take(12).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Round up to a "nice" axis bound: 1, 2 or 5 times a power of ten.
fn nice_ceil(v: f64) -> f64 {
    if v <= 0.0 {
        return 0.0;
    }
    let base = 10f64.powf(v.log10().floor());
    let frac = v / base;
    let nice = if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Sample a monotone cubic interpolant (Fritsch-Carlson tangents) through
/// the given points, which must be sorted by x.  Fewer than three points
/// are returned unchanged.
fn monotone_curve(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut secants = vec![0.0f64; n - 1];
    for i in 0..n - 1 {
        secants[i] = (points[i + 1][1] - points[i][1]) / (points[i + 1][0] - points[i][0]);
    }

    let mut tangents = vec![0.0f64; n];
    tangents[0] = secants[0];
    tangents[n - 1] = secants[n - 2];
    for i in 1..n - 1 {
        tangents[i] = if secants[i - 1] * secants[i] <= 0.0 {
            0.0
        } else {
            (secants[i - 1] + secants[i]) / 2.0
        };
    }
    for i in 0..n - 1 {
        if secants[i] == 0.0 {
            tangents[i] = 0.0;
            tangents[i + 1] = 0.0;
            continue;
        }
        let a = tangents[i] / secants[i];
        let b = tangents[i + 1] / secants[i];
        let s = a * a + b * b;
        if s > 9.0 {
            let t = 3.0 / s.sqrt();
            tangents[i] = t * a * secants[i];
            tangents[i + 1] = t * b * secants[i];
        }
    }

    const SAMPLES_PER_SEGMENT: usize = 16;
    let mut out = Vec::with_capacity((n - 1) * SAMPLES_PER_SEGMENT + 1);
    for i in 0..n - 1 {
        let [x0, y0] = points[i];
        let [x1, y1] = points[i + 1];
        let h = x1 - x0;
        for s in 0..SAMPLES_PER_SEGMENT {
            let t = s as f64 / SAMPLES_PER_SEGMENT as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            out.push([
                x0 + t * h,
                h00 * y0 + h10 * h * tangents[i] + h01 * y1 + h11 * h * tangents[i + 1],
            ]);
        }
    }
    out.extend(points.last().copied());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ceil_rounds_to_one_two_five() {
        assert_eq!(nice_ceil(0.0), 0.0);
        assert_eq!(nice_ceil(1.0), 1.0);
        assert_eq!(nice_ceil(3.0), 5.0);
        assert_eq!(nice_ceil(7.0), 10.0);
        assert_eq!(nice_ceil(17.0), 20.0);
        assert_eq!(nice_ceil(42.0), 50.0);
        assert_eq!(nice_ceil(130.0), 200.0);
        assert_eq!(nice_ceil(500.0), 500.0);
    }

    #[test]
    fn truncate_label_caps_at_twelve_chars() {
        assert_eq!(truncate_label("Flood"), "Flood");
        assert_eq!(truncate_label("TwelveChars!"), "TwelveChars!");
        assert_eq!(truncate_label("Severe Ice Storm"), "Severe Ice S...");
    }

    #[test]
    fn monotone_curve_passes_through_knots() {
        let knots = vec![[2000.0, 3.0], [2001.0, 7.0], [2002.0, 4.0], [2003.0, 9.0]];
        let curve = monotone_curve(&knots);

        assert_eq!(curve.first().copied(), Some([2000.0, 3.0]));
        assert_eq!(curve.last().copied(), Some([2003.0, 9.0]));
        for knot in &knots {
            assert!(curve
                .iter()
                .any(|p| (p[0] - knot[0]).abs() < 1e-9 && (p[1] - knot[1]).abs() < 1e-9));
        }
    }

    #[test]
    fn monotone_curve_does_not_overshoot_monotone_data() {
        let knots = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 10.0], [3.0, 11.0]];
        let curve = monotone_curve(&knots);
        for pair in curve.windows(2) {
            assert!(pair[1][1] >= pair[0][1] - 1e-9, "curve dipped: {pair:?}");
        }
        for p in &curve {
            assert!(p[1] <= 11.0 + 1e-9 && p[1] >= -1e-9);
        }
    }

    #[test]
    fn monotone_curve_short_inputs_unchanged() {
        let two = vec![[0.0, 1.0], [1.0, 2.0]];
        assert_eq!(monotone_curve(&two), two);
        assert!(monotone_curve(&[]).is_empty());
    }

    #[test]
    fn sector_points_start_at_center_and_stay_on_radius() {
        let center = Pos2::new(100.0, 100.0);
        let points = sector_points(center, 50.0, 0.0, PI / 2.0);
        assert_eq!(points[0], center);
        for p in &points[1..] {
            let d = (*p - center).length();
            assert!((d - 50.0).abs() < 1e-3);
        }
        // first arc point is straight up, last is to the right
        assert!((points[1].y - 50.0).abs() < 1e-3);
        let last = points.last().unwrap();
        assert!((last.x - 150.0).abs() < 1e-3);
    }
}
