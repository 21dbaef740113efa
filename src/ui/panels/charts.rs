// ReviewScope - ui/panels/charts.rs
//
// The five dashboard charts, drawn directly with the egui painter:
// sentiment pie, polarity/length scatter, stacked length histogram,
// length box plot per label, and polarity density with a rug strip.
//
// All data comes precomputed from `state.view`; this module only maps
// values to screen space.

use crate::app::state::AppState;
use crate::core::aggregate::{BoxStats, Histogram};
use crate::core::model::SentimentLabel;
use crate::ui::theme;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};
use std::f32::consts::TAU;

const MARGIN_LEFT: f32 = 52.0;
const MARGIN_RIGHT: f32 = 12.0;
const MARGIN_TOP: f32 = 8.0;
const MARGIN_BOTTOM: f32 = 30.0;
const TICK_TARGET: usize = 5;
const RUG_HEIGHT: f32 = 36.0;

/// Render every chart for the current selection.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.columns(2, |cols| {
        pie_chart(&mut cols[0], state);
        scatter_chart(&mut cols[1], state);
    });

    ui.add_space(12.0);

    ui.columns(2, |cols| {
        length_histogram(&mut cols[0], state);
        length_box_plot(&mut cols[1], state);
    });

    ui.add_space(12.0);
    ui.heading("\u{1f4c8} Sentiment Polarity Distribution");
    polarity_density(ui, state);
}

// =============================================================================
// Plot frame (value -> screen mapping and axes)
// =============================================================================

/// Value ranges mapped onto a screen rectangle.
struct PlotFrame {
    rect: Rect,
    x: (f64, f64),
    y: (f64, f64),
}

impl PlotFrame {
    fn new(outer: Rect, x: (f64, f64), y: (f64, f64)) -> Self {
        let rect = Rect::from_min_max(
            Pos2::new(outer.left() + MARGIN_LEFT, outer.top() + MARGIN_TOP),
            Pos2::new(outer.right() - MARGIN_RIGHT, outer.bottom() - MARGIN_BOTTOM),
        );
        Self {
            rect,
            x: widen(x),
            y: widen(y),
        }
    }

    fn x_px(&self, x: f64) -> f32 {
        let t = (x - self.x.0) / (self.x.1 - self.x.0);
        self.rect.left() + t as f32 * self.rect.width()
    }

    fn y_px(&self, y: f64) -> f32 {
        let t = (y - self.y.0) / (self.y.1 - self.y.0);
        self.rect.bottom() - t as f32 * self.rect.height()
    }

    fn pos(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(self.x_px(x), self.y_px(y))
    }

    /// Data x coordinate under a screen position.
    fn x_value(&self, px: f32) -> f64 {
        let t = ((px - self.rect.left()) / self.rect.width()) as f64;
        self.x.0 + t * (self.x.1 - self.x.0)
    }

    /// Axes, grid lines and tick labels. `x_ticks = false` leaves the x axis
    /// unlabelled for categorical charts.
    fn draw_axes(&self, painter: &egui::Painter, ui: &egui::Ui, x_label: &str, x_ticks: bool) {
        let text = ui.visuals().text_color();
        let grid = ui.visuals().widgets.noninteractive.bg_stroke.color;
        let font = FontId::proportional(10.5);

        for t in nice_ticks(self.y.0, self.y.1, TICK_TARGET) {
            let y = self.y_px(t);
            painter.line_segment(
                [Pos2::new(self.rect.left(), y), Pos2::new(self.rect.right(), y)],
                Stroke::new(0.5, grid),
            );
            painter.text(
                Pos2::new(self.rect.left() - 4.0, y),
                Align2::RIGHT_CENTER,
                format_tick(t, self.y),
                font.clone(),
                text,
            );
        }

        if x_ticks {
            for t in nice_ticks(self.x.0, self.x.1, TICK_TARGET) {
                let x = self.x_px(t);
                painter.line_segment(
                    [Pos2::new(x, self.rect.bottom()), Pos2::new(x, self.rect.bottom() + 3.0)],
                    Stroke::new(1.0, text),
                );
                painter.text(
                    Pos2::new(x, self.rect.bottom() + 4.0),
                    Align2::CENTER_TOP,
                    format_tick(t, self.x),
                    font.clone(),
                    text,
                );
            }
        }

        let axis = Stroke::new(1.0, text);
        painter.line_segment([self.rect.left_bottom(), self.rect.right_bottom()], axis);
        painter.line_segment([self.rect.left_bottom(), self.rect.left_top()], axis);

        if !x_label.is_empty() {
            painter.text(
                Pos2::new(self.rect.center().x, self.rect.bottom() + 17.0),
                Align2::CENTER_TOP,
                x_label,
                font,
                text,
            );
        }
    }
}

/// Give a degenerate range some width so the mapping never divides by zero.
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Round tick positions (1, 2 or 5 times a power of ten) inside `lo..=hi`.
fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        return vec![lo];
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let mut ticks = Vec::new();
    let mut i = (lo / step).ceil();
    while i * step <= hi + step * 1e-9 {
        ticks.push(i * step);
        i += 1.0;
    }
    ticks
}

fn format_tick(value: f64, (lo, hi): (f64, f64)) -> String {
    if hi - lo >= 10.0 {
        format!("{value:.0}")
    } else if hi - lo >= 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

fn chart_title(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).strong().size(15.0));
}

fn legend(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        for &label in SentimentLabel::all() {
            ui.label(egui::RichText::new("\u{25a0}").color(theme::label_colour(label)));
            ui.label(egui::RichText::new(label.label()).small());
            ui.add_space(6.0);
        }
    });
}

fn empty_placeholder(ui: &mut egui::Ui, height: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "No reviews match the current filters.",
        FontId::proportional(13.0),
        ui.visuals().weak_text_color(),
    );
}

/// Hollow rectangle drawn from its four edges.
fn outline(painter: &egui::Painter, rect: Rect, stroke: Stroke) {
    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
    painter.line_segment([rect.right_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_bottom(), rect.left_bottom()], stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], stroke);
}

/// Bin under the pointer, if any.
fn hovered_bin(response: &egui::Response, frame: &PlotFrame, hist: &Histogram) -> Option<usize> {
    let pos = response.hover_pos()?;
    if !frame.rect.contains(pos) || hist.is_empty() {
        return None;
    }
    let x = frame.x_value(pos.x);
    let bin = ((x - hist.start) / hist.bin_width).floor();
    (bin >= 0.0 && (bin as usize) < hist.bins()).then_some(bin as usize)
}

// =============================================================================
// Pie: sentiment distribution
// =============================================================================

fn pie_chart(ui: &mut egui::Ui, state: &AppState) {
    chart_title(ui, "Sentiment Distribution");
    let counts = state.view.label_counts;
    let total: usize = counts.iter().sum();
    if total == 0 {
        empty_placeholder(ui, theme::CHART_HEIGHT);
        return;
    }

    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT),
        Sense::hover(),
    );
    let rect = response.rect;
    let centre = rect.center();
    let radius = (rect.width().min(rect.height()) / 2.0 - 10.0).max(10.0);

    let mut mesh = egui::Mesh::default();
    // Start at 12 o'clock, clockwise.
    let mut angle = -TAU / 4.0;
    let mut labels = Vec::new();

    for &label in SentimentLabel::all() {
        let count = counts[label.index()];
        if count == 0 {
            continue;
        }
        let sweep = TAU * count as f32 / total as f32;
        let colour = theme::label_colour(label);
        let segments = ((sweep * 48.0) as usize).max(2);

        let hub = mesh.vertices.len() as u32;
        mesh.colored_vertex(centre, colour);
        for s in 0..=segments {
            let a = angle + sweep * s as f32 / segments as f32;
            mesh.colored_vertex(centre + radius * egui::vec2(a.cos(), a.sin()), colour);
        }
        for s in 0..segments as u32 {
            mesh.add_triangle(hub, hub + 1 + s, hub + 2 + s);
        }

        let mid = angle + sweep / 2.0;
        labels.push((
            centre + radius * 0.62 * egui::vec2(mid.cos(), mid.sin()),
            format!("{:.1}%", 100.0 * count as f64 / total as f64),
        ));
        angle += sweep;
    }

    painter.add(Shape::mesh(mesh));
    for (pos, text) in labels {
        painter.text(
            pos,
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    legend(ui);
}

// =============================================================================
// Scatter: polarity vs. review length
// =============================================================================

fn scatter_chart(ui: &mut egui::Ui, state: &AppState) {
    chart_title(ui, "Polarity vs. Review Length");
    let points = &state.view.scatter;
    if points.is_empty() {
        empty_placeholder(ui, theme::CHART_HEIGHT);
        return;
    }

    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT),
        Sense::hover(),
    );
    let max_len = points.iter().map(|p| p.length).max().unwrap_or(0) as f64;
    let frame = PlotFrame::new(response.rect, (-1.0, 1.0), (0.0, max_len * 1.05));
    frame.draw_axes(&painter, ui, "sentiment polarity", true);

    for p in points {
        painter.circle_filled(
            frame.pos(p.polarity, p.length as f64),
            2.0,
            theme::label_colour_alpha(p.label, 0.5),
        );
    }

    legend(ui);
}

// =============================================================================
// Histogram: review length, stacked by label
// =============================================================================

fn length_histogram(ui: &mut egui::Ui, state: &AppState) {
    chart_title(ui, "Review Length Distribution");
    let hist = &state.view.length_histogram;
    if hist.is_empty() {
        empty_placeholder(ui, theme::CHART_HEIGHT);
        return;
    }

    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT),
        Sense::hover(),
    );
    let frame = PlotFrame::new(
        response.rect,
        (hist.start, hist.end()),
        (0.0, hist.max_stacked() * 1.05),
    );
    frame.draw_axes(&painter, ui, "review length (chars)", true);

    for bin in 0..hist.bins() {
        let x0 = hist.start + hist.bin_width * bin as f64;
        let x1 = x0 + hist.bin_width;
        let mut base = 0.0;
        for &label in SentimentLabel::all() {
            let h = hist.series[label.index()][bin];
            if h <= 0.0 {
                continue;
            }
            let rect = Rect::from_min_max(frame.pos(x0, base + h), frame.pos(x1, base));
            painter.rect_filled(rect.shrink2(egui::vec2(0.5, 0.0)), 0.0, theme::label_colour(label));
            base += h;
        }
    }

    if let Some(bin) = hovered_bin(&response, &frame, hist) {
        let x0 = hist.start + hist.bin_width * bin as f64;
        let text = format!(
            "{:.0}\u{2013}{:.0} chars\n{}",
            x0,
            x0 + hist.bin_width,
            SentimentLabel::all()
                .iter()
                .map(|l| format!("{l}: {}", hist.series[l.index()][bin]))
                .collect::<Vec<_>>()
                .join("\n")
        );
        response.on_hover_text_at_pointer(text);
    }

    legend(ui);
}

// =============================================================================
// Box plot: review length by label
// =============================================================================

fn length_box_plot(ui: &mut egui::Ui, state: &AppState) {
    chart_title(ui, "Review Length by Sentiment");
    let boxes = &state.view.length_boxes;
    if boxes.iter().all(Option::is_none) {
        empty_placeholder(ui, theme::CHART_HEIGHT);
        return;
    }

    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT),
        Sense::hover(),
    );
    let y_max = boxes
        .iter()
        .flatten()
        .map(|b| b.max)
        .fold(0.0, f64::max);
    let frame = PlotFrame::new(response.rect, (0.0, 3.0), (0.0, y_max * 1.05));
    frame.draw_axes(&painter, ui, "", false);

    let text = ui.visuals().text_color();
    for &label in SentimentLabel::all() {
        let slot = label.index() as f64;
        painter.text(
            Pos2::new(frame.x_px(slot + 0.5), frame.rect.bottom() + 4.0),
            Align2::CENTER_TOP,
            label.label(),
            FontId::proportional(11.0),
            text,
        );
        if let Some(stats) = &boxes[label.index()] {
            draw_box(&painter, &frame, slot, stats, theme::label_colour(label));
        }
    }

    if let Some(pos) = response.hover_pos() {
        let slot = frame.x_value(pos.x).floor();
        if frame.rect.contains(pos) && (0.0..3.0).contains(&slot) {
            let label = SentimentLabel::all()[slot as usize];
            if let Some(stats) = &boxes[label.index()] {
                response.on_hover_text_at_pointer(format!(
                    "{label} (n = {})\nmax: {:.0}\nq3: {:.0}\nmedian: {:.0}\nq1: {:.0}\nmin: {:.0}",
                    stats.count, stats.max, stats.q3, stats.median, stats.q1, stats.min
                ));
            }
        }
    }
}

fn draw_box(painter: &egui::Painter, frame: &PlotFrame, slot: f64, stats: &BoxStats, colour: Color32) {
    let (left, right) = (slot + 0.25, slot + 0.75);
    let centre = slot + 0.5;
    let stroke = Stroke::new(1.5, colour);

    let body = Rect::from_min_max(frame.pos(left, stats.q3), frame.pos(right, stats.q1));
    painter.rect_filled(body, 0.0, colour.gamma_multiply(0.35));
    outline(painter, body, stroke);
    painter.line_segment(
        [frame.pos(left, stats.median), frame.pos(right, stats.median)],
        Stroke::new(2.0, colour),
    );

    // Whiskers with caps.
    let (cap_l, cap_r) = (slot + 0.4, slot + 0.6);
    painter.line_segment([frame.pos(centre, stats.q3), frame.pos(centre, stats.upper_whisker)], stroke);
    painter.line_segment([frame.pos(centre, stats.q1), frame.pos(centre, stats.lower_whisker)], stroke);
    painter.line_segment(
        [frame.pos(cap_l, stats.upper_whisker), frame.pos(cap_r, stats.upper_whisker)],
        stroke,
    );
    painter.line_segment(
        [frame.pos(cap_l, stats.lower_whisker), frame.pos(cap_r, stats.lower_whisker)],
        stroke,
    );

    for &o in &stats.outliers {
        painter.circle_filled(frame.pos(centre, o), 2.0, colour);
    }
}

// =============================================================================
// Density histogram of polarity, with rug
// =============================================================================

fn polarity_density(ui: &mut egui::Ui, state: &AppState) {
    let hist = &state.view.polarity_density;
    if hist.is_empty() {
        empty_placeholder(ui, theme::CHART_HEIGHT);
        return;
    }

    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT + RUG_HEIGHT),
        Sense::hover(),
    );
    let mut chart_rect = response.rect;
    chart_rect.set_top(chart_rect.top() + RUG_HEIGHT);
    let rug_rect = Rect::from_min_max(
        Pos2::new(chart_rect.left() + MARGIN_LEFT, response.rect.top()),
        Pos2::new(chart_rect.right() - MARGIN_RIGHT, response.rect.top() + RUG_HEIGHT - 6.0),
    );

    let frame = PlotFrame::new(
        chart_rect,
        (hist.start, hist.end()),
        (0.0, hist.max_single() * 1.05),
    );
    frame.draw_axes(&painter, ui, "sentiment polarity (probability density)", true);

    // Overlaid translucent bars, one series per label.
    for &label in SentimentLabel::all() {
        let colour = theme::label_colour_alpha(label, 0.6);
        for (bin, &h) in hist.series[label.index()].iter().enumerate() {
            if h <= 0.0 {
                continue;
            }
            let x0 = hist.start + hist.bin_width * bin as f64;
            let rect = Rect::from_min_max(frame.pos(x0, h), frame.pos(x0 + hist.bin_width, 0.0));
            painter.rect_filled(rect.shrink2(egui::vec2(0.5, 0.0)), 0.0, colour);
        }
    }

    // Rug: one tick per review, one row per label.
    let row_h = rug_rect.height() / 3.0;
    for p in &state.view.scatter {
        let x = frame.x_px(p.polarity);
        let top = rug_rect.top() + row_h * p.label.index() as f32;
        painter.line_segment(
            [Pos2::new(x, top + 1.0), Pos2::new(x, top + row_h - 1.0)],
            Stroke::new(1.0, theme::label_colour_alpha(p.label, 0.6)),
        );
    }

    if let Some(bin) = hovered_bin(&response, &frame, hist) {
        let x0 = hist.start + hist.bin_width * bin as f64;
        let text = format!(
            "{:.2} to {:.2}\n{}",
            x0,
            x0 + hist.bin_width,
            SentimentLabel::all()
                .iter()
                .map(|l| format!("{l}: {:.3}", hist.series[l.index()][bin]))
                .collect::<Vec<_>>()
                .join("\n")
        );
        response.on_hover_text_at_pointer(text);
    }

    legend(ui);
}
