//! Panel registry and chart front-ends.
//!
//! Panels are declarative: metadata plus a renderer. The drag behavior is
//! supplied by the board; nothing here carries interaction state.

use eframe::egui::{self, pos2, vec2, CornerRadius, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use super::common::UiColors;
use crate::drag::Position;

const SAMPLES: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    TimeSeries,
    SummaryTable,
}

#[derive(Debug, Clone)]
pub struct PanelMeta {
    pub key: &'static str,
    pub title: &'static str,
    pub size: Vec2,
    pub kind: PanelKind,
    pub default_position: Position,
}

/// The dashboard's panel set.
pub fn registry() -> Vec<PanelMeta> {
    vec![
        PanelMeta {
            key: "throughput",
            title: "Throughput",
            size: vec2(320.0, 200.0),
            kind: PanelKind::TimeSeries,
            default_position: Position::new(40.0, 60.0),
        },
        PanelMeta {
            key: "latency",
            title: "Latency p95",
            size: vec2(320.0, 200.0),
            kind: PanelKind::TimeSeries,
            default_position: Position::new(400.0, 60.0),
        },
        PanelMeta {
            key: "summary",
            title: "Summary",
            size: vec2(320.0, 200.0),
            kind: PanelKind::SummaryTable,
            default_position: Position::new(40.0, 300.0),
        },
    ]
}

pub fn render_content(meta: &PanelMeta, ui: &mut Ui) {
    match meta.kind {
        PanelKind::TimeSeries => render_time_series(meta, ui),
        PanelKind::SummaryTable => render_summary_table(ui),
    }
}

fn render_time_series(meta: &PanelMeta, ui: &mut Ui) {
    let desired = vec2(meta.size.x - 24.0, meta.size.y - 64.0);
    let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, CornerRadius::same(4), UiColors::EXTREME_BG);
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, UiColors::BORDER),
    );

    let points: Vec<Pos2> = (0..SAMPLES)
        .map(|i| {
            let t = i as f32 / (SAMPLES - 1) as f32;
            let value = sample(meta.key, i);
            pos2(
                rect.left() + t * rect.width(),
                rect.bottom() - value * rect.height(),
            )
        })
        .collect();
    painter.add(Shape::line(points, Stroke::new(1.5, UiColors::ACTIVE)));

    ui.label(format!("last: {:.2}", sample(meta.key, SAMPLES - 1)));
}

fn render_summary_table(ui: &mut Ui) {
    egui::Grid::new("summary_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (metric, value) in [
                ("Throughput", "1.24 k/s"),
                ("Latency p50", "18 ms"),
                ("Latency p95", "42 ms"),
                ("Error rate", "0.3 %"),
                ("Uptime", "99.97 %"),
            ] {
                ui.label(metric);
                ui.label(value);
                ui.end_row();
            }
        });
}

// Deterministic demo series in (0, 1), keyed so each panel gets its own
// curve.
fn sample(key: &str, index: usize) -> f32 {
    let seed = key
        .bytes()
        .fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u32));
    let phase = (seed % 7) as f32;
    0.5 + 0.35 * ((index as f32 * 0.35 + phase).sin())
}
