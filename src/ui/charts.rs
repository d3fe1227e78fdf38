// src/ui/charts.rs
use std::f64::consts::PI;
use eframe::egui::{self, Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, Points, Text};

use hygiene_eda::chart::{self, ChartKind, ChartSpec, Orientation, Rgb};

const PLOT_HEIGHT: f32 = 320.0;

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Draws one chart description. `id` must be unique within the frame.
pub fn show_chart(ui: &mut egui::Ui, id: &str, spec: &ChartSpec) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.heading(&spec.title);
            match &spec.kind {
                ChartKind::Empty { message } => {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new(message).italics());
                    });
                }
                ChartKind::Radar(radar) => show_radar(ui, id, radar),
                ChartKind::Bar(bars) => show_bars(ui, id, bars),
                ChartKind::Box(boxes) => show_boxes(ui, id, boxes),
                ChartKind::Pie(pie) => show_pie(ui, id, pie),
                ChartKind::Heatmap(heatmap) => show_heatmap(ui, id, heatmap),
            }
        });
    });
}

fn polar(value: f64, index: usize, axes: usize) -> [f64; 2] {
    let angle = PI / 2.0 - 2.0 * PI * index as f64 / axes as f64;
    [value * angle.cos(), value * angle.sin()]
}

fn show_radar(ui: &mut egui::Ui, id: &str, radar: &chart::RadarChart) {
    let axes = radar.axes.len();
    if axes == 0 {
        return;
    }

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Rings at each radial tick
            for (value, label) in &radar.radial_ticks {
                let ring: Vec<[f64; 2]> = (0..=axes).map(|i| polar(*value, i % axes, axes)).collect();
                plot_ui.line(Line::new(ring).color(Color32::GRAY).width(0.5));
                plot_ui.text(
                    Text::new(PlotPoint::new(0.02, *value), label.as_str()).color(Color32::GRAY),
                );
            }

            for (i, axis) in radar.axes.iter().enumerate() {
                let [x, y] = polar(1.15, i, axes);
                plot_ui.line(Line::new(vec![[0.0, 0.0], polar(1.0, i, axes)]).color(Color32::GRAY).width(0.5));
                plot_ui.text(Text::new(PlotPoint::new(x, y), axis.as_str()));
            }

            for trace in &radar.traces {
                let outline: Vec<[f64; 2]> = trace.values.iter()
                    .chain(trace.values.first())
                    .enumerate()
                    .map(|(i, value)| polar(*value, i % axes, axes))
                    .collect();
                plot_ui.line(
                    Line::new(outline)
                        .color(color(trace.color))
                        .width(2.0)
                        .name(&trace.name),
                );
            }
        });
}

fn show_bars(ui: &mut egui::Ui, id: &str, spec: &chart::BarChart) {
    let series_count = spec.series.len().max(1) as f64;
    let width = 0.8 / series_count;
    let horizontal = spec.orientation == Orientation::Horizontal;

    let mut plot = Plot::new(id)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .legend(Legend::default());
    if let Some((low, high)) = spec.value_range {
        plot = if horizontal {
            plot.include_x(low).include_x(high)
        } else {
            plot.include_y(low).include_y(high)
        };
    }

    plot.show(ui, |plot_ui| {
        for (s, series) in spec.series.iter().enumerate() {
            let offset = (s as f64 - (series_count - 1.0) / 2.0) * width;
            let bars: Vec<Bar> = spec.categories.iter()
                .zip(&series.values)
                .enumerate()
                .filter_map(|(i, (category, value))| {
                    value.map(|v| {
                        Bar::new(i as f64 + offset, v)
                            .name(category)
                            .width(width * 0.95)
                            .fill(color(series.color))
                    })
                })
                .collect();

            let mut chart = BarChart::new(bars).name(&series.name).color(color(series.color));
            if horizontal {
                chart = chart.horizontal();
            }
            plot_ui.bar_chart(chart);

            if let Some(annotations) = &series.annotations {
                for (i, (value, note)) in series.values.iter().zip(annotations).enumerate() {
                    if let Some(v) = value {
                        let position = i as f64 + offset;
                        let point = if horizontal {
                            PlotPoint::new(*v, position)
                        } else {
                            PlotPoint::new(position, *v)
                        };
                        plot_ui.text(Text::new(point, note.as_str()));
                    }
                }
            }
        }
    });

    // Categories sit at integer positions along the category axis
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(format!("{} :", spec.category_label)).strong());
        for (i, category) in spec.categories.iter().enumerate() {
            ui.label(format!("{i} = {category}"));
        }
    });
    ui.label(RichText::new(&spec.value_label).weak());
}

fn show_boxes(ui: &mut egui::Ui, id: &str, spec: &chart::BoxChart) {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .include_y(0.0)
        .include_y(1.0)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (i, series) in spec.boxes.iter().enumerate() {
                let s = &series.summary;
                let x = i as f64;
                let elem = BoxElem::new(x, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                    .name(&series.name)
                    .box_width(0.6)
                    .fill(color(series.color).linear_multiply(0.4))
                    .stroke(egui::Stroke::new(1.5, color(series.color)));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&series.name));

                let points: Vec<[f64; 2]> = series.points.iter()
                    .enumerate()
                    .map(|(k, value)| [x + ((k % 7) as f64 - 3.0) * 0.03, *value])
                    .collect();
                plot_ui.points(Points::new(points).radius(2.0).color(color(series.color)));
            }
        });
    ui.label(RichText::new(format!("{} / {}", spec.category_label, spec.value_label)).weak());
}

fn show_pie(ui: &mut egui::Ui, id: &str, pie: &chart::PieChart) {
    let total: f64 = pie.slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return;
    }

    Plot::new(id)
        .height(PLOT_HEIGHT / 2.0)
        .show_axes([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Stacked horizontal bar, one segment per slice
            let mut start = 0.0;
            for slice in &pie.slices {
                let share = slice.value / total;
                let bar = Bar::new(0.0, share)
                    .base_offset(start)
                    .width(0.6)
                    .name(&slice.label)
                    .fill(color(slice.color));
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&slice.label).color(color(slice.color)).horizontal());
                start += share;
            }
        });

    egui::Grid::new(format!("{id}_legend")).striped(true).show(ui, |ui| {
        for slice in &pie.slices {
            ui.label(RichText::new("■").color(color(slice.color)));
            ui.label(&slice.label);
            ui.label(format!("{:.0}", slice.value));
            ui.label(format!("{:.1} %", slice.value / total * 100.0));
            ui.end_row();
        }
    });
}

// Diverging blue-white-red over `range`
fn heat_color(value: f64, (low, high): (f64, f64)) -> Color32 {
    let mid = (low + high) / 2.0;
    let half = ((high - low) / 2.0).max(f64::EPSILON);
    let t = ((value - mid) / half).clamp(-1.0, 1.0);
    let fade = |c: u8| (255.0 - (255.0 - c as f64) * t.abs()) as u8;
    if t >= 0.0 {
        Color32::from_rgb(fade(178), fade(24), fade(43))
    } else {
        Color32::from_rgb(fade(33), fade(102), fade(172))
    }
}

fn show_heatmap(ui: &mut egui::Ui, id: &str, heatmap: &chart::Heatmap) {
    egui::ScrollArea::horizontal().id_source(id).show(ui, |ui| {
        egui::Grid::new(id).spacing([2.0, 2.0]).show(ui, |ui| {
            ui.label("");
            for label in &heatmap.labels {
                ui.label(RichText::new(label).small());
            }
            ui.end_row();

            for (label, row) in heatmap.labels.iter().zip(&heatmap.cells) {
                ui.label(RichText::new(label).small());
                for cell in row {
                    match cell {
                        Some(value) => ui.label(
                            RichText::new(format!("{value:+.2}"))
                                .monospace()
                                .color(Color32::BLACK)
                                .background_color(heat_color(*value, heatmap.range)),
                        ),
                        None => ui.label(RichText::new("  -  ").monospace().weak()),
                    };
                }
                ui.end_row();
            }
        });
    });
}
