//! All TUI rendering. Widgets are rebuilt from `UiState` on every draw;
//! nothing here mutates state.

use super::help;
use super::state::UiState;
use crate::summary;
use image::RgbImage;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};
use std::time::Instant;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(super) fn draw(area: Rect, f: &mut Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Analyze"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("breedscan"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_analyze(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_analyze(area: Rect, f: &mut Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)].as_ref())
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(7)].as_ref())
        .split(cols[0]);

    draw_photo_pane(left[0], f, state);
    draw_details(left[1], f, state);
    draw_results(cols[1], f, state);
    draw_status(rows[1], f, state);
}

/// Photo preview, or the picker while it is open.
fn draw_photo_pane(area: Rect, f: &mut Frame, state: &UiState) {
    if state.picker_open {
        return draw_picker(area, f, state);
    }

    let title = state
        .photo
        .as_ref()
        .map(|p| format!("Photo ({})", p.file_name))
        .unwrap_or_else(|| "Photo".to_string());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match state.preview.as_ref() {
        Some(preview) => {
            let lines = photo_lines(&preview.thumbnail, inner);
            f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
        None => {
            f.render_widget(
                Paragraph::new("No photo selected\n\nPress o to choose one")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
    }
}

fn draw_picker(area: Rect, f: &mut Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Choose a photo ({})", state.picker_dir.display()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.picker_entries.is_empty() {
        f.render_widget(
            Paragraph::new("No jpg/jpeg/png files here")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    // Keep the selection in view; the window slides once it would pass
    // the bottom edge.
    let visible = inner.height as usize;
    let start = state
        .picker_selected
        .saturating_sub(visible.saturating_sub(1));

    let mut lines = Vec::new();
    for (i, path) in state
        .picker_entries
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if i == state.picker_selected {
            lines.push(Line::from(Span::styled(
                format!("> {}", name),
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(format!("  {}", name)));
        }
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_details(area: Rect, f: &mut Frame, state: &UiState) {
    let gray = Style::default().fg(Color::Gray);
    let mut lines: Vec<Line> = Vec::new();

    match state.photo.as_ref() {
        Some(photo) => {
            lines.push(Line::from(vec![
                Span::styled("File: ", gray),
                Span::raw(photo.path.display().to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Type: ", gray),
                Span::raw(photo.mime),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Size: ", gray),
                Span::raw(format_size(photo.data.len())),
            ]));
            if let Some(preview) = state.preview.as_ref() {
                lines.push(Line::from(vec![
                    Span::styled("Pixels: ", gray),
                    Span::raw(format!("{} x {}", preview.width, preview.height)),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Data URI: ", gray),
                    Span::raw(format!("{} chars (y copies)", preview.data_uri.len())),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled("No photo selected", gray))),
    }

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Details")),
        area,
    );
}

/// Right column: loading/alert strip, prediction gauges, analysis pane.
fn draw_results(area: Rect, f: &mut Frame, state: &UiState) {
    let preds = state
        .last_report
        .as_ref()
        .map(|r| r.predictions.as_slice())
        .unwrap_or(&[]);

    let strip_h: u16 = if state.phase.is_loading() || state.error.is_some() {
        2
    } else {
        0
    };

    // The reply can carry arbitrarily many predictions; render only as
    // many gauge rows as the pane has room for.
    let capacity = (area.height.saturating_sub(strip_h).saturating_sub(2) / 2) as usize;
    let shown = preds.len().min(capacity.max(1));
    let pred_h: u16 = if state.last_report.is_some() {
        (shown.max(1) as u16) * 2 + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(strip_h),
                Constraint::Length(pred_h),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    if state.phase.is_loading() {
        let line = Line::from(vec![
            Span::styled(
                spinner_frame(state.run_start),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled(&state.info, Style::default().fg(Color::Yellow)),
        ]);
        f.render_widget(Paragraph::new(line), chunks[0]);
    } else if let Some(err) = state.error.as_deref() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                err,
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ))),
            chunks[0],
        );
    }

    if state.last_report.is_some() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Predictions ({})", preds.len()));
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);

        if preds.is_empty() {
            f.render_widget(
                Paragraph::new("none").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        } else {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(2); shown])
                .split(inner);
            for (i, p) in preds.iter().take(shown).enumerate() {
                let cells = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Length(1)].as_ref())
                    .split(rows[i]);
                f.render_widget(
                    Paragraph::new(Span::styled(
                        format!("{}. {}", i + 1, p.breed),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    cells[0],
                );
                f.render_widget(
                    Gauge::default()
                        .ratio(p.confidence.clamp(0.0, 1.0))
                        .label(summary::format_confidence(p.confidence))
                        .gauge_style(Style::default().fg(Color::Green)),
                    cells[1],
                );
            }
        }
    }

    if let Some(analysis) = state
        .last_report
        .as_ref()
        .and_then(|r| r.breed_analysis.as_ref())
    {
        f.render_widget(
            Paragraph::new(summary::format_analysis(analysis))
                .wrap(Wrap { trim: false })
                .scroll((state.analysis_scroll, 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Breed analysis"),
                ),
            chunks[2],
        );
    } else if state.last_report.is_none() && strip_h == 0 {
        f.render_widget(
            Paragraph::new("No results yet\n\nPredictions for the selected photo appear here")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Results")),
            chunks[2],
        );
    }
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState) {
    let gray = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![
            Span::styled("Phase: ", gray),
            Span::raw(format!("{:?}", state.phase)),
            Span::raw("   "),
            Span::styled("Service: ", gray),
            Span::raw(state.service_url.as_str()),
        ]),
        Line::from(vec![Span::styled("Info: ", gray), Span::raw(&state.info)]),
        Line::from("Keys: o choose | r re-run | y copy uri | pgup/pgdn scroll | tab switch | q quit"),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status")),
        area,
    );
}

fn spinner_frame(run_start: Instant) -> &'static str {
    let idx = (run_start.elapsed().as_millis() / 120) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

/// Paint the thumbnail with half-block cells: two image rows per
/// terminal row, the glyph foreground carrying the top pixel and the
/// background the bottom one.
fn photo_lines(thumb: &RgbImage, area: Rect) -> Vec<Line<'static>> {
    let max_w = area.width as u32;
    let max_h = (area.height as u32) * 2;
    let (tw, th) = thumb.dimensions();
    if max_w == 0 || max_h == 0 || tw == 0 || th == 0 {
        return Vec::new();
    }

    let scale = (max_w as f64 / tw as f64)
        .min(max_h as f64 / th as f64)
        .min(1.0);
    let out_w = ((tw as f64 * scale).round() as u32).max(1);
    let out_h = ((th as f64 * scale).round() as u32).max(1);
    let scaled = image::imageops::thumbnail(thumb, out_w, out_h);

    let mut lines = Vec::with_capacity(out_h.div_ceil(2) as usize);
    let mut y = 0;
    while y < out_h {
        let mut spans = Vec::with_capacity(out_w as usize);
        for x in 0..out_w {
            let top = *scaled.get_pixel(x, y);
            let bottom = if y + 1 < out_h {
                *scaled.get_pixel(x, y + 1)
            } else {
                top
            };
            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(top[0], top[1], top[2]))
                    .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
            ));
        }
        lines.push(Line::from(spans));
        y += 2;
    }
    lines
}

fn format_size(bytes: usize) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= 1024.0 {
        format!("{:.1} KiB", b / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_a_sensible_unit() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn photo_lines_fit_the_pane() {
        let thumb = RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]));
        let lines = photo_lines(&thumb, Rect::new(0, 0, 4, 2));
        assert!(lines.len() <= 2);
        assert!(lines.iter().all(|l| l.spans.len() <= 4));
    }

    #[test]
    fn photo_lines_handle_a_zero_area() {
        let thumb = RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]));
        assert!(photo_lines(&thumb, Rect::new(0, 0, 0, 0)).is_empty());
    }

    #[test]
    fn odd_height_duplicates_the_last_row() {
        let thumb = RgbImage::from_pixel(2, 1, image::Rgb([9, 9, 9]));
        let lines = photo_lines(&thumb, Rect::new(0, 0, 10, 10));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn spinner_frame_is_always_valid() {
        let frame = spinner_frame(Instant::now());
        assert!(SPINNER_FRAMES.contains(&frame));
    }

    #[test]
    fn results_pane_survives_thousands_of_predictions() {
        use crate::model::{Prediction, PredictionReport};
        use ratatui::{backend::TestBackend, Terminal};

        let predictions = (0..40_000)
            .map(|i| Prediction {
                breed: format!("Breed {i}"),
                confidence: 0.5,
            })
            .collect();
        let state = UiState {
            last_report: Some(PredictionReport {
                timestamp_utc: "2025-01-01T00:00:00Z".into(),
                file_name: "dog.jpg".into(),
                service_url: "http://localhost:5001/service".into(),
                elapsed_ms: 120,
                predictions,
                breed_analysis: None,
            }),
            ..Default::default()
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f.area(), f, &state)).unwrap();
    }
}
