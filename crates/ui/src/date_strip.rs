//! The horizontal day strip under the carousel.

use chrono::{Datelike, NaiveDate};
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke};
use memoir_state::engine::{CellDecoration, MonthSummary};
use memoir_state::strip::{proximity, proximity_style};
use memoir_state::CarouselEngine;

use crate::constants::{STRIP_HEIGHT, STRIP_MONTH_ROW};
use crate::theme;

/// Text under a month heading: memory count and the picked day, if any.
pub fn month_caption(summary: MonthSummary) -> String {
    let memories = match summary.memories {
        1 => "1 memory".to_owned(),
        n => format!("{n} memories"),
    };
    match summary.selected_day {
        Some(day) => format!("{memories} · day {day}"),
        None => memories,
    }
}

/// Text size multiplier and color for a cell.
pub fn cell_style(decoration: CellDecoration, proximity: f32) -> (f32, Color32) {
    if !decoration.interactive {
        return (1.0, theme::TEXT_DISABLED);
    }
    if decoration.selected {
        return (1.3, theme::ACCENT);
    }
    if decoration.scrolling_to {
        return (1.2, theme::SCROLLING_RING);
    }
    if decoration.today {
        return (1.2, theme::TODAY_RING);
    }
    let (scale, opacity) = proximity_style(proximity);
    (scale, theme::TEXT_PRIMARY.gamma_multiply(opacity))
}

fn weekday_letter(date: NaiveDate) -> &'static str {
    ["M", "T", "W", "T", "F", "S", "S"][date.weekday().num_days_from_monday() as usize]
}

/// Paints the strip along the bottom of `ui` and returns its rect, which
/// is both the timeline hit region and the strip viewport.
pub fn date_strip(ui: &mut egui::Ui, engine: &CarouselEngine) -> Rect {
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), STRIP_HEIGHT), Sense::hover());
    let painter = ui.painter().with_clip_rect(rect);
    painter.rect_filled(rect, egui::CornerRadius::ZERO, theme::BG_PANEL);

    let Some(layout) = engine.strip_layout() else {
        return rect;
    };
    let offset = engine.strip_offset();
    let to_screen = |content_x: f32| rect.left() + content_x - offset;

    let strip = engine.strip();
    for (month_index, month) in strip.months().iter().enumerate() {
        let Some(start) = layout.month_start(month_index) else {
            continue;
        };
        let x = to_screen(start);
        if x > rect.right() {
            break;
        }
        let label_pos = pos2(x.max(rect.left() + 8.0), rect.top() + 4.0);
        painter.text(
            label_pos,
            Align2::LEFT_TOP,
            &month.label,
            FontId::proportional(13.0),
            theme::TEXT_PRIMARY,
        );
        if let Some(summary) = engine.month_summary(month_index) {
            painter.text(
                label_pos + vec2(0.0, 15.0),
                Align2::LEFT_TOP,
                month_caption(summary),
                FontId::proportional(10.0),
                theme::TEXT_DIM,
            );
        }
    }

    let reach = rect.width() * 0.5;
    let row_top = rect.top() + STRIP_MONTH_ROW + 8.0;
    let row_center = row_top + (rect.bottom() - row_top) * 0.5;
    let pitch = layout.metrics().cell_pitch;

    for index in layout.visible_cells(offset) {
        let (Some(cell), Some(center)) = (strip.cells().get(index), layout.cell_center_at(index))
        else {
            continue;
        };
        let Some(decoration) = engine.cell_decoration(index) else {
            continue;
        };
        let x = to_screen(center);
        let closeness = proximity(x - rect.center().x, reach);
        let (scale, color) = cell_style(decoration, closeness);

        let cell_rect = Rect::from_center_size(pos2(x, row_center), vec2(pitch - 6.0, pitch));
        if decoration.selected {
            painter.rect_filled(cell_rect, theme::ROUNDING_SM, theme::ACCENT.gamma_multiply(0.25));
        }
        if decoration.today || decoration.scrolling_to {
            let ring = if decoration.scrolling_to {
                theme::SCROLLING_RING
            } else {
                theme::TODAY_RING
            };
            painter.rect_stroke(
                cell_rect,
                theme::ROUNDING_SM,
                Stroke::new(1.5, ring),
                egui::StrokeKind::Inside,
            );
        }

        painter.text(
            pos2(x, cell_rect.top() + 4.0),
            Align2::CENTER_TOP,
            weekday_letter(cell.date),
            FontId::proportional(9.0),
            color.gamma_multiply(0.7),
        );
        painter.text(
            pos2(x, row_center + 4.0),
            Align2::CENTER_CENTER,
            cell.day.to_string(),
            FontId::proportional(14.0 * scale),
            color,
        );
    }

    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CellDecoration {
        CellDecoration {
            interactive: true,
            ..Default::default()
        }
    }

    #[test]
    fn month_caption_counts_and_names_the_picked_day() {
        let none = MonthSummary {
            memories: 0,
            selected_day: None,
        };
        let one = MonthSummary {
            memories: 1,
            selected_day: Some(14),
        };
        assert_eq!(month_caption(none), "0 memories");
        assert_eq!(month_caption(one), "1 memory · day 14");
    }

    #[test]
    fn disabled_cells_ignore_proximity() {
        let disabled = CellDecoration::default();
        assert_eq!(cell_style(disabled, 1.0), (1.0, theme::TEXT_DISABLED));
    }

    #[test]
    fn plain_cells_grow_toward_the_center() {
        let (far, _) = cell_style(plain(), 0.0);
        let (near, _) = cell_style(plain(), 1.0);
        assert_eq!(far, 1.0);
        assert!((near - 1.3).abs() < 1e-6);
    }

    #[test]
    fn selection_outranks_today() {
        let both = CellDecoration {
            selected: true,
            today: true,
            ..plain()
        };
        assert_eq!(cell_style(both, 0.0).1, theme::ACCENT);
    }

    #[test]
    fn weekday_letters_follow_the_calendar() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date");
        assert_eq!(weekday_letter(monday), "M");
        assert_eq!(weekday_letter(monday + chrono::Days::new(5)), "S");
    }
}
