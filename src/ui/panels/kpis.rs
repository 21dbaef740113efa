// ReviewScope - ui/panels/kpis.rs
//
// Four headline metric tiles above the charts.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the KPI row.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let kpis = &state.view.kpis;

    let avg = kpis
        .avg_polarity
        .map_or_else(|| "n/a".to_string(), |p| format!("{p:.3}"));
    let max_len = kpis
        .max_length
        .map_or_else(|| "n/a".to_string(), |m| format!("{} chars", group_thousands(m)));

    ui.columns(4, |cols| {
        tile(&mut cols[0], "\u{1f4ca} Total Reviews", &group_thousands(kpis.total));
        tile(&mut cols[1], "\u{2764} Avg Polarity", &avg);
        tile(&mut cols[2], "\u{1f4dd} Max Length", &max_len);
        tile(
            &mut cols[3],
            "\u{1f642} Positive Count",
            &group_thousands(kpis.positive_count),
        );
    });
}

fn tile(ui: &mut egui::Ui, caption: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(theme::KPI_TILE_HEIGHT);
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(caption).weak());
        ui.label(egui::RichText::new(value).size(24.0).strong());
    });
}

/// `12345` -> `"12,345"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
