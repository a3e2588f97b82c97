use eframe::egui::{self, RichText, Ui};

use crate::data::filter::{ChartKind, YearFilter};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart kind and year controls
// ---------------------------------------------------------------------------

/// Render the control panel.  Changing either control triggers a full
/// redraw on the next frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ui.strong("Chart type");
    for kind in ChartKind::ALL {
        if ui
            .selectable_label(state.filter.chart == kind, kind.label())
            .clicked()
        {
            state.set_chart_kind(kind);
        }
    }

    ui.separator();
    ui.strong("Year");

    // Clone the year list so we can mutate state inside the loop.
    let years = state.years.clone();
    let selected = state.filter.year;

    ui.add_enabled_ui(!years.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("year_filter")
            .selected_text(selected.label())
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(selected == YearFilter::All, "All years")
                    .clicked()
                {
                    state.set_year(YearFilter::All);
                }
                for &year in &years {
                    if ui
                        .selectable_label(selected == YearFilter::Year(year), year.to_string())
                        .clicked()
                    {
                        state.set_year(YearFilter::Year(year));
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new("Disaster Charts").strong());
        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading declarations…");
        } else if state.error_message.is_none() {
            ui.label(format!(
                "{} declarations loaded, {} in view",
                state.records.len(),
                state.visible_indices.len()
            ));
        }
    });
}
