use eframe::egui::{self, Key, Response, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::dataset::NodeKind;

use super::super::ViewModel;
use super::super::theme::link_color;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;
const SEARCH_RESULT_LIMIT: usize = 12;
const ZOOM_STEP: f32 = 1.3;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

/// Arrow keys held on a focused slider move it with growing speed.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * default_slider_key_step(min, max) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn option_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    label: &str,
    hint: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let slider = ui
        .add(
            egui::Slider::new(value, range)
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    if slider.hovered() {
        slider.request_focus();
    }
    let mut changed = slider.changed();
    changed |= apply_slider_arrow_acceleration(ui, &slider, value, min, max);
    changed
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui, now);
        ui.separator();
        self.draw_type_filter(ui);
        ui.separator();

        ui.label(RichText::new("View").strong());
        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                self.engine.zoom_at_center(ZOOM_STEP);
            }
            if ui.button("Zoom out").clicked() {
                self.engine.zoom_at_center(1.0 / ZOOM_STEP);
            }
            if ui
                .button("Reset view")
                .on_hover_text("Center the whole graph at the default zoom.")
                .clicked()
            {
                self.engine.reset_view(now);
            }
        });
        ui.checkbox(&mut self.show_link_labels, "Relationship labels when zoomed in");

        ui.separator();
        self.draw_layout_options(ui);

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_search(&mut self, ui: &mut Ui, now: f64) {
        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-match nodes; click a result to focus it.");
        ui.text_edit_singleline(&mut self.search);

        let query = self.search.trim();
        if query.is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut matches = (0..self.engine.node_count())
            .filter_map(|index| self.engine.node_record(index))
            .filter_map(|record| {
                let score = fuzzy_match_score(&matcher, &record.name, query)
                    .max(fuzzy_match_score(&matcher, &record.id, query))?;
                Some((score, record.id.clone(), record.name.clone()))
            })
            .collect::<Vec<_>>();
        matches.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.2.cmp(&b.2)));

        if matches.is_empty() {
            ui.small("No matching nodes.");
            return;
        }

        let mut focus_target = None;
        for (_, id, name) in matches.iter().take(SEARCH_RESULT_LIMIT) {
            if ui.link(name.as_str()).on_hover_text(id.as_str()).clicked() {
                focus_target = Some(id.clone());
            }
        }
        if matches.len() > SEARCH_RESULT_LIMIT {
            ui.small(format!("{} more...", matches.len() - SEARCH_RESULT_LIMIT));
        }
        if let Some(id) = focus_target {
            self.select_and_focus(&id, now);
        }
    }

    fn draw_type_filter(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Entity type").strong());
        let before = self.filter_choice.clone();
        let selected_text = self
            .filter_choice
            .as_ref()
            .map(|kind| kind.label().to_owned())
            .unwrap_or_else(|| "all".to_owned());

        egui::ComboBox::from_id_salt("type_filter")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.filter_choice, None, "all");
                for kind in &self.node_kinds {
                    ui.selectable_value(&mut self.filter_choice, Some(kind.clone()), kind.label());
                }
            });

        if self.filter_choice != before {
            self.engine
                .filter_by_type(self.filter_choice.as_ref().map(NodeKind::label));
        }
    }

    fn draw_layout_options(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Layout").strong());
        let mut options = self.engine.options().clone();
        let mut changed = false;

        changed |= option_slider(
            ui,
            &mut options.node_radius,
            4.0..=32.0,
            "node radius",
            "Drawn node radius; collision spacing follows it.",
        );
        changed |= option_slider(
            ui,
            &mut options.link_distance,
            30.0..=400.0,
            "link distance",
            "Rest length of every relationship spring.",
        );
        changed |= option_slider(
            ui,
            &mut options.charge_strength,
            -1500.0..=0.0,
            "charge",
            "Many-body strength; more negative pushes nodes further apart.",
        );
        changed |= ui
            .checkbox(&mut options.fix_nodes_after_drag, "Keep nodes where dropped")
            .on_hover_text("Dragged nodes stay pinned until released from the details panel.")
            .changed();

        if changed {
            self.engine.set_options(options);
        }
    }

    fn draw_legend(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Legend").strong());
        for kind in &self.node_kinds {
            let color = self.engine.kind_color(kind);
            ui.horizontal(|ui| {
                ui.colored_label(color, "\u{25CF}");
                ui.label(kind.label());
            });
        }
        ui.add_space(4.0);
        for kind in &self.relationship_kinds {
            ui.horizontal(|ui| {
                ui.colored_label(link_color(kind), "\u{2014}");
                ui.label(kind.as_str());
            });
        }
    }
}
