// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission history for the signed-in user.

use eframe::egui;

use crate::models::history::{SubmissionRecord, SubmissionStatus};

#[derive(Default)]
pub struct HistoryModel {
    pub records: Vec<SubmissionRecord>,
    pub loading: bool,
}

#[derive(Clone, Debug)]
pub enum HistoryMsg {
    Refresh,
    Loaded(Vec<SubmissionRecord>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryCommand {
    Load,
}

pub fn update(model: &mut HistoryModel, msg: HistoryMsg, cmds: &mut Vec<HistoryCommand>) {
    match msg {
        HistoryMsg::Refresh => {
            if !model.loading {
                model.loading = true;
                cmds.push(HistoryCommand::Load);
            }
        }
        HistoryMsg::Loaded(records) => {
            model.loading = false;
            model.records = records;
        }
    }
}

pub fn view(ui: &mut egui::Ui, model: &HistoryModel) -> Vec<HistoryMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.heading("Submission history");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(
                    !model.loading,
                    egui::Button::new(egui_phosphor::regular::ARROW_CLOCKWISE),
                )
                .on_hover_text("Reload")
                .clicked()
            {
                msgs.push(HistoryMsg::Refresh);
            }
        });
    });
    ui.add_space(8.0);

    if model.loading {
        ui.vertical_centered(|ui| ui.spinner());
        return msgs;
    }
    if model.records.is_empty() {
        ui.label(
            egui::RichText::new("No submissions found.").color(egui::Color32::from_gray(150)),
        );
        return msgs;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for record in &model.records {
            render_record(ui, record);
            ui.add_space(6.0);
        }
    });

    msgs
}

fn render_record(ui: &mut egui::Ui, record: &SubmissionRecord) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&record.client).strong());
            if let Some(account) = &record.account_name {
                ui.label(egui::RichText::new(account).color(egui::Color32::from_gray(120)));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(record.status.label())
                        .color(status_color(&record.status)),
                );
            });
        });
        egui::Grid::new(("history_row", &record.id))
            .num_columns(2)
            .spacing(egui::vec2(12.0, 2.0))
            .show(ui, |ui| {
                for (label, value) in [
                    ("Institution", record.institution.as_str()),
                    ("Currency", record.currency.as_str()),
                    ("Competence", record.competence.as_str()),
                ] {
                    ui.label(egui::RichText::new(label).small());
                    ui.label(value);
                    ui.end_row();
                }
                ui.label(egui::RichText::new("Date").small());
                ui.label(record.created_label());
                ui.end_row();
            });
        ui.horizontal_wrapped(|ui| {
            let badge = ui.visuals().faint_bg_color;
            for kind in &record.statement_types {
                ui.label(egui::RichText::new(kind).small().background_color(badge));
            }
        });
    });
}

fn status_color(status: &SubmissionStatus) -> egui::Color32 {
    match status {
        SubmissionStatus::Success => egui::Color32::from_rgb(34, 139, 34),
        SubmissionStatus::Error => egui::Color32::from_rgb(200, 40, 40),
        SubmissionStatus::Pending => egui::Color32::from_rgb(200, 140, 0),
        SubmissionStatus::Other(_) => egui::Color32::from_gray(120),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_is_ignored_while_loading() {
        let mut model = HistoryModel::default();
        let mut cmds = Vec::new();

        update(&mut model, HistoryMsg::Refresh, &mut cmds);
        update(&mut model, HistoryMsg::Refresh, &mut cmds);

        assert_eq!(cmds, vec![HistoryCommand::Load]);
        update(&mut model, HistoryMsg::Loaded(Vec::new()), &mut cmds);
        assert!(!model.loading);
    }
}
