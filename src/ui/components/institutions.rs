// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Institution registry dialog: add, rename, and delete persisted institutions.

use eframe::egui;

use crate::models::institution::{Institution, check_institution_name};

#[derive(Default)]
pub struct InstitutionsModel {
    pub open: bool,
    pub items: Vec<Institution>,
    pub new_name: String,
    /// Id and edit buffer of the entry being renamed.
    pub editing: Option<(String, String)>,
    pub busy: bool,
}

#[derive(Clone, Debug)]
pub enum InstitutionsMsg {
    Open,
    Close,
    Loaded(Vec<Institution>),
    NewNameChanged(String),
    Add,
    StartRename(String),
    RenameChanged(String),
    CommitRename,
    CancelRename,
    Delete(String),
    MutationFinished(Result<String, String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstitutionsCommand {
    Insert { name: String },
    Rename { id: String, name: String },
    Delete { id: String },
    Reload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstitutionsEvent {
    pub message: String,
    pub is_error: bool,
}

fn rejected(message: &str) -> Option<InstitutionsEvent> {
    Some(InstitutionsEvent {
        message: message.to_string(),
        is_error: true,
    })
}

pub fn update(
    model: &mut InstitutionsModel,
    msg: InstitutionsMsg,
    cmds: &mut Vec<InstitutionsCommand>,
) -> Option<InstitutionsEvent> {
    match msg {
        InstitutionsMsg::Open => {
            model.open = true;
            None
        }
        InstitutionsMsg::Close => {
            model.open = false;
            model.editing = None;
            model.new_name.clear();
            None
        }
        InstitutionsMsg::Loaded(items) => {
            model.items = items;
            None
        }
        InstitutionsMsg::NewNameChanged(text) => {
            model.new_name = text;
            None
        }
        InstitutionsMsg::Add => {
            if model.busy {
                return None;
            }
            match check_institution_name(&model.new_name, &model.items, None) {
                Ok(name) => {
                    model.busy = true;
                    cmds.push(InstitutionsCommand::Insert { name });
                    None
                }
                Err(message) => rejected(message),
            }
        }
        InstitutionsMsg::StartRename(id) => {
            let current = model.items.iter().find(|i| i.id == id)?.name.clone();
            model.editing = Some((id, current));
            None
        }
        InstitutionsMsg::RenameChanged(text) => {
            if let Some((_, buffer)) = &mut model.editing {
                *buffer = text;
            }
            None
        }
        InstitutionsMsg::CommitRename => {
            if model.busy {
                return None;
            }
            let (id, buffer) = model.editing.as_ref()?;
            match check_institution_name(buffer, &model.items, Some(id.as_str())) {
                Ok(name) => {
                    cmds.push(InstitutionsCommand::Rename {
                        id: id.clone(),
                        name,
                    });
                    model.busy = true;
                    None
                }
                Err(message) => rejected(message),
            }
        }
        InstitutionsMsg::CancelRename => {
            model.editing = None;
            None
        }
        InstitutionsMsg::Delete(id) => {
            if model.busy {
                return None;
            }
            model.busy = true;
            cmds.push(InstitutionsCommand::Delete { id });
            None
        }
        InstitutionsMsg::MutationFinished(result) => {
            model.busy = false;
            match result {
                Ok(message) => {
                    model.editing = None;
                    model.new_name.clear();
                    cmds.push(InstitutionsCommand::Reload);
                    Some(InstitutionsEvent {
                        message,
                        is_error: false,
                    })
                }
                Err(message) => Some(InstitutionsEvent {
                    message,
                    is_error: true,
                }),
            }
        }
    }
}

/// Render the registry window when open.
pub fn view(ctx: &egui::Context, model: &InstitutionsModel) -> Vec<InstitutionsMsg> {
    let mut msgs = Vec::new();
    if !model.open {
        return msgs;
    }

    let mut open = true;
    egui::Window::new("Manage institutions")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut name = model.new_name.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut name)
                        .hint_text("New institution")
                        .desired_width(200.0),
                );
                if response.changed() {
                    msgs.push(InstitutionsMsg::NewNameChanged(name));
                }
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui
                    .add_enabled(!model.busy, egui::Button::new(egui_phosphor::regular::PLUS))
                    .on_hover_text("Add institution")
                    .clicked()
                    || submitted
                {
                    msgs.push(InstitutionsMsg::Add);
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(320.0)
                .show(ui, |ui| {
                    for item in &model.items {
                        ui.horizontal(|ui| render_row(ui, model, item, &mut msgs));
                    }
                });
        });

    if !open {
        msgs.push(InstitutionsMsg::Close);
    }
    msgs
}

fn render_row(
    ui: &mut egui::Ui,
    model: &InstitutionsModel,
    item: &Institution,
    msgs: &mut Vec<InstitutionsMsg>,
) {
    match &model.editing {
        Some((id, buffer)) if *id == item.id => {
            let mut text = buffer.clone();
            let response = ui.add(egui::TextEdit::singleline(&mut text).desired_width(200.0));
            if response.changed() {
                msgs.push(InstitutionsMsg::RenameChanged(text));
            }
            if ui.button(egui_phosphor::regular::CHECK).on_hover_text("Save").clicked() {
                msgs.push(InstitutionsMsg::CommitRename);
            }
            if ui.button(egui_phosphor::regular::X).on_hover_text("Cancel").clicked() {
                msgs.push(InstitutionsMsg::CancelRename);
            }
        }
        _ => {
            ui.label(&item.name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(
                        !model.busy,
                        egui::Button::new(egui_phosphor::regular::TRASH_SIMPLE),
                    )
                    .on_hover_text("Delete")
                    .clicked()
                {
                    msgs.push(InstitutionsMsg::Delete(item.id.clone()));
                }
                if ui
                    .button(egui_phosphor::regular::PENCIL_SIMPLE)
                    .on_hover_text("Rename")
                    .clicked()
                {
                    msgs.push(InstitutionsMsg::StartRename(item.id.clone()));
                }
            });
        }
    }
}
