// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Statement submission form: draft state, validation gate, and submit lifecycle.
//!
//! Per attempt: validate, then either stay idle with field errors, or start a
//! single in-flight submission that resets the draft on success and keeps it on
//! failure.

use eframe::egui;
use tracing::debug;

use crate::error::SubmitError;
use crate::logic::reference::Loaded;
use crate::models::competence::{competence_format_issue, format_competence};
use crate::models::submission::{DraftSubmission, StatementType};
use crate::models::validation::{Field, ValidationErrors, validate};
use crate::ui::components::files::{self, FilesCommand, FilesMsg};

/// Form state owned by the active form session.
#[derive(Default)]
pub struct StatementFormModel {
    pub draft: DraftSubmission,
    /// Errors from the last validation pass.
    pub errors: ValidationErrors,
    pub clients: Vec<String>,
    pub clients_loading: bool,
    pub institutions: Vec<String>,
    pub institutions_loading: bool,
    /// In-flight guard; set while a submission is outstanding.
    pub submitting: bool,
    /// Body text of the last accepted submission, when non-empty.
    pub last_response: Option<String>,
}

/// Messages for the submission form.
#[derive(Clone, Debug)]
pub enum FormMsg {
    Files(FilesMsg),
    ClientSelected(String),
    StatementTypeToggled(StatementType, bool),
    InstitutionSelected(String),
    CompetenceEdited(String),
    ClientsLoading,
    ClientsLoaded(Loaded<String>),
    InstitutionsLoading,
    InstitutionsLoaded(Loaded<String>),
    ManageInstitutions,
    SubmitRequested,
    SubmitFinished(Result<String, SubmitError>),
}

/// Side effects requested by the form.
#[derive(Clone, Debug, PartialEq)]
pub enum FormCommand {
    Files(FilesCommand),
    Submit(DraftSubmission),
    OpenInstitutions,
}

/// User-facing events for status/error surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormEvent {
    pub message: String,
    pub is_error: bool,
}

impl FormEvent {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Apply a message to the form model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut StatementFormModel,
    msg: FormMsg,
    cmds: &mut Vec<FormCommand>,
) -> Option<FormEvent> {
    match msg {
        FormMsg::Files(m) => {
            let mut file_cmds = Vec::new();
            let event = files::update(&mut model.draft.files, m, &mut file_cmds);
            cmds.extend(file_cmds.into_iter().map(FormCommand::Files));
            event.map(|e| FormEvent {
                message: e.message,
                is_error: e.is_error,
            })
        }
        FormMsg::ClientSelected(client) => {
            model.draft.client = client;
            None
        }
        FormMsg::StatementTypeToggled(kind, checked) => {
            model.draft.set_statement_type(kind, checked);
            None
        }
        FormMsg::InstitutionSelected(institution) => {
            model.draft.institution = institution;
            None
        }
        FormMsg::CompetenceEdited(raw) => {
            model.draft.competence = format_competence(&raw);
            None
        }
        FormMsg::ClientsLoading => {
            model.clients_loading = true;
            None
        }
        FormMsg::ClientsLoaded(loaded) => {
            model.clients_loading = false;
            model.clients = loaded.items;
            loaded.notice.map(FormEvent::error)
        }
        FormMsg::InstitutionsLoading => {
            model.institutions_loading = true;
            None
        }
        FormMsg::InstitutionsLoaded(loaded) => {
            model.institutions_loading = false;
            model.institutions = loaded.items;
            loaded.notice.map(FormEvent::error)
        }
        FormMsg::ManageInstitutions => {
            cmds.push(FormCommand::OpenInstitutions);
            None
        }
        FormMsg::SubmitRequested => request_submit(model, cmds),
        FormMsg::SubmitFinished(result) => {
            model.submitting = false;
            match result {
                Ok(body) => {
                    model.draft = DraftSubmission::default();
                    model.errors = ValidationErrors::default();
                    model.last_response = (!body.trim().is_empty()).then_some(body);
                    Some(FormEvent::info("Form submitted successfully."))
                }
                Err(err) => Some(FormEvent::error(err.to_string())),
            }
        }
    }
}

fn request_submit(model: &mut StatementFormModel, cmds: &mut Vec<FormCommand>) -> Option<FormEvent> {
    if model.submitting {
        return None;
    }

    model.errors = validate(&model.draft);
    if model.errors.blocks_submission() {
        debug!(failed = model.errors.len(), "Submission blocked by validation");
        return Some(FormEvent::error("Please fill in all required fields."));
    }

    model.submitting = true;
    model.last_response = None;
    cmds.push(FormCommand::Submit(model.draft.clone()));
    Some(FormEvent::info("Submitting..."))
}

/// Render the form and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &StatementFormModel) -> Vec<FormMsg> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| ui.heading("Client Statements"));
    ui.add_space(12.0);

    required_label(ui, "Files");
    let file_msgs = files::view(ui, &model.draft.files, &model.draft.files_summary());
    msgs.extend(file_msgs.into_iter().map(FormMsg::Files));
    field_error(ui, model, Field::Files);
    ui.add_space(10.0);

    required_label(ui, "Client");
    render_client_select(ui, model, &mut msgs);
    field_error(ui, model, Field::Client);
    ui.add_space(10.0);

    required_label(ui, "Type");
    for kind in StatementType::ALL {
        let mut checked = model.draft.statement_types.contains(&kind);
        if ui.checkbox(&mut checked, kind.as_str()).changed() {
            msgs.push(FormMsg::StatementTypeToggled(kind, checked));
        }
    }
    field_error(ui, model, Field::StatementTypes);
    ui.add_space(10.0);

    required_label(ui, "Institution");
    render_institution_select(ui, model, &mut msgs);
    field_error(ui, model, Field::Institution);
    ui.add_space(10.0);

    ui.label("Competence");
    let mut competence = model.draft.competence.clone();
    if ui
        .add(
            egui::TextEdit::singleline(&mut competence)
                .hint_text("MM/YYYY")
                .char_limit(7)
                .desired_width(120.0),
        )
        .changed()
    {
        msgs.push(FormMsg::CompetenceEdited(competence));
    }
    if competence_format_issue(&model.draft.competence) {
        error_text(ui, "Invalid format. Use MM/YYYY");
    }
    ui.add_space(16.0);

    let label = if model.submitting {
        format!("{} Sending...", egui_phosphor::regular::HOURGLASS)
    } else {
        format!("{} Submit", egui_phosphor::regular::PAPER_PLANE_TILT)
    };
    let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0));
    if ui.add_enabled(!model.submitting, button).clicked() {
        msgs.push(FormMsg::SubmitRequested);
    }

    if let Some(body) = &model.last_response {
        ui.add_space(10.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Response").strong());
            ui.label(body);
        });
    }

    msgs
}

fn render_client_select(ui: &mut egui::Ui, model: &StatementFormModel, msgs: &mut Vec<FormMsg>) {
    let placeholder = if model.clients_loading {
        "Loading..."
    } else {
        "Select an option..."
    };
    let selected = if model.draft.client.is_empty() {
        placeholder.to_string()
    } else {
        model.draft.client.clone()
    };

    ui.add_enabled_ui(!model.clients_loading, |ui| {
        egui::ComboBox::from_id_salt("client_select")
            .selected_text(selected)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for client in &model.clients {
                    if ui
                        .selectable_label(model.draft.client == *client, client)
                        .clicked()
                    {
                        msgs.push(FormMsg::ClientSelected(client.clone()));
                    }
                }
            });
    });
}

fn render_institution_select(
    ui: &mut egui::Ui,
    model: &StatementFormModel,
    msgs: &mut Vec<FormMsg>,
) {
    let selected = if model.draft.institution.is_empty() {
        "Select an option...".to_string()
    } else {
        model.draft.institution.clone()
    };

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!model.institutions_loading, |ui| {
            egui::ComboBox::from_id_salt("institution_select")
                .selected_text(selected)
                .width(ui.available_width() - 40.0)
                .show_ui(ui, |ui| {
                    for name in &model.institutions {
                        if ui
                            .selectable_label(model.draft.institution == *name, name)
                            .clicked()
                        {
                            msgs.push(FormMsg::InstitutionSelected(name.clone()));
                        }
                    }
                });
        });
        if ui
            .button(egui_phosphor::regular::GEAR)
            .on_hover_text("Manage institutions")
            .clicked()
        {
            msgs.push(FormMsg::ManageInstitutions);
        }
    });
}

fn required_label(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        let accent = ui.visuals().hyperlink_color;
        ui.label(text);
        ui.label(egui::RichText::new("*").color(accent));
    });
}

fn field_error(ui: &mut egui::Ui, model: &StatementFormModel, field: Field) {
    if let Some(message) = model.errors.message(field) {
        error_text(ui, message);
    }
}

fn error_text(ui: &mut egui::Ui, text: &str) {
    let color = ui.visuals().error_fg_color;
    ui.label(egui::RichText::new(text).small().color(color));
}
