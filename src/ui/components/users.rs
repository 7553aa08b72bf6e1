// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Admin user management: search, statistics, role toggling, and account dialogs.

use chrono::Utc;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::models::session::Session;
use crate::models::user::{
    CredentialErrors, UserAccount, filter_users, user_stats, validate_profile_edit,
    validate_signup,
};

/// Open account dialog, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserDialog {
    Edit {
        user_id: String,
        full_name: String,
        new_password: String,
        confirm_password: String,
        errors: CredentialErrors,
    },
    Create {
        full_name: String,
        email: String,
        password: String,
        confirm_password: String,
        errors: CredentialErrors,
    },
    ConfirmDelete {
        user_id: String,
        name: String,
    },
}

#[derive(Default)]
pub struct UsersModel {
    pub users: Vec<UserAccount>,
    pub loading: bool,
    pub search: String,
    pub dialog: Option<UserDialog>,
    /// Set while a mutation is outstanding.
    pub busy: bool,
}

/// Dialog input fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogField {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Clone, Debug)]
pub enum UsersMsg {
    Refresh,
    Loaded(Result<Vec<UserAccount>, String>),
    SearchChanged(String),
    ToggleAdmin(String),
    RequestDelete(String),
    StartEdit(String),
    StartCreate,
    DialogInput(DialogField, String),
    SaveDialog,
    CloseDialog,
    /// Outcome of a mutation: success or error text.
    MutationFinished(Result<String, String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsersCommand {
    Load,
    SetAdmin {
        user_id: String,
        grant: bool,
    },
    Delete {
        user_id: String,
    },
    UpdateProfile {
        user_id: String,
        full_name: String,
        new_password: Option<String>,
    },
    Create {
        full_name: String,
        email: String,
        password: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsersEvent {
    pub message: String,
    pub is_error: bool,
}

impl UsersEvent {
    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Apply a message. `session` identifies the acting admin, who cannot demote or delete themselves.
pub fn update(
    model: &mut UsersModel,
    msg: UsersMsg,
    session: &Session,
    cmds: &mut Vec<UsersCommand>,
) -> Option<UsersEvent> {
    match msg {
        UsersMsg::Refresh => {
            model.loading = true;
            cmds.push(UsersCommand::Load);
            None
        }
        UsersMsg::Loaded(result) => {
            model.loading = false;
            match result {
                Ok(users) => {
                    model.users = users;
                    None
                }
                Err(err) => Some(UsersEvent::error(format!("Error loading users: {err}"))),
            }
        }
        UsersMsg::SearchChanged(text) => {
            model.search = text;
            None
        }
        UsersMsg::ToggleAdmin(user_id) => {
            if model.busy || user_id == session.user_id {
                return None;
            }
            let user = model.users.iter().find(|u| u.id == user_id)?;
            model.busy = true;
            cmds.push(UsersCommand::SetAdmin {
                grant: !user.is_admin(),
                user_id,
            });
            None
        }
        UsersMsg::RequestDelete(user_id) => {
            if user_id == session.user_id {
                return None;
            }
            let user = model.users.iter().find(|u| u.id == user_id)?;
            model.dialog = Some(UserDialog::ConfirmDelete {
                name: user.display_name().to_string(),
                user_id,
            });
            None
        }
        UsersMsg::StartEdit(user_id) => {
            let user = model.users.iter().find(|u| u.id == user_id)?;
            model.dialog = Some(UserDialog::Edit {
                full_name: user.full_name.clone().unwrap_or_default(),
                user_id,
                new_password: String::new(),
                confirm_password: String::new(),
                errors: CredentialErrors::default(),
            });
            None
        }
        UsersMsg::StartCreate => {
            model.dialog = Some(UserDialog::Create {
                full_name: String::new(),
                email: String::new(),
                password: String::new(),
                confirm_password: String::new(),
                errors: CredentialErrors::default(),
            });
            None
        }
        UsersMsg::DialogInput(field, value) => {
            if let Some(dialog) = &mut model.dialog {
                set_dialog_field(dialog, field, value);
            }
            None
        }
        UsersMsg::SaveDialog => {
            if model.busy {
                return None;
            }
            let command = save_dialog(model.dialog.as_mut()?)?;
            model.busy = true;
            cmds.push(command);
            None
        }
        UsersMsg::CloseDialog => {
            model.dialog = None;
            None
        }
        UsersMsg::MutationFinished(result) => {
            model.busy = false;
            match result {
                Ok(message) => {
                    model.dialog = None;
                    model.loading = true;
                    cmds.push(UsersCommand::Load);
                    Some(UsersEvent {
                        message,
                        is_error: false,
                    })
                }
                Err(err) => Some(UsersEvent::error(err)),
            }
        }
    }
}

fn set_dialog_field(dialog: &mut UserDialog, field: DialogField, value: String) {
    let slot = match (dialog, field) {
        (UserDialog::Edit { full_name, .. }, DialogField::FullName)
        | (UserDialog::Create { full_name, .. }, DialogField::FullName) => full_name,
        (UserDialog::Create { email, .. }, DialogField::Email) => email,
        (UserDialog::Edit { new_password, .. }, DialogField::Password)
        | (UserDialog::Create { password: new_password, .. }, DialogField::Password) => new_password,
        (UserDialog::Edit { confirm_password, .. }, DialogField::ConfirmPassword)
        | (UserDialog::Create { confirm_password, .. }, DialogField::ConfirmPassword) => {
            confirm_password
        }
        _ => return,
    };
    *slot = value;
}

/// Validate the open dialog; returns the command to run when it passes.
fn save_dialog(dialog: &mut UserDialog) -> Option<UsersCommand> {
    match dialog {
        UserDialog::Edit {
            user_id,
            full_name,
            new_password,
            confirm_password,
            errors,
        } => {
            *errors = validate_profile_edit(full_name, new_password, confirm_password);
            errors.is_empty().then(|| UsersCommand::UpdateProfile {
                user_id: user_id.clone(),
                full_name: full_name.trim().to_string(),
                new_password: (!new_password.is_empty()).then(|| new_password.clone()),
            })
        }
        UserDialog::Create {
            full_name,
            email,
            password,
            confirm_password,
            errors,
        } => {
            *errors = validate_signup(full_name, email, password, confirm_password);
            errors.is_empty().then(|| UsersCommand::Create {
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
                password: password.clone(),
            })
        }
        UserDialog::ConfirmDelete { user_id, .. } => Some(UsersCommand::Delete {
            user_id: user_id.clone(),
        }),
    }
}

pub fn view(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    model: &UsersModel,
    session: &Session,
) -> Vec<UsersMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.heading("User management");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(format!("{} New user", egui_phosphor::regular::USER_PLUS))
                .clicked()
            {
                msgs.push(UsersMsg::StartCreate);
            }
            if ui
                .add_enabled(
                    !model.loading,
                    egui::Button::new(egui_phosphor::regular::ARROW_CLOCKWISE),
                )
                .on_hover_text("Reload")
                .clicked()
            {
                msgs.push(UsersMsg::Refresh);
            }
        });
    });
    ui.add_space(8.0);

    let stats = user_stats(&model.users, Utc::now());
    ui.columns(3, |cols| {
        stat_card(&mut cols[0], "Total users", stats.total);
        stat_card(&mut cols[1], "Administrators", stats.admins);
        stat_card(&mut cols[2], "New (7 days)", stats.recent);
    });
    ui.add_space(8.0);

    let mut search = model.search.clone();
    if ui
        .add(
            egui::TextEdit::singleline(&mut search)
                .hint_text("Search by name or email...")
                .desired_width(280.0),
        )
        .changed()
    {
        msgs.push(UsersMsg::SearchChanged(search));
    }
    ui.add_space(6.0);

    if model.loading {
        ui.vertical_centered(|ui| ui.spinner());
    } else {
        render_table(ui, model, session, &mut msgs);
    }

    if let Some(dialog) = &model.dialog {
        render_dialog(ctx, dialog, model.busy, &mut msgs);
    }

    msgs
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: usize) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(label).small());
        ui.label(egui::RichText::new(value.to_string()).heading().strong());
    });
}

fn render_table(
    ui: &mut egui::Ui,
    model: &UsersModel,
    session: &Session,
    msgs: &mut Vec<UsersMsg>,
) {
    let rows = filter_users(&model.users, &model.search);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(140.0))
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for title in ["Name", "Email", "Roles", "Registered", "Actions"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for user in rows {
                let is_self = user.id == session.user_id;
                body.row(26.0, |mut row| {
                    row.col(|ui| {
                        ui.label(user.full_name.as_deref().unwrap_or("-"));
                        if is_self {
                            ui.label(egui::RichText::new("You").small().italics());
                        }
                    });
                    row.col(|ui| {
                        ui.label(&user.email);
                    });
                    row.col(|ui| {
                        ui.label(user.roles.join(", "));
                    });
                    row.col(|ui| {
                        ui.label(user.created_at.format("%d/%m/%Y").to_string());
                    });
                    row.col(|ui| {
                        let toggle = if user.is_admin() {
                            format!("{} Remove admin", egui_phosphor::regular::SHIELD_SLASH)
                        } else {
                            format!("{} Make admin", egui_phosphor::regular::SHIELD)
                        };
                        if ui
                            .add_enabled(!is_self && !model.busy, egui::Button::new(toggle))
                            .clicked()
                        {
                            msgs.push(UsersMsg::ToggleAdmin(user.id.clone()));
                        }
                        if ui
                            .button(egui_phosphor::regular::PENCIL_SIMPLE)
                            .on_hover_text("Edit user")
                            .clicked()
                        {
                            msgs.push(UsersMsg::StartEdit(user.id.clone()));
                        }
                        if ui
                            .add_enabled(
                                !is_self,
                                egui::Button::new(egui_phosphor::regular::TRASH_SIMPLE),
                            )
                            .on_hover_text("Delete user")
                            .clicked()
                        {
                            msgs.push(UsersMsg::RequestDelete(user.id.clone()));
                        }
                    });
                });
            }
        });
}

fn render_dialog(ctx: &egui::Context, dialog: &UserDialog, busy: bool, msgs: &mut Vec<UsersMsg>) {
    let title = match dialog {
        UserDialog::Edit { .. } => "Edit user",
        UserDialog::Create { .. } => "Create new user",
        UserDialog::ConfirmDelete { .. } => "Delete user",
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let save_label = match dialog {
                UserDialog::Edit {
                    full_name,
                    new_password,
                    confirm_password,
                    errors,
                    ..
                } => {
                    dialog_field(ui, msgs, DialogField::FullName, "Full name", full_name, false, errors.full_name);
                    ui.label(
                        egui::RichText::new("Leave the password empty to keep the current one.")
                            .small(),
                    );
                    dialog_field(ui, msgs, DialogField::Password, "New password", new_password, true, errors.password);
                    dialog_field(
                        ui,
                        msgs,
                        DialogField::ConfirmPassword,
                        "Confirm password",
                        confirm_password,
                        true,
                        errors.confirm_password,
                    );
                    "Save"
                }
                UserDialog::Create {
                    full_name,
                    email,
                    password,
                    confirm_password,
                    errors,
                } => {
                    dialog_field(ui, msgs, DialogField::FullName, "Full name", full_name, false, errors.full_name);
                    dialog_field(ui, msgs, DialogField::Email, "Email", email, false, errors.email);
                    dialog_field(ui, msgs, DialogField::Password, "Password", password, true, errors.password);
                    dialog_field(
                        ui,
                        msgs,
                        DialogField::ConfirmPassword,
                        "Confirm password",
                        confirm_password,
                        true,
                        errors.confirm_password,
                    );
                    "Create"
                }
                UserDialog::ConfirmDelete { name, .. } => {
                    ui.label(format!(
                        "Delete {name}? This action cannot be undone."
                    ));
                    "Delete"
                }
            };

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(!busy, egui::Button::new(save_label)).clicked() {
                    msgs.push(UsersMsg::SaveDialog);
                }
                if ui.button("Cancel").clicked() {
                    msgs.push(UsersMsg::CloseDialog);
                }
            });
        });
}

fn dialog_field(
    ui: &mut egui::Ui,
    msgs: &mut Vec<UsersMsg>,
    field: DialogField,
    label: &str,
    value: &str,
    password: bool,
    error: Option<&str>,
) {
    ui.label(label);
    let mut text = value.to_string();
    if ui
        .add(egui::TextEdit::singleline(&mut text).password(password))
        .changed()
    {
        msgs.push(UsersMsg::DialogInput(field, text));
    }
    if let Some(error) = error {
        let color = ui.visuals().error_fg_color;
        ui.label(egui::RichText::new(error).small().color(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_session() -> Session {
        Session {
            user_id: "me".into(),
            email: "me@example.com".into(),
            display_name: "Me".into(),
            is_admin: true,
        }
    }

    fn account(id: &str, roles: &[&str]) -> UserAccount {
        UserAccount {
            id: id.into(),
            email: format!("{id}@example.com"),
            full_name: Some(format!("User {id}")),
            created_at: Utc::now(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn loaded_model() -> UsersModel {
        UsersModel {
            users: vec![account("me", &["admin"]), account("bob", &["user"])],
            ..Default::default()
        }
    }

    #[test]
    fn toggling_admin_grants_or_revokes() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(&mut model, UsersMsg::ToggleAdmin("bob".into()), &admin_session(), &mut cmds);

        assert_eq!(
            cmds,
            vec![UsersCommand::SetAdmin {
                user_id: "bob".into(),
                grant: true
            }]
        );
        assert!(model.busy);
    }

    #[test]
    fn acting_admin_cannot_demote_or_delete_self() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        let session = admin_session();

        update(&mut model, UsersMsg::ToggleAdmin("me".into()), &session, &mut cmds);
        update(&mut model, UsersMsg::RequestDelete("me".into()), &session, &mut cmds);

        assert!(cmds.is_empty());
        assert!(model.dialog.is_none());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        let session = admin_session();

        update(&mut model, UsersMsg::RequestDelete("bob".into()), &session, &mut cmds);
        assert!(cmds.is_empty());
        assert!(matches!(model.dialog, Some(UserDialog::ConfirmDelete { ref name, .. }) if name == "User bob"));

        update(&mut model, UsersMsg::SaveDialog, &session, &mut cmds);
        assert_eq!(
            cmds,
            vec![UsersCommand::Delete {
                user_id: "bob".into()
            }]
        );
    }

    #[test]
    fn edit_dialog_validates_optional_password() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        let session = admin_session();

        update(&mut model, UsersMsg::StartEdit("bob".into()), &session, &mut cmds);
        update(
            &mut model,
            UsersMsg::DialogInput(DialogField::Password, "abc".into()),
            &session,
            &mut cmds,
        );
        update(&mut model, UsersMsg::SaveDialog, &session, &mut cmds);
        assert!(cmds.is_empty());

        update(
            &mut model,
            UsersMsg::DialogInput(DialogField::Password, String::new()),
            &session,
            &mut cmds,
        );
        update(
            &mut model,
            UsersMsg::DialogInput(DialogField::FullName, " Robert ".into()),
            &session,
            &mut cmds,
        );
        update(&mut model, UsersMsg::SaveDialog, &session, &mut cmds);

        assert_eq!(
            cmds,
            vec![UsersCommand::UpdateProfile {
                user_id: "bob".into(),
                full_name: "Robert".into(),
                new_password: None,
            }]
        );
    }

    #[test]
    fn successful_mutation_closes_dialog_and_reloads() {
        let mut model = loaded_model();
        model.busy = true;
        model.dialog = Some(UserDialog::ConfirmDelete {
            user_id: "bob".into(),
            name: "Bob".into(),
        });
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            UsersMsg::MutationFinished(Ok("User deleted".into())),
            &admin_session(),
            &mut cmds,
        )
        .unwrap();

        assert!(!event.is_error);
        assert!(model.dialog.is_none());
        assert_eq!(cmds, vec![UsersCommand::Load]);
    }
}
