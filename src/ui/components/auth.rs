// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sign-in and sign-up screen.

use eframe::egui;

use crate::error::StoreError;
use crate::models::user::{CredentialErrors, validate_login, validate_signup};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Credentials being typed plus per-field errors.
#[derive(Default)]
pub struct AuthModel {
    pub mode: AuthMode,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: CredentialErrors,
    /// Set while a sign-in or sign-up request is outstanding.
    pub busy: bool,
}

#[derive(Clone, Debug)]
pub enum AuthMsg {
    SetMode(AuthMode),
    FullNameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmPasswordChanged(String),
    Submit,
    SignInFailed(StoreError),
    SignUpFinished(Result<(), StoreError>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthCommand {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        full_name: String,
        email: String,
        password: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEvent {
    pub message: String,
    pub is_error: bool,
}

impl AuthModel {
    /// Forget everything typed so far, keeping the current mode.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }
}

/// Translate backend auth failures into user-facing text.
pub fn auth_error_message(err: &StoreError) -> String {
    let raw = err.to_string();
    if raw.contains("Invalid login credentials") {
        "Incorrect email or password.".into()
    } else if raw.contains("Email not confirmed") {
        "Please confirm your email before signing in.".into()
    } else if raw.contains("User already registered") {
        "This email is already registered.".into()
    } else {
        raw
    }
}

pub fn update(
    model: &mut AuthModel,
    msg: AuthMsg,
    cmds: &mut Vec<AuthCommand>,
) -> Option<AuthEvent> {
    match msg {
        AuthMsg::SetMode(mode) => {
            model.mode = mode;
            model.errors = CredentialErrors::default();
            None
        }
        AuthMsg::FullNameChanged(v) => {
            model.full_name = v;
            None
        }
        AuthMsg::EmailChanged(v) => {
            model.email = v;
            None
        }
        AuthMsg::PasswordChanged(v) => {
            model.password = v;
            None
        }
        AuthMsg::ConfirmPasswordChanged(v) => {
            model.confirm_password = v;
            None
        }
        AuthMsg::Submit => {
            if model.busy {
                return None;
            }
            model.errors = match model.mode {
                AuthMode::SignIn => validate_login(&model.email, &model.password),
                AuthMode::SignUp => validate_signup(
                    &model.full_name,
                    &model.email,
                    &model.password,
                    &model.confirm_password,
                ),
            };
            if !model.errors.is_empty() {
                return None;
            }

            model.busy = true;
            let email = model.email.trim().to_string();
            cmds.push(match model.mode {
                AuthMode::SignIn => AuthCommand::SignIn {
                    email,
                    password: model.password.clone(),
                },
                AuthMode::SignUp => AuthCommand::SignUp {
                    full_name: model.full_name.trim().to_string(),
                    email,
                    password: model.password.clone(),
                },
            });
            None
        }
        AuthMsg::SignInFailed(err) => {
            model.busy = false;
            Some(AuthEvent {
                message: auth_error_message(&err),
                is_error: true,
            })
        }
        AuthMsg::SignUpFinished(result) => {
            model.busy = false;
            match result {
                Ok(()) => {
                    model.clear();
                    model.mode = AuthMode::SignIn;
                    Some(AuthEvent {
                        message: "Account created! You can now sign in.".into(),
                        is_error: false,
                    })
                }
                Err(err) => Some(AuthEvent {
                    message: auth_error_message(&err),
                    is_error: true,
                }),
            }
        }
    }
}

pub fn view(ui: &mut egui::Ui, model: &AuthModel) -> Vec<AuthMsg> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.heading("Client Statements");
        ui.label(
            egui::RichText::new("Sign in or create an account")
                .color(egui::Color32::from_gray(120)),
        );
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            for (mode, label) in [(AuthMode::SignIn, "Sign in"), (AuthMode::SignUp, "Sign up")] {
                if ui.selectable_label(model.mode == mode, label).clicked() && model.mode != mode
                {
                    msgs.push(AuthMsg::SetMode(mode));
                }
            }
        });
        ui.add_space(8.0);

        ui.set_max_width(320.0);
        if model.mode == AuthMode::SignUp {
            if let Some(v) =
                text_field(ui, "Full name", &model.full_name, false, model.errors.full_name)
            {
                msgs.push(AuthMsg::FullNameChanged(v));
            }
        }
        if let Some(v) = text_field(ui, "Email", &model.email, false, model.errors.email) {
            msgs.push(AuthMsg::EmailChanged(v));
        }
        if let Some(v) = text_field(ui, "Password", &model.password, true, model.errors.password) {
            msgs.push(AuthMsg::PasswordChanged(v));
        }
        if model.mode == AuthMode::SignUp {
            if let Some(v) = text_field(
                ui,
                "Confirm password",
                &model.confirm_password,
                true,
                model.errors.confirm_password,
            ) {
                msgs.push(AuthMsg::ConfirmPasswordChanged(v));
            }
        }

        ui.add_space(8.0);
        let label = match (model.mode, model.busy) {
            (AuthMode::SignIn, false) => "Sign in",
            (AuthMode::SignIn, true) => "Signing in...",
            (AuthMode::SignUp, false) => "Create account",
            (AuthMode::SignUp, true) => "Creating account...",
        };
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.add_enabled(!model.busy, egui::Button::new(label)).clicked()
            || (enter && !model.busy)
        {
            msgs.push(AuthMsg::Submit);
        }
    });

    msgs
}

/// Labelled single-line input; returns the new text when edited.
fn text_field(
    ui: &mut egui::Ui,
    label: &str,
    value: &str,
    password: bool,
    error: Option<&str>,
) -> Option<String> {
    ui.label(label);
    let mut text = value.to_string();
    let changed = ui
        .add(egui::TextEdit::singleline(&mut text).password(password))
        .changed();
    if let Some(error) = error {
        let color = ui.visuals().error_fg_color;
        ui.label(egui::RichText::new(error).small().color(color));
    }
    ui.add_space(4.0);
    changed.then_some(text)
}
