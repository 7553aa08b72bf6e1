// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell: navigation, modal errors, status bar,
//! and the worker pool that executes commands against the backends.

pub mod components;

use eframe::egui;
use tracing::info;

use crate::mvu::{self, AppModel, Command, Msg, Screen, Services};
use crate::ui::components::{auth, history, institutions, statement_form, users};

/// Stateful egui application for submitting client statements.
pub struct ExtratosApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl ExtratosApp {
    /// Spawn the command workers and start on the sign-in screen.
    pub fn new(services: Services) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let services = services.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, &services);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        info!(threads, "Command workers started");
        Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for ExtratosApp {
    // Required by eframe 0.34; rendering is driven by `update`, which eframe still calls.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drain worker results, apply queued messages, then render the current screen.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // In arrival order: an edit and the submit it precedes can share a frame.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        // Workers finish between frames; keep polling while any are outstanding.
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Extratos");
                if self.model.session.is_some() {
                    ui.separator();
                    self.render_navigation(ui);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    self.render_account(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);
        self.render_institutions_window(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_screen(ui, ctx);
        });
    }
}

impl ExtratosApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    /// Screen tabs; the users tab is only offered to admins.
    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        let is_admin = self.model.session.as_ref().is_some_and(|s| s.is_admin);
        let mut tabs = vec![
            (Screen::Form, egui_phosphor::regular::UPLOAD_SIMPLE, "New submission"),
            (Screen::History, egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE, "History"),
        ];
        if is_admin {
            tabs.push((Screen::Users, egui_phosphor::regular::USERS, "Users"));
        }

        for (screen, icon, label) in tabs {
            let selected = self.model.screen == screen;
            if ui
                .selectable_label(selected, format!("{icon} {label}"))
                .clicked()
                && !selected
            {
                self.inbox.push(Msg::Navigate(screen));
            }
        }
    }

    fn render_account(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &self.model.session else {
            return;
        };
        if ui
            .button(format!("{} Sign out", egui_phosphor::regular::SIGN_OUT))
            .clicked()
        {
            self.inbox.push(Msg::SignOutRequested);
        }
        let name = if session.is_admin {
            format!("{} (admin)", session.display_name)
        } else {
            session.display_name.clone()
        };
        ui.label(egui::RichText::new(name).color(egui::Color32::from_gray(110)));
    }

    fn render_screen(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        match self.model.screen {
            Screen::Auth => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let msgs = auth::view(ui, &self.model.auth);
                    self.inbox.extend(msgs.into_iter().map(Msg::Auth));
                });
            }
            Screen::Form => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let msgs = statement_form::view(ui, &self.model.form);
                    self.inbox.extend(msgs.into_iter().map(Msg::Form));
                });
            }
            Screen::History => {
                let msgs = history::view(ui, &self.model.history);
                self.inbox.extend(msgs.into_iter().map(Msg::History));
            }
            Screen::Users => {
                if let Some(session) = &self.model.session {
                    let msgs = users::view(ui, ctx, &self.model.users, session);
                    self.inbox.extend(msgs.into_iter().map(Msg::Users));
                }
            }
        }
    }

    fn render_institutions_window(&mut self, ctx: &egui::Context) {
        let msgs = institutions::view(ctx, &self.model.institutions);
        self.inbox.extend(msgs.into_iter().map(Msg::Institutions));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new(format!("{} Error", egui_phosphor::regular::WARNING))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Status line, with a spinner while workers are busy.
    fn render_status(&self, ui: &mut egui::Ui) {
        let pending = self.model.pending_commands;
        ui.horizontal(|ui| {
            if pending > 0 {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!("{pending} request(s) in progress"));
            }
            if let Some(text) = &self.model.status {
                let failed = self.model.error.as_deref() == Some(text.as_str());
                let color = if failed {
                    ui.visuals().error_fg_color
                } else {
                    egui::Color32::from_gray(68)
                };
                ui.label(egui::RichText::new(text).color(color));
            }
        });
    }
}
