// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Statement file picker for MVU-style updates.
//!
//! Operates on the draft's file list directly; files are inspected off the UI thread.

use std::path::PathBuf;

use eframe::egui;

use crate::models::submission::SubmissionFile;
use crate::utils::format_bytes;

/// Messages emitted by the file picker view or produced by workers.
#[derive(Clone, Debug)]
pub enum FilesMsg {
    RequestPickFiles,
    FilesPicked(Vec<PathBuf>),
    FileInspected(SubmissionFile),
    Remove(usize),
}

/// Side effects requested by the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilesCommand {
    PickFiles,
    InspectFile { path: PathBuf },
}

/// User-facing events for status/error surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilesEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the file list. Returns a user-facing event when relevant.
pub fn update(
    files: &mut Vec<SubmissionFile>,
    msg: FilesMsg,
    cmds: &mut Vec<FilesCommand>,
) -> Option<FilesEvent> {
    match msg {
        FilesMsg::RequestPickFiles => {
            cmds.push(FilesCommand::PickFiles);
            None
        }
        FilesMsg::FilesPicked(paths) => {
            if paths.is_empty() {
                return None;
            }
            for path in paths {
                cmds.push(FilesCommand::InspectFile { path });
            }
            Some(FilesEvent {
                message: "Reading selected files...".into(),
                is_error: false,
            })
        }
        FilesMsg::FileInspected(file) => {
            let added = add_file(files, file);
            Some(FilesEvent {
                message: if added {
                    "File added".to_string()
                } else {
                    "File skipped (already selected)".to_string()
                },
                is_error: false,
            })
        }
        FilesMsg::Remove(index) => {
            if index < files.len() {
                files.remove(index);
                Some(FilesEvent {
                    message: "File removed".to_string(),
                    is_error: false,
                })
            } else {
                None
            }
        }
    }
}

/// Append a file unless the same path or identical content is already selected.
fn add_file(files: &mut Vec<SubmissionFile>, file: SubmissionFile) -> bool {
    let duplicate = files.iter().any(|existing| {
        existing.path == file.path
            || (file.sha256.is_some() && existing.sha256 == file.sha256)
    });
    if duplicate {
        return false;
    }
    files.push(file);
    true
}

/// Render the picker and selected files.
pub fn view(ui: &mut egui::Ui, files: &[SubmissionFile], summary: &str) -> Vec<FilesMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Choose files", egui_phosphor::regular::FOLDER_OPEN))
            .on_hover_text("Select one or more statement files")
            .clicked()
        {
            msgs.push(FilesMsg::RequestPickFiles);
        }
        ui.label(egui::RichText::new(summary).color(egui::Color32::from_gray(120)));
    });

    if files.is_empty() {
        return msgs;
    }

    ui.add_space(4.0);
    let visuals = ui.visuals().clone();
    egui::Frame::new()
        .fill(visuals.panel_fill)
        .stroke(visuals.window_stroke())
        .inner_margin(8.0)
        .show(ui, |ui| {
            for (index, file) in files.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(egui_phosphor::regular::FILE_TEXT);
                    ui.vertical(|ui| {
                        ui.label(&file.name);
                        ui.label(
                            egui::RichText::new(format!(
                                "{} | {}",
                                file.mime,
                                format_bytes(file.size)
                            ))
                            .small()
                            .color(egui::Color32::from_gray(100)),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(egui_phosphor::regular::TRASH_SIMPLE)
                            .on_hover_text("Remove file")
                            .clicked()
                        {
                            msgs.push(FilesMsg::Remove(index));
                        }
                    });
                });
                if index + 1 < files.len() {
                    ui.separator();
                }
            }
        });

    msgs
}
