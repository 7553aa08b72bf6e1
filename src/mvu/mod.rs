// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::logic::store::DataStore;
use crate::logic::webhook::{Transport, submit_draft};
use crate::logic::{accounts, history, reference};
use crate::models::institution::Institution;
use crate::models::session::Session;
use crate::models::submission::DraftSubmission;
use crate::ui::components::auth::{self, AuthCommand, AuthModel, AuthMsg};
use crate::ui::components::files::{FilesCommand, FilesMsg};
use crate::ui::components::history::{self as history_view, HistoryCommand, HistoryModel, HistoryMsg};
use crate::ui::components::institutions::{
    self, InstitutionsCommand, InstitutionsModel, InstitutionsMsg,
};
use crate::ui::components::statement_form::{self, FormCommand, FormMsg, StatementFormModel};
use crate::ui::components::users::{self, UsersCommand, UsersModel, UsersMsg};
use crate::utils::inspect_file;

/// Screens reachable from the navigation bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Auth,
    Form,
    History,
    Users,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Present between sign-in and sign-out.
    pub session: Option<Session>,
    pub screen: Screen,
    pub auth: AuthModel,
    /// Statement submission form state.
    pub form: StatementFormModel,
    pub history: HistoryModel,
    /// User administration (admins only).
    pub users: UsersModel,
    /// Institution registry dialog.
    pub institutions: InstitutionsModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    Navigate(Screen),
    SignedIn(Session),
    SignOutRequested,
    SignedOut,
    InstitutionsLoaded(reference::Loaded<Institution>),
    DismissError,
    Auth(AuthMsg),
    Form(FormMsg),
    History(HistoryMsg),
    Users(UsersMsg),
    Institutions(InstitutionsMsg),
}

/// Commands represent side-effects executed off the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        full_name: String,
        email: String,
        password: String,
    },
    SignOut,
    PickFiles,
    InspectFile {
        path: PathBuf,
    },
    LoadClients,
    LoadInstitutions,
    Submit(DraftSubmission),
    LoadHistory {
        user_id: String,
    },
    LoadUsers,
    SetAdmin {
        user_id: String,
        grant: bool,
    },
    DeleteUser {
        user_id: String,
    },
    UpdateUser {
        user_id: String,
        full_name: String,
        new_password: Option<String>,
    },
    CreateUser {
        full_name: String,
        email: String,
        password: String,
    },
    AddInstitution {
        name: String,
    },
    RenameInstitution {
        id: String,
        name: String,
    },
    DeleteInstitution {
        id: String,
    },
}

/// Backends the commands run against; shared by all worker threads.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DataStore>,
    pub transport: Arc<dyn Transport>,
}

/// Resolve where a navigation request may land given the session.
pub fn allowed_screen(session: Option<&Session>, requested: Screen) -> Screen {
    match (session, requested) {
        (None, _) => Screen::Auth,
        (Some(_), Screen::Auth) => Screen::Form,
        (Some(s), Screen::Users) if !s.is_admin => Screen::Form,
        (Some(_), screen) => screen,
    }
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::InstitutionsLoaded(_) | Msg::Form(FormMsg::ClientsLoaded(_))
            if model.session.is_none() =>
        {
            debug!("Dropping reference data that arrived after sign-out");
        }
        Msg::Navigate(requested) => navigate(model, requested, cmds),
        Msg::SignedIn(session) => {
            model.auth.clear();
            let greeting = format!("Signed in as {}", session.display_name);
            model.session = Some(session);
            surface_event(model, greeting, false);
            navigate(model, Screen::Form, cmds);
        }
        Msg::SignOutRequested => cmds.push(Command::SignOut),
        Msg::SignedOut => {
            *model = AppModel {
                pending_commands: model.pending_commands,
                ..AppModel::default()
            };
            surface_event(model, "Signed out.".into(), false);
        }
        Msg::InstitutionsLoaded(loaded) => {
            let names = loaded.items.iter().map(|i| i.name.clone()).collect();
            let mut inst_cmds = Vec::new();
            institutions::update(
                &mut model.institutions,
                InstitutionsMsg::Loaded(loaded.items),
                &mut inst_cmds,
            );
            route_form(
                model,
                FormMsg::InstitutionsLoaded(reference::Loaded {
                    items: names,
                    notice: loaded.notice,
                }),
                cmds,
            );
        }
        Msg::DismissError => model.error = None,
        Msg::Auth(m) => {
            let mut auth_cmds = Vec::new();
            if let Some(event) = auth::update(&mut model.auth, m, &mut auth_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in auth_cmds {
                cmds.push(match c {
                    AuthCommand::SignIn { email, password } => Command::SignIn { email, password },
                    AuthCommand::SignUp {
                        full_name,
                        email,
                        password,
                    } => Command::SignUp {
                        full_name,
                        email,
                        password,
                    },
                });
            }
        }
        Msg::Form(m) => route_form(model, m, cmds),
        Msg::History(m) => {
            let mut history_cmds = Vec::new();
            history_view::update(&mut model.history, m, &mut history_cmds);
            if history_cmds.contains(&HistoryCommand::Load) {
                match &model.session {
                    Some(session) => cmds.push(Command::LoadHistory {
                        user_id: session.user_id.clone(),
                    }),
                    None => model.history.loading = false,
                }
            }
        }
        Msg::Users(m) => {
            let Some(session) = &model.session else {
                debug!("Dropping user administration message without a session");
                return;
            };
            let mut user_cmds = Vec::new();
            let event = users::update(&mut model.users, m, session, &mut user_cmds);
            if let Some(event) = event {
                surface_event(model, event.message, event.is_error);
            }
            for c in user_cmds {
                cmds.push(match c {
                    UsersCommand::Load => Command::LoadUsers,
                    UsersCommand::SetAdmin { user_id, grant } => {
                        Command::SetAdmin { user_id, grant }
                    }
                    UsersCommand::Delete { user_id } => Command::DeleteUser { user_id },
                    UsersCommand::UpdateProfile {
                        user_id,
                        full_name,
                        new_password,
                    } => Command::UpdateUser {
                        user_id,
                        full_name,
                        new_password,
                    },
                    UsersCommand::Create {
                        full_name,
                        email,
                        password,
                    } => Command::CreateUser {
                        full_name,
                        email,
                        password,
                    },
                });
            }
        }
        Msg::Institutions(m) => route_institutions(model, m, cmds),
    }
}

fn navigate(model: &mut AppModel, requested: Screen, cmds: &mut Vec<Command>) {
    let screen = allowed_screen(model.session.as_ref(), requested);
    if screen != requested {
        debug!(?requested, ?screen, "Navigation redirected");
    }
    model.screen = screen;

    match screen {
        Screen::Auth => {}
        // Reference lists are refetched on every entry to the form.
        Screen::Form => {
            if !model.form.clients_loading {
                route_form(model, FormMsg::ClientsLoading, cmds);
                cmds.push(Command::LoadClients);
            }
            if !model.form.institutions_loading {
                route_form(model, FormMsg::InstitutionsLoading, cmds);
                cmds.push(Command::LoadInstitutions);
            }
        }
        Screen::History => update(model, Msg::History(HistoryMsg::Refresh), cmds),
        Screen::Users => update(model, Msg::Users(UsersMsg::Refresh), cmds),
    }
}

fn route_form(model: &mut AppModel, msg: FormMsg, cmds: &mut Vec<Command>) {
    let mut form_cmds = Vec::new();
    if let Some(event) = statement_form::update(&mut model.form, msg, &mut form_cmds) {
        surface_event(model, event.message, event.is_error);
    }
    for c in form_cmds {
        match c {
            FormCommand::Files(FilesCommand::PickFiles) => cmds.push(Command::PickFiles),
            FormCommand::Files(FilesCommand::InspectFile { path }) => {
                cmds.push(Command::InspectFile { path })
            }
            FormCommand::Submit(draft) => cmds.push(Command::Submit(draft)),
            FormCommand::OpenInstitutions => {
                route_institutions(model, InstitutionsMsg::Open, cmds);
            }
        }
    }
}

fn route_institutions(model: &mut AppModel, msg: InstitutionsMsg, cmds: &mut Vec<Command>) {
    let mut inst_cmds = Vec::new();
    if let Some(event) = institutions::update(&mut model.institutions, msg, &mut inst_cmds) {
        surface_event(model, event.message, event.is_error);
    }
    for c in inst_cmds {
        match c {
            InstitutionsCommand::Insert { name } => cmds.push(Command::AddInstitution { name }),
            InstitutionsCommand::Rename { id, name } => {
                cmds.push(Command::RenameInstitution { id, name })
            }
            InstitutionsCommand::Delete { id } => cmds.push(Command::DeleteInstitution { id }),
            InstitutionsCommand::Reload => {
                route_form(model, FormMsg::InstitutionsLoading, cmds);
                cmds.push(Command::LoadInstitutions);
            }
        }
    }
}

/// Execute a command on a worker thread and return the resulting message.
pub fn run_command(cmd: Command, services: &Services) -> Msg {
    let store = services.store.as_ref();
    match cmd {
        Command::SignIn { email, password } => {
            match accounts::establish_session(store, &email, &password) {
                Ok(session) => Msg::SignedIn(session),
                Err(err) => Msg::Auth(AuthMsg::SignInFailed(err)),
            }
        }
        Command::SignUp {
            full_name,
            email,
            password,
        } => Msg::Auth(AuthMsg::SignUpFinished(
            store.sign_up(&email, &password, &full_name),
        )),
        Command::SignOut => {
            if let Err(err) = store.sign_out() {
                warn!(error = %err, "Sign-out failed; clearing local session anyway");
            }
            Msg::SignedOut
        }
        Command::PickFiles => {
            let files = rfd::FileDialog::new()
                .set_title("Select statement files")
                .pick_files()
                .unwrap_or_default();
            Msg::Form(FormMsg::Files(FilesMsg::FilesPicked(files)))
        }
        Command::InspectFile { path } => {
            Msg::Form(FormMsg::Files(FilesMsg::FileInspected(inspect_file(&path))))
        }
        Command::LoadClients => {
            Msg::Form(FormMsg::ClientsLoaded(reference::load_client_options(store)))
        }
        Command::LoadInstitutions => Msg::InstitutionsLoaded(reference::load_institutions(store)),
        Command::Submit(draft) => Msg::Form(FormMsg::SubmitFinished(submit_draft(
            &draft,
            services.transport.as_ref(),
        ))),
        Command::LoadHistory { user_id } => {
            Msg::History(HistoryMsg::Loaded(history::load_history(store, &user_id)))
        }
        Command::LoadUsers => Msg::Users(UsersMsg::Loaded(
            accounts::load_users(store).map_err(|e| e.to_string()),
        )),
        Command::SetAdmin { user_id, grant } => Msg::Users(UsersMsg::MutationFinished(
            accounts::set_admin(store, &user_id, grant)
                .map_err(|e| format!("Error updating privileges: {e}")),
        )),
        Command::DeleteUser { user_id } => Msg::Users(UsersMsg::MutationFinished(
            accounts::delete_user(store, &user_id)
                .map_err(|e| format!("Error deleting user: {e}")),
        )),
        Command::UpdateUser {
            user_id,
            full_name,
            new_password,
        } => Msg::Users(UsersMsg::MutationFinished(
            accounts::update_user(store, &user_id, &full_name, new_password.as_deref())
                .map_err(|e| format!("Error updating user: {e}")),
        )),
        Command::CreateUser {
            full_name,
            email,
            password,
        } => Msg::Users(UsersMsg::MutationFinished(
            accounts::create_user(store, &full_name, &email, &password)
                .map_err(|e| format!("Error creating user: {e}")),
        )),
        Command::AddInstitution { name } => Msg::Institutions(InstitutionsMsg::MutationFinished(
            reference::add_institution(store, &name)
                .map_err(|e| format!("Failed to add institution: {e}")),
        )),
        Command::RenameInstitution { id, name } => {
            Msg::Institutions(InstitutionsMsg::MutationFinished(
                reference::rename_institution(store, &id, &name)
                    .map_err(|e| format!("Failed to rename institution: {e}")),
            ))
        }
        Command::DeleteInstitution { id } => Msg::Institutions(InstitutionsMsg::MutationFinished(
            reference::delete_institution(store, &id)
                .map_err(|e| format!("Failed to delete institution: {e}")),
        )),
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::error::SubmitError;
    use crate::logic::memory_store::{MemoryStore, OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD};
    use crate::logic::packager::Payload;
    use crate::logic::store::record;
    use serde_json::json;
    use crate::models::submission::StatementType;

    /// Transport answering with a fixed outcome and recording what it was sent.
    struct ScriptedTransport {
        outcome: Result<String, SubmitError>,
        sent: Mutex<Vec<Payload>>,
    }

    impl Transport for ScriptedTransport {
        fn post(&self, payload: Payload) -> Result<String, SubmitError> {
            self.sent.lock().unwrap().push(payload);
            self.outcome.clone()
        }
    }

    fn services(outcome: Result<String, SubmitError>) -> (Services, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport {
            outcome,
            sent: Mutex::new(Vec::new()),
        });
        let services = Services {
            store: Arc::new(MemoryStore::seeded()),
            transport: transport.clone(),
        };
        (services, transport)
    }

    /// Run commands to completion, feeding results back like the UI loop does.
    fn drain(model: &mut AppModel, mut cmds: Vec<Command>, services: &Services) {
        while let Some(cmd) = cmds.pop() {
            let msg = run_command(cmd, services);
            update(model, msg, &mut cmds);
        }
    }

    fn signed_in(services: &Services) -> AppModel {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::Auth(AuthMsg::EmailChanged(OFFLINE_ADMIN_EMAIL.into())),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::Auth(AuthMsg::PasswordChanged(OFFLINE_ADMIN_PASSWORD.into())),
            &mut cmds,
        );
        update(&mut model, Msg::Auth(AuthMsg::Submit), &mut cmds);
        drain(&mut model, cmds, services);
        model
    }

    fn complete_draft(dir: &TempDir) -> DraftSubmission {
        let path = dir.path().join("extrato.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let mut draft = DraftSubmission {
            files: vec![inspect_file(&path)],
            client: "Acme".into(),
            institution: "XP".into(),
            competence: "12/2024".into(),
            ..Default::default()
        };
        draft.set_statement_type(StatementType::Rebalanceamento, true);
        draft
    }

    fn submit(model: &mut AppModel, services: &Services) {
        let mut cmds = Vec::new();
        update(model, Msg::Form(FormMsg::SubmitRequested), &mut cmds);
        drain(model, cmds, services);
    }

    #[test]
    fn sign_in_opens_form_and_loads_reference_data() {
        let (services, _) = services(Ok(String::new()));

        let model = signed_in(&services);

        assert_eq!(model.screen, Screen::Form);
        let session = model.session.as_ref().unwrap();
        assert!(session.is_admin);
        assert_eq!(session.display_name, "Administrator");
        assert_eq!(model.form.institutions.len(), 10);
        assert_eq!(model.institutions.items.len(), 10);
        assert!(!model.form.clients_loading && !model.form.institutions_loading);
        assert!(model.error.is_none());
    }

    #[test]
    fn wrong_password_surfaces_translated_error() {
        let (services, _) = services(Ok(String::new()));
        let mut model = AppModel::default();
        model.auth.email = OFFLINE_ADMIN_EMAIL.into();
        model.auth.password = "wrong-password".into();

        let mut cmds = Vec::new();
        update(&mut model, Msg::Auth(AuthMsg::Submit), &mut cmds);
        drain(&mut model, cmds, &services);

        assert!(model.session.is_none());
        assert_eq!(model.screen, Screen::Auth);
        assert_eq!(model.error.as_deref(), Some("Incorrect email or password."));
    }

    #[test]
    fn navigation_respects_session_and_role() {
        let admin = Session {
            user_id: "a".into(),
            email: "a@example.com".into(),
            display_name: "A".into(),
            is_admin: true,
        };
        let member = Session {
            is_admin: false,
            ..admin.clone()
        };

        assert_eq!(allowed_screen(None, Screen::History), Screen::Auth);
        assert_eq!(allowed_screen(Some(&member), Screen::Users), Screen::Form);
        assert_eq!(allowed_screen(Some(&member), Screen::Auth), Screen::Form);
        assert_eq!(allowed_screen(Some(&admin), Screen::Users), Screen::Users);
    }

    #[test]
    fn successful_submission_resets_draft() {
        let tmp = TempDir::new().unwrap();
        let (services, transport) = services(Ok("ok".into()));
        let mut model = signed_in(&services);
        model.form.draft = complete_draft(&tmp);

        submit(&mut model, &services);

        assert_eq!(model.form.draft, DraftSubmission::default());
        assert!(!model.form.submitting);
        assert_eq!(model.status.as_deref(), Some("Form submitted successfully."));
        assert!(model.error.is_none());
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].file_count(), 1);
    }

    #[test]
    fn submission_without_files_sends_nothing() {
        let tmp = TempDir::new().unwrap();
        let (services, transport) = services(Ok("ok".into()));
        let mut model = signed_in(&services);
        model.form.draft = complete_draft(&tmp);
        model.form.draft.files.clear();

        let mut cmds = Vec::new();
        update(&mut model, Msg::Form(FormMsg::SubmitRequested), &mut cmds);

        assert!(cmds.is_empty());
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(
            model.error.as_deref(),
            Some("Please fill in all required fields.")
        );
    }

    #[test]
    fn rejected_submission_keeps_draft_and_reports_status() {
        let tmp = TempDir::new().unwrap();
        let (services, _) = services(Err(SubmitError::Status {
            status: 500,
            status_text: "Internal Server Error".into(),
        }));
        let mut model = signed_in(&services);
        let draft = complete_draft(&tmp);
        model.form.draft = draft.clone();

        submit(&mut model, &services);

        assert_eq!(model.form.draft, draft);
        assert!(!model.form.submitting);
        assert!(model.error.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn unreachable_webhook_reports_connectivity() {
        let tmp = TempDir::new().unwrap();
        let (services, _) = services(Err(SubmitError::Connectivity));
        let mut model = signed_in(&services);
        model.form.draft = complete_draft(&tmp);

        submit(&mut model, &services);

        assert_eq!(
            model.error.as_deref(),
            Some(SubmitError::Connectivity.to_string().as_str())
        );
        assert_eq!(model.form.draft.client, "Acme");
    }

    #[test]
    fn competence_is_masked_while_typing() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);
        let mut cmds = Vec::new();

        for (typed, shown) in [("1", "1"), ("12", "12"), ("123", "12/3"), ("12/2024", "12/2024")] {
            update(
                &mut model,
                Msg::Form(FormMsg::CompetenceEdited(typed.into())),
                &mut cmds,
            );
            assert_eq!(model.form.draft.competence, shown);
        }
        assert!(cmds.is_empty());
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);
        model.form.draft = complete_draft(&tmp);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Form(FormMsg::SubmitRequested), &mut cmds);
        update(&mut model, Msg::Form(FormMsg::SubmitRequested), &mut cmds);

        assert_eq!(cmds.len(), 1);
        assert!(model.form.submitting);
    }

    #[test]
    fn history_loads_for_signed_in_user() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::History), &mut cmds);
        let user_id = model.session.as_ref().unwrap().user_id.clone();
        assert_eq!(cmds, vec![Command::LoadHistory { user_id }]);

        drain(&mut model, cmds, &services);
        assert!(!model.history.loading);
        assert!(model.history.records.is_empty());
    }

    #[test]
    fn admin_creates_user_and_list_refreshes() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::Users), &mut cmds);
        drain(&mut model, cmds, &services);
        assert_eq!(model.users.users.len(), 1);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Users(UsersMsg::StartCreate), &mut cmds);
        for (field, value) in [
            (users::DialogField::FullName, "Bia"),
            (users::DialogField::Email, "bia@example.com"),
            (users::DialogField::Password, "secret1"),
            (users::DialogField::ConfirmPassword, "secret1"),
        ] {
            update(
                &mut model,
                Msg::Users(UsersMsg::DialogInput(field, value.into())),
                &mut cmds,
            );
        }
        update(&mut model, Msg::Users(UsersMsg::SaveDialog), &mut cmds);
        drain(&mut model, cmds, &services);

        assert_eq!(model.users.users.len(), 2);
        assert!(model.users.dialog.is_none());
        assert_eq!(model.status.as_deref(), Some("User created successfully"));
    }

    #[test]
    fn added_institution_reaches_form_options() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Form(FormMsg::ManageInstitutions), &mut cmds);
        assert!(model.institutions.open);
        update(
            &mut model,
            Msg::Institutions(InstitutionsMsg::NewNameChanged("Nubank".into())),
            &mut cmds,
        );
        update(&mut model, Msg::Institutions(InstitutionsMsg::Add), &mut cmds);
        drain(&mut model, cmds, &services);

        assert!(model.form.institutions.iter().any(|n| n == "Nubank"));
        assert_eq!(model.status.as_deref(), Some("Institution added."));
    }

    #[test]
    fn reentering_form_refetches_reference_data() {
        let store = Arc::new(MemoryStore::seeded());
        store.seed_row("clientes", record([("Cliente", json!("Acme"))]));
        let (scripted, _) = services(Ok(String::new()));
        let services = Services {
            store: store.clone(),
            transport: scripted.transport,
        };
        let mut model = signed_in(&services);
        assert_eq!(model.form.clients, vec!["Acme".to_string()]);

        store.seed_row("clientes", record([("Cliente", json!("Beta"))]));
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::History), &mut cmds);
        drain(&mut model, cmds, &services);
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::Form), &mut cmds);
        assert!(cmds.contains(&Command::LoadClients));
        assert!(cmds.contains(&Command::LoadInstitutions));

        // A second entry while the loads are running does not queue duplicates.
        let mut again = Vec::new();
        update(&mut model, Msg::Navigate(Screen::Form), &mut again);
        assert!(again.is_empty());

        drain(&mut model, cmds, &services);
        assert_eq!(model.form.clients, vec!["Acme".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn reference_data_after_sign_out_is_dropped() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);
        let late_clients = run_command(Command::LoadClients, &services);
        let late_institutions = run_command(Command::LoadInstitutions, &services);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SignOutRequested, &mut cmds);
        drain(&mut model, cmds, &services);
        let mut cmds = Vec::new();
        update(&mut model, late_clients, &mut cmds);
        update(&mut model, late_institutions, &mut cmds);

        assert!(cmds.is_empty());
        assert!(model.session.is_none());
        assert!(model.form.institutions.is_empty());
        assert!(model.institutions.items.is_empty());
        assert_eq!(model.screen, Screen::Auth);

        let model = signed_in(&services);
        assert_eq!(model.form.institutions.len(), 10);
    }

    #[test]
    fn sign_out_clears_session_and_form() {
        let (services, _) = services(Ok(String::new()));
        let mut model = signed_in(&services);
        model.form.draft.client = "Acme".into();

        let mut cmds = Vec::new();
        update(&mut model, Msg::SignOutRequested, &mut cmds);
        drain(&mut model, cmds, &services);

        assert!(model.session.is_none());
        assert_eq!(model.screen, Screen::Auth);
        assert!(model.form.draft.client.is_empty());
        assert!(services.store.session().is_none());
    }
}
