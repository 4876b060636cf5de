//! App / Event Loop: routes UI events to the gate, the form and the exporter.
//!
//! Events are handled one at a time. A handler either succeeds (possibly with a
//! success notice) or returns an `AppError`, which becomes an error notice;
//! nothing ends the loop. The only deferred work is the view switch after login
//! and notice dismissal, both spawned timers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::form::{collect, validate_required, FormState};
use crate::layout::{render_portfolio, RenderOptions};
use crate::render::photo::file_to_data_uri;
use crate::render::PdfCanvas;
use crate::state::AppState;
use crate::ui::events::{AuthTab, UiEvent};
use crate::ui::notify::{Notice, Notifier};

/// Delay between a successful login and the portfolio view appearing.
pub const LOGIN_VIEW_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Auth { tab: AuthTab },
    Portfolio,
}

struct ViewSlot {
    view: View,
    /// Bumped on logout so a pending post-login switch is dropped.
    session: u64,
}

pub struct App {
    state: AppState,
    form: FormState,
    notifier: Notifier,
    view: Arc<Mutex<ViewSlot>>,
}

impl App {
    /// Builds the app and restores the portfolio view if a session is open.
    pub async fn start(state: AppState) -> Self {
        let mut view = View::Auth {
            tab: AuthTab::Login,
        };
        match state.gate.current_user().await {
            Ok(Some(email)) => {
                info!(email, "Restoring session");
                view = View::Portfolio;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Session marker unreadable"),
        }

        App {
            state,
            form: FormState::default(),
            notifier: Notifier::new(),
            view: Arc::new(Mutex::new(ViewSlot { view, session: 0 })),
        }
    }

    pub fn view(&self) -> View {
        self.view
            .lock()
            .map(|slot| slot.view)
            .unwrap_or(View::Auth {
                tab: AuthTab::Login,
            })
    }

    #[cfg(test)]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Handles one event; failures surface as an error notice.
    pub async fn dispatch(&mut self, event: UiEvent) {
        debug!(?event, "Dispatching event");
        if let Err(e) = self.handle(event).await {
            warn!(error = %e, "Event failed");
            self.notifier.show(e.to_notice());
        }
    }

    async fn handle(&mut self, event: UiEvent) -> Result<(), AppError> {
        match event {
            UiEvent::SwitchTab { tab } => {
                self.with_view(|slot| {
                    if let View::Auth { .. } = slot.view {
                        slot.view = View::Auth { tab };
                    }
                });
            }
            UiEvent::Register {
                email,
                password,
                confirm,
            } => {
                self.state.gate.register(&email, &password, &confirm).await?;
                self.notifier
                    .show(Notice::success("Registration successful! Please login."));
                self.with_view(|slot| {
                    if let View::Auth { .. } = slot.view {
                        slot.view = View::Auth {
                            tab: AuthTab::Login,
                        };
                    }
                });
            }
            UiEvent::Login { email, password } => {
                self.state.gate.login(&email, &password).await?;
                self.notifier.show(Notice::success("Login successful!"));
                self.schedule_portfolio_view();
            }
            UiEvent::Logout => {
                self.state.gate.logout().await?;
                self.form.reset();
                self.with_view(|slot| {
                    slot.session += 1;
                    slot.view = View::Auth {
                        tab: AuthTab::Login,
                    };
                });
                self.notifier.show(Notice::success("Logged out successfully!"));
            }
            UiEvent::Input { field, value } => {
                self.require_portfolio_view()?;
                self.form.set_field(&field, value)?;
            }
            UiEvent::SelectPhoto { path } => {
                self.require_portfolio_view()?;
                self.select_photo(path).await?;
            }
            UiEvent::AddSection { kind } => {
                self.require_portfolio_view()?;
                self.form.sections.add_section(kind);
            }
            UiEvent::RemoveSection { kind, id } => {
                self.require_portfolio_view()?;
                self.form.sections.remove_section(kind, id);
            }
            UiEvent::Export => {
                self.require_portfolio_view()?;
                let path = self.export().await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.notifier
                    .show(Notice::success(format!("Portfolio saved as {name}")));
            }
        }
        Ok(())
    }

    fn with_view(&self, f: impl FnOnce(&mut ViewSlot)) {
        if let Ok(mut slot) = self.view.lock() {
            f(&mut slot);
        }
    }

    fn require_portfolio_view(&self) -> Result<(), AppError> {
        match self.view() {
            View::Portfolio => Ok(()),
            View::Auth { .. } => Err(AppError::Validation("Please login first.".to_string())),
        }
    }

    fn schedule_portfolio_view(&self) {
        let Ok(session) = self.view.lock().map(|slot| slot.session) else {
            return;
        };
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            tokio::time::sleep(LOGIN_VIEW_DELAY).await;
            if let Ok(mut slot) = view.lock() {
                if slot.session == session {
                    slot.view = View::Portfolio;
                }
            }
        });
    }

    async fn select_photo(&mut self, path: PathBuf) -> Result<(), AppError> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::RenderAsset(format!("read {}: {e}", path.display())))?;
        let limit = self.state.config.max_photo_bytes;
        if bytes.len() > limit {
            return Err(AppError::RenderAsset(format!(
                "{} is {} bytes, limit is {limit}",
                path.display(),
                bytes.len()
            )));
        }
        self.form.set_photo(file_to_data_uri(&bytes)?);
        info!(path = %path.display(), bytes = bytes.len(), "Photo selected");
        Ok(())
    }

    /// Collects the form, renders it on a blocking worker and writes the PDF to
    /// the output directory. Returns the written path.
    async fn export(&self) -> Result<PathBuf, AppError> {
        validate_required(&self.form)?;
        let record = collect(&self.form);
        let page_config = self.state.page_config.clone();
        let options = RenderOptions {
            generated_on: chrono::Local::now().date_naive(),
            max_photo_bytes: self.state.config.max_photo_bytes,
        };

        // CPU-bound layout + serialisation: spawn_blocking keeps the event loop free.
        let (bytes, summary) = tokio::task::spawn_blocking(move || {
            let title = format!("{} Portfolio", record.personal.full_name);
            let mut canvas = PdfCanvas::new(title.trim(), &page_config)?;
            let summary = render_portfolio(&record, &mut canvas, &page_config, &options);
            canvas.finish().map(|bytes| (bytes, summary))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in export: {e}")))??;

        let dir = &self.state.config.output_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Storage(format!("create {}: {e}", dir.display())))?;
        let file_name = std::path::Path::new(&summary.file_name)
            .file_name()
            .filter(|name| name.len() == summary.file_name.len())
            .ok_or_else(|| {
                AppError::Internal(anyhow!(
                    "export name {:?} is not a plain file name",
                    summary.file_name
                ))
            })?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {e}", path.display())))?;

        info!(
            path = %path.display(),
            pages = summary.page_count,
            bytes = bytes.len(),
            "Portfolio exported"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::form::SectionKind;
    use crate::render::photo::sample_png;
    use crate::ui::notify::NoticeKind;
    use tempfile::TempDir;

    struct Harness {
        app: App,
        data: TempDir,
        output: TempDir,
    }

    async fn harness() -> Harness {
        let data = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: data.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            ..Default::default()
        };
        let app = App::start(AppState::new(config)).await;
        Harness { app, data, output }
    }

    fn register(email: &str, password: &str, confirm: &str) -> UiEvent {
        UiEvent::Register {
            email: email.to_string(),
            password: password.to_string(),
            confirm: confirm.to_string(),
        }
    }

    fn login(email: &str, password: &str) -> UiEvent {
        UiEvent::Login {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn input(field: &str, value: &str) -> UiEvent {
        UiEvent::Input {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    fn message(app: &App) -> Option<String> {
        app.notifier().current().map(|n| n.message)
    }

    async fn logged_in() -> Harness {
        let mut h = harness().await;
        h.app.dispatch(register("a@x.com", "p1", "p1")).await;
        h.app.dispatch(login("a@x.com", "p1")).await;
        tokio::time::sleep(LOGIN_VIEW_DELAY + Duration::from_millis(10)).await;
        assert_eq!(h.app.view(), View::Portfolio);
        h
    }

    // ── auth flow ───────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_register_switches_to_login_tab() {
        let mut h = harness().await;
        h.app.dispatch(UiEvent::SwitchTab { tab: AuthTab::Register }).await;
        assert_eq!(h.app.view(), View::Auth { tab: AuthTab::Register });

        h.app.dispatch(register("a@x.com", "p1", "p1")).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Registration successful! Please login.")
        );
        assert_eq!(h.app.view(), View::Auth { tab: AuthTab::Login });
        assert!(h.data.path().join("users.json").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_switches_view_after_one_second() {
        let mut h = harness().await;
        h.app.dispatch(register("a@x.com", "p1", "p1")).await;
        h.app.dispatch(login("a@x.com", "p1")).await;
        assert_eq!(message(&h.app).as_deref(), Some("Login successful!"));
        assert!(matches!(h.app.view(), View::Auth { .. }));

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(matches!(h.app.view(), View::Auth { .. }));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.app.view(), View::Portfolio);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_shows_error_and_stays_on_auth() {
        let mut h = harness().await;
        h.app.dispatch(register("a@x.com", "p1", "p1")).await;
        h.app.dispatch(login("a@x.com", "nope")).await;

        let notice = h.app.notifier().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Invalid credentials. Please try again.");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(h.app.view(), View::Auth { .. }));
        assert_eq!(h.app.state.gate.current_user().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_mismatch_notice() {
        let mut h = harness().await;
        h.app.dispatch(register("a@x.com", "p1", "p2")).await;
        assert_eq!(message(&h.app).as_deref(), Some("Passwords do not match"));
        assert!(!h.data.path().join("users.json").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_restored_on_start() {
        let h = logged_in().await;
        let restored = App::start(h.app.state.clone()).await;
        assert_eq!(restored.view(), View::Portfolio);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_resets_form_and_cancels_pending_switch() {
        let mut h = logged_in().await;
        h.app.dispatch(input("fullName", "Ada")).await;
        h.app.dispatch(UiEvent::AddSection { kind: SectionKind::Work }).await;
        assert_eq!(h.app.form().sections.counter(SectionKind::Work), 2);

        h.app.dispatch(UiEvent::Logout).await;
        assert_eq!(message(&h.app).as_deref(), Some("Logged out successfully!"));
        assert_eq!(h.app.view(), View::Auth { tab: AuthTab::Login });
        assert!(h.app.form().personal.full_name.is_empty());
        assert_eq!(h.app.form().sections.counter(SectionKind::Work), 1);

        // Log in and straight back out: the pending switch must not fire.
        h.app.dispatch(login("a@x.com", "p1")).await;
        h.app.dispatch(UiEvent::Logout).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(h.app.view(), View::Auth { .. }));
    }

    // ── form and export ─────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_form_events_require_login() {
        let mut h = harness().await;
        h.app.dispatch(input("fullName", "Ada")).await;
        assert_eq!(message(&h.app).as_deref(), Some("Please login first."));
        assert!(h.app.form().personal.full_name.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_field_becomes_error_notice() {
        let mut h = logged_in().await;
        h.app.dispatch(input("shoeSize", "44")).await;
        let notice = h.app.notifier().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_writes_pdf_named_after_user() {
        let mut h = logged_in().await;
        for (field, value) in [
            ("fullName", "Ada  Lovelace"),
            ("email", "ada@example.com"),
            ("bio", "Mathematician."),
            ("softSkills", "patience, rigor"),
            ("company", "Analytical Engines"),
            ("duration", "1842 - 1843"),
            ("responsibilities", "Wrote the first published algorithm."),
        ] {
            h.app.dispatch(input(field, value)).await;
        }

        h.app.dispatch(UiEvent::Export).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Portfolio saved as Ada_Lovelace_Portfolio.pdf")
        );
        let bytes = std::fs::read(h.output.path().join("Ada_Lovelace_Portfolio.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_name_with_path_characters_stays_in_output_dir() {
        let mut h = logged_in().await;
        h.app.dispatch(input("fullName", "AC/DC")).await;
        h.app.dispatch(UiEvent::Export).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Portfolio saved as AC_DC_Portfolio.pdf")
        );
        assert!(h.output.path().join("AC_DC_Portfolio.pdf").exists());

        h.app.dispatch(input("fullName", "../escaped")).await;
        h.app.dispatch(UiEvent::Export).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Portfolio saved as __escaped_Portfolio.pdf")
        );
        assert!(h.output.path().join("__escaped_Portfolio.pdf").exists());
        let parent = h.output.path().parent().unwrap();
        assert!(!parent.join("escaped_Portfolio.pdf").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_while_logged_in_keeps_portfolio_view() {
        let mut h = logged_in().await;
        h.app.dispatch(register("b@x.com", "p2", "p2")).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Registration successful! Please login.")
        );
        assert_eq!(h.app.view(), View::Portfolio);

        h.app.dispatch(input("fullName", "Ada")).await;
        assert_eq!(h.app.form().personal.full_name, "Ada");
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_blocked_by_incomplete_work_section() {
        let mut h = logged_in().await;
        h.app.dispatch(input("fullName", "Ada")).await;
        h.app.dispatch(UiEvent::AddSection { kind: SectionKind::Work }).await;
        h.app.dispatch(input("company2", "Initech")).await;

        h.app.dispatch(UiEvent::Export).await;
        assert_eq!(
            message(&h.app).as_deref(),
            Some("Work Experience 2: Duration is required")
        );
        assert!(!h.output.path().join("Ada_Portfolio.pdf").exists());

        h.app.dispatch(UiEvent::RemoveSection { kind: SectionKind::Work, id: 2 }).await;
        h.app.dispatch(UiEvent::Export).await;
        assert!(h.output.path().join("Ada_Portfolio.pdf").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_photo_stores_data_uri() {
        let mut h = logged_in().await;
        let path = h.data.path().join("me.png");
        std::fs::write(&path, sample_png()).unwrap();

        h.app.dispatch(UiEvent::SelectPhoto { path }).await;
        assert!(h.app.form().personal.photo.starts_with("data:image/png;base64,"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_missing_photo_is_error_notice() {
        let mut h = logged_in().await;
        let path = h.data.path().join("missing.png");
        h.app.dispatch(UiEvent::SelectPhoto { path }).await;
        assert_eq!(message(&h.app).as_deref(), Some("The photo could not be used."));
        assert!(h.app.form().personal.photo.is_empty());
    }
}
