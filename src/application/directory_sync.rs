//! Employee list synchronization.
//!
//! [`EmployeeDirectorySync`] owns the employee list, the draft form and the
//! lifecycle flags, and drives the load → display → submit → reload cycle
//! against a [`GraphqlTransport`]. Renderers read state through
//! [`EmployeeDirectorySync::subscribe`] and never talk to the network.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{
    AppConfig, AppError, DraftEmployee, DraftField, EmployeeRecord, Result, SyncState,
};
use crate::infrastructure::GraphqlTransport;

use super::documents::{
    create_employee_variables, decode_created, decode_employees, CREATE_EMPLOYEE_MUTATION,
    EMPLOYEES_QUERY,
};

/// Result of a single [`EmployeeDirectorySync::load`] call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The response was applied; `count` employees are now listed.
    Applied { count: usize },
    /// A newer load was issued before this one finished; its result was dropped.
    Superseded,
    /// The request failed; the list was left unchanged.
    Failed(AppError),
}

/// Result of a single [`EmployeeDirectorySync::submit`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server created the employee. The list was refreshed by a reload,
    /// not from this record.
    Created(EmployeeRecord),
    /// Another submit was still in flight; nothing was sent.
    AlreadySubmitting,
    /// The mutation failed; the draft was kept.
    Failed(AppError),
}

impl SubmitOutcome {
    /// Convert into a `Result` for callers that treat anything but a create
    /// as an error.
    ///
    /// # Errors
    /// Returns the mutation error, or [`AppError::SubmitInProgress`].
    pub fn into_result(self) -> Result<EmployeeRecord> {
        match self {
            Self::Created(record) => Ok(record),
            Self::AlreadySubmitting => Err(AppError::SubmitInProgress),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Which transient banner a clear timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Banner {
    Status,
    Error,
}

impl Banner {
    fn clear(self, state: &mut SyncState) {
        match self {
            Self::Status => state.status_message.clear(),
            Self::Error => state.error_message.clear(),
        }
    }
}

/// Clear timer of one banner.
#[derive(Default)]
struct BannerClock {
    /// Bumped whenever the banner is shown; a timer only acts on the
    /// generation it was armed for.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl BannerClock {
    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Bookkeeping that never leaves this module.
#[derive(Default)]
struct Control {
    /// Sequence number of the most recently issued load.
    latest_load: u64,
    loads_in_flight: usize,
    submitting: bool,
    status_banner: BannerClock,
    error_banner: BannerClock,
}

impl Control {
    fn banner(&mut self, which: Banner) -> &mut BannerClock {
        match which {
            Banner::Status => &mut self.status_banner,
            Banner::Error => &mut self.error_banner,
        }
    }
}

struct Inner {
    config: AppConfig,
    transport: Arc<dyn GraphqlTransport>,
    state: watch::Sender<SyncState>,
    control: Mutex<Control>,
}

impl Inner {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn execute(&self, document: &str, variables: Option<Value>) -> Result<Value> {
        let timeout = self.config.request_timeout();
        tokio::time::timeout(timeout, self.transport.execute(document, variables))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Timeout {
                    after_ms: duration_ms(timeout),
                })
            })
    }

    /// Show a banner and invalidate its pending clear. The other banner's
    /// deadline is left alone.
    fn show_banner(&self, which: Banner, update: impl FnOnce(&mut SyncState)) {
        let mut ctl = self.control();
        let clock = ctl.banner(which);
        clock.generation += 1;
        clock.cancel();
        self.state.send_modify(update);
    }

    fn show_error(&self, message: String) {
        self.show_banner(Banner::Error, |s| s.error_message = message);
    }
}

/// Start (or restart) the timer that hides one banner.
fn arm_banner_clear(inner: &Arc<Inner>, which: Banner) {
    let delay = inner.config.status_clear_delay();
    let weak: Weak<Inner> = Arc::downgrade(inner);

    let mut ctl = inner.control();
    let clock = ctl.banner(which);
    let generation = clock.generation;
    clock.cancel();

    clock.timer = Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut ctl = inner.control();
        let clock = ctl.banner(which);
        if clock.generation != generation {
            return;
        }
        clock.timer = None;
        inner.state.send_modify(|s| which.clear(s));
        tracing::trace!(?which, generation, "Banner cleared");
    }));
}

/// Marks one load as outstanding for as long as it lives.
struct LoadGuard<'a> {
    inner: &'a Inner,
}

impl<'a> LoadGuard<'a> {
    fn start(inner: &'a Inner) -> (Self, u64) {
        let mut ctl = inner.control();
        ctl.latest_load += 1;
        ctl.loads_in_flight += 1;
        inner.state.send_modify(|s| s.is_loading = true);
        let seq = ctl.latest_load;
        drop(ctl);

        (Self { inner }, seq)
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.inner.control().latest_load == seq
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        // Publish under the lock so a load starting now cannot be
        // overwritten by a stale `false`.
        let mut ctl = self.inner.control();
        ctl.loads_in_flight = ctl.loads_in_flight.saturating_sub(1);
        let still_loading = ctl.loads_in_flight > 0;
        self.inner.state.send_modify(|s| s.is_loading = still_loading);
    }
}

/// Holds the single submit slot.
struct SubmitGuard<'a> {
    inner: &'a Inner,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        let mut ctl = inner.control();
        if ctl.submitting {
            return None;
        }
        ctl.submitting = true;
        inner.state.send_modify(|s| s.is_submitting = true);
        drop(ctl);

        Some(Self { inner })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut ctl = self.inner.control();
        ctl.submitting = false;
        self.inner.state.send_modify(|s| s.is_submitting = false);
    }
}

/// Client-side owner of the employee directory view state.
pub struct EmployeeDirectorySync {
    inner: Arc<Inner>,
}

impl EmployeeDirectorySync {
    /// Create a new sync component with injected configuration and transport.
    #[must_use]
    pub fn new(config: AppConfig, transport: Arc<dyn GraphqlTransport>) -> Self {
        let (state, _) = watch::channel(SyncState::default());

        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                state,
                control: Mutex::new(Control::default()),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    /// Replace exactly one draft field.
    pub fn update_draft_field(&self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        self.inner.state.send_modify(|s| s.draft.set(field, value));
    }

    /// Fetch the full employee list and replace the current one.
    ///
    /// Loads may overlap; only the most recently issued one is applied.
    /// Failures are logged and shown in `error_message`, never raised.
    pub async fn load(&self) -> LoadOutcome {
        let (guard, seq) = LoadGuard::start(&self.inner);
        tracing::debug!(seq, "Loading employees");

        let result = self
            .inner
            .execute(EMPLOYEES_QUERY, None)
            .await
            .and_then(decode_employees);

        let latest = guard.is_latest(seq);

        match result {
            Ok(employees) if latest => {
                let count = employees.len();
                self.inner.state.send_modify(|s| {
                    s.employees = employees;
                    s.last_refreshed = Some(Utc::now());
                });
                tracing::info!(seq, count, "Employees loaded");
                LoadOutcome::Applied { count }
            }
            Ok(_) => {
                tracing::debug!(seq, "Discarding superseded employee list");
                LoadOutcome::Superseded
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "Failed to load employees");
                if latest {
                    self.inner.show_error(format!("Failed to load employees: {err}"));
                    arm_banner_clear(&self.inner, Banner::Error);
                }
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Create an employee from the current draft, then reload the list.
    ///
    /// On success the draft is reset and the success banner shown; on
    /// failure the draft is kept and an error banner shown. Either banner
    /// clears itself after the configured delay. A call made while another
    /// submit is in flight returns [`SubmitOutcome::AlreadySubmitting`].
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(guard) = SubmitGuard::acquire(&self.inner) else {
            tracing::debug!("Submit ignored: another submit is in flight");
            return SubmitOutcome::AlreadySubmitting;
        };

        let draft: DraftEmployee = self.inner.state.borrow().draft.clone();
        tracing::debug!(name = %draft.name, "Creating employee");

        let result = self
            .inner
            .execute(CREATE_EMPLOYEE_MUTATION, Some(create_employee_variables(&draft)))
            .await
            .and_then(decode_created);

        let (outcome, banner) = match result {
            Ok(created) => {
                tracing::info!(id = %created.id, "Employee created");
                let message = self.inner.config.ui.success_message.clone();
                self.inner.show_banner(Banner::Status, |s| {
                    s.draft = DraftEmployee::default();
                    s.status_message = message;
                    s.error_message.clear();
                });
                self.load().await;
                (SubmitOutcome::Created(created), Banner::Status)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to create employee");
                self.inner.show_error(format!("Failed to add employee: {err}"));
                (SubmitOutcome::Failed(err), Banner::Error)
            }
        };

        drop(guard);
        arm_banner_clear(&self.inner, banner);

        outcome
    }
}

impl Drop for EmployeeDirectorySync {
    fn drop(&mut self) {
        let mut ctl = self.inner.control();
        ctl.status_banner.cancel();
        ctl.error_banner.cancel();
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
