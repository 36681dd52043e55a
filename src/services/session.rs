use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::overdue::{check_overdue, OverdueNotice};
use super::reload::{Reloads, Resource};
use super::task_form::TaskForm;
use super::task_list::TaskListView;
use crate::api::{self, ApiClient, ApiError};
use crate::models::{CurrentUser, RoleView, Roster, RosterEntry, SessionUser, Task};

/// Everything one logged-in client knows, built at login and threaded
/// through every controller.
#[derive(Clone, Debug)]
pub struct Session {
    pub user: SessionUser,
    pub view: RoleView,
    pub form: TaskForm,
    pub tasks: Vec<Task>,
    pub overdue: OverdueNotice,
    notices: Vec<String>,
}

impl Session {
    pub fn new(user: SessionUser) -> Self {
        let view = RoleView::for_user(&user);
        Self {
            user,
            view,
            form: TaskForm::default(),
            tasks: Vec::new(),
            overdue: OverdueNotice::hidden(),
            notices: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.user.roster
    }

    pub fn replace_roster(&mut self, entries: Vec<RosterEntry>) {
        self.user.roster.replace(entries);
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> usize {
        self.tasks = tasks;
        self.tasks.len()
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_list(&self) -> TaskListView {
        TaskListView::build(&self.view, &self.tasks)
    }

    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            name: self.user.name.clone(),
            role: self.user.role,
        }
    }

    /// Queue a non-blocking notice for the next rendered page.
    pub fn push_notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

/// Shared handle to a [`Session`] plus its reload slots.
///
/// The session lock is never held across an await point; network work
/// happens outside it and results are committed afterwards.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    state: Arc<Mutex<Session>>,
    reloads: Reloads,
    last_seen: Arc<Mutex<Instant>>,
    revision: Arc<watch::Sender<u64>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(session)),
            reloads: Reloads::default(),
            last_seen: Arc::new(Mutex::new(Instant::now())),
            revision: Arc::new(revision),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn snapshot(&self) -> Session {
        self.with(|s| s.clone())
    }

    pub fn view(&self) -> RoleView {
        self.with(|s| s.view.clone())
    }

    pub fn notify(&self, message: impl Into<String>) {
        self.with(|s| s.push_notice(message));
    }

    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Receiver that changes every time a task reload lands.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Fresh data replaced the session's copy.
    Applied,
    /// A newer reload of the same resource took over.
    Superseded,
    /// The role has no use for this resource.
    Skipped,
}

fn outcome<E>(committed: Option<Result<(), E>>) -> Result<ReloadOutcome, E> {
    match committed {
        None => Ok(ReloadOutcome::Superseded),
        Some(Ok(())) => Ok(ReloadOutcome::Applied),
        Some(Err(e)) => Err(e),
    }
}

/// Re-fetch the task collection, superseding any task reload in flight.
pub async fn reload_tasks(api: &ApiClient, handle: &SessionHandle) -> Result<ReloadOutcome, ApiError> {
    let client = api.clone();
    let committed = handle
        .reloads
        .slot(Resource::Tasks)
        .run(async move { api::load_tasks(&client).await }, |result| {
            result.map(|tasks| {
                let count = handle.with(|s| s.replace_tasks(tasks));
                handle.bump_revision();
                tracing::debug!(count, "Task list refreshed");
            })
        })
        .await;
    outcome(committed)
}

/// Re-fetch the roster; the cached copy is replaced, never merged.
pub async fn reload_roster(api: &ApiClient, handle: &SessionHandle) -> Result<ReloadOutcome, ApiError> {
    let client = api.clone();
    let committed = handle
        .reloads
        .slot(Resource::Roster)
        .run(async move { api::load_users(&client).await }, |result| {
            result.map(|users| handle.with(|s| s.replace_roster(users)))
        })
        .await;
    outcome(committed)
}

/// Re-check overdue tasks. Only project managers issue the request.
pub async fn reload_overdue(api: &ApiClient, handle: &SessionHandle) -> Result<ReloadOutcome, ApiError> {
    let view = handle.view();
    if !view.is_project_manager() {
        return Ok(ReloadOutcome::Skipped);
    }
    let client = api.clone();
    let committed = handle
        .reloads
        .slot(Resource::Overdue)
        .run(async move { check_overdue(&client, &view).await }, |result| {
            result.map(|notice| handle.with(|s| s.overdue = notice))
        })
        .await;
    outcome(committed)
}

/// Build the session for a freshly logged-in user and run the initial
/// loads (roster, tasks, overdue) concurrently. A failing load becomes a
/// notice; the others still complete.
pub async fn start_session(api: &ApiClient, user: SessionUser) -> SessionHandle {
    tracing::info!(name = %user.name, role = %user.role, "Session started");
    let handle = SessionHandle::new(Session::new(user));
    let (roster, tasks, overdue) = tokio::join!(
        reload_roster(api, &handle),
        reload_tasks(api, &handle),
        reload_overdue(api, &handle),
    );
    for (what, result) in [("roster", roster), ("tasks", tasks), ("overdue", overdue)] {
        if let Err(e) = result {
            tracing::warn!(load = what, error = %e, "Initial load failed");
            handle.notify(e.notice());
        }
    }
    handle
}

/// Live sessions of the web front end, keyed by session id.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under a fresh random id and return the id.
    pub fn insert(&self, handle: SessionHandle) -> String {
        let sid = random_session_id();
        self.lock().insert(sid.clone(), handle);
        sid
    }

    /// Look up a session and mark it as seen.
    pub fn get(&self, sid: &str) -> Option<SessionHandle> {
        let handle = self.lock().get(sid).cloned()?;
        handle.touch();
        Some(handle)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sessions seen within `idle`.
    pub fn active(&self, idle: Duration) -> Vec<SessionHandle> {
        self.lock()
            .values()
            .filter(|h| h.idle_for() <= idle)
            .cloned()
            .collect()
    }

    /// Drop sessions not seen within `idle`; returns how many were dropped.
    pub fn prune_idle(&self, idle: Duration) -> usize {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, h| h.idle_for() <= idle);
        before - map.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionHandle>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}
