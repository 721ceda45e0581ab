//! Funnel workspace: the in-memory state of one editing session and its
//! round trips to the [`FunnelService`].
//!
//! The workspace holds the owned funnel collection, the single "current"
//! funnel being edited, the collection load state, the saving flag, the last
//! user-facing error message, the preview toggle and the per-element edit
//! buffers. State sits behind a [`tokio::sync::Mutex`] that is never held
//! across a service call, so reads stay responsive while a save is in flight.
//!
//! Saves are not re-entrant: a second save issued while one is pending is
//! rejected with [`CoreError::Conflict`] instead of racing on the current
//! funnel pointer.
//!
//! Observers subscribe to [`WorkspaceEvent`]s via [`FunnelWorkspace::subscribe`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::advisory::FunnelTemplate;
use crate::editor::EditSessions;
use crate::element::{ElementId, ElementPatch, ElementType, FunnelElement};
use crate::element_list::ElementList;
use crate::error::CoreError;
use crate::funnel::Funnel;
use crate::service::FunnelService;
use crate::types::DbId;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load funnels";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save funnel";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete funnel";

pub const NO_CURRENT_FUNNEL: &str = "No funnel is currently being edited";

/// Buffer capacity of the workspace event channel.
const EVENT_CAPACITY: usize = 256;

/// Lifecycle of the owned funnel collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Errored(String),
}

/// Notification published after every state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    Loaded { count: usize },
    Saved { id: DbId, created: bool },
    Deleted { id: DbId },
    Selected { id: Option<DbId> },
    CurrentChanged,
    Failed { message: String },
}

/// A pending edit buffer, as exposed in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditBuffer {
    pub element_id: ElementId,
    pub text: String,
}

/// Point-in-time copy of the workspace state.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSnapshot {
    pub load_state: LoadState,
    pub funnels: Vec<Funnel>,
    pub current: Option<Funnel>,
    pub saving: bool,
    pub error: Option<String>,
    pub preview: bool,
    pub editing: Vec<EditBuffer>,
}

#[derive(Debug)]
struct WorkspaceState {
    load_state: LoadState,
    funnels: Vec<Funnel>,
    current: Option<Funnel>,
    error: Option<String>,
    preview: bool,
    editors: EditSessions,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            load_state: LoadState::Idle,
            funnels: Vec::new(),
            current: None,
            error: None,
            preview: false,
            editors: EditSessions::new(),
        }
    }
}

impl WorkspaceState {
    fn current_mut(&mut self) -> Result<&mut Funnel, CoreError> {
        self.current
            .as_mut()
            .ok_or_else(|| CoreError::Validation(NO_CURRENT_FUNNEL.to_string()))
    }

    fn set_current(&mut self, funnel: Option<Funnel>) {
        self.current = funnel;
        self.editors.clear();
    }
}

/// Clears the in-flight save flag when dropped, including when the saving
/// future is cancelled.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FunnelWorkspace {
    service: Arc<dyn FunnelService>,
    state: Mutex<WorkspaceState>,
    saving: AtomicBool,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl FunnelWorkspace {
    pub fn new(service: Arc<dyn FunnelService>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            service,
            state: Mutex::new(WorkspaceState::default()),
            saving: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: WorkspaceEvent) {
        // A send error only means nobody is listening.
        let _ = self.events.send(event);
    }

    // -----------------------------------------------------------------------
    // Collection lifecycle
    // -----------------------------------------------------------------------

    /// Fetch the owned funnels: `Loading`, then `Ready` or `Errored`.
    ///
    /// On failure the collection is left empty and the error message is
    /// recorded; the underlying error is returned for logging.
    pub async fn load(&self) -> Result<usize, CoreError> {
        {
            let mut state = self.state.lock().await;
            state.load_state = LoadState::Loading;
        }

        let result = self.service.get_funnels().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(funnels) => {
                let count = funnels.len();
                state.funnels = funnels;
                state.load_state = LoadState::Ready;
                state.error = None;
                drop(state);
                tracing::info!(count, "Funnels loaded");
                self.publish(WorkspaceEvent::Loaded { count });
                Ok(count)
            }
            Err(err) => {
                state.funnels.clear();
                state.load_state = LoadState::Errored(LOAD_FAILED_MESSAGE.to_string());
                state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                drop(state);
                tracing::error!(error = %err, "{LOAD_FAILED_MESSAGE}");
                self.publish(WorkspaceEvent::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Persist `funnel` and fold the result into the collection.
    ///
    /// A funnel without an id is appended once saved; one with an id
    /// replaces the entry with that id. Either way the saved funnel becomes
    /// current. Failures record [`SAVE_FAILED_MESSAGE`] and are returned to
    /// the caller; nothing is retried.
    pub async fn save(&self, funnel: Funnel) -> Result<Funnel, CoreError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CoreError::Conflict(
                "A save is already in progress".to_string(),
            ));
        }
        let guard = SavingGuard(&self.saving);

        let created = funnel.id.is_none();
        let result = self.service.save_funnel(funnel).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(saved) => {
                let Some(id) = saved.id else {
                    state.error = Some(SAVE_FAILED_MESSAGE.to_string());
                    drop(state);
                    drop(guard);
                    tracing::error!("Funnel service returned a funnel without an id");
                    self.publish(WorkspaceEvent::Failed {
                        message: SAVE_FAILED_MESSAGE.to_string(),
                    });
                    return Err(CoreError::Internal(
                        "Funnel service returned a funnel without an id".to_string(),
                    ));
                };

                let position = state.funnels.iter().position(|f| f.id == Some(id));
                match position {
                    Some(index) if !created => state.funnels[index] = saved.clone(),
                    _ => state.funnels.push(saved.clone()),
                }
                state.current = Some(saved.clone());
                state.editors.retain_existing(&saved.elements);
                state.error = None;
                drop(state);
                drop(guard);

                tracing::info!(funnel_id = id, created, "Funnel saved");
                self.publish(WorkspaceEvent::Saved { id, created });
                Ok(saved)
            }
            Err(err) => {
                state.error = Some(SAVE_FAILED_MESSAGE.to_string());
                drop(state);
                drop(guard);
                tracing::error!(error = %err, "{SAVE_FAILED_MESSAGE}");
                self.publish(WorkspaceEvent::Failed {
                    message: SAVE_FAILED_MESSAGE.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Save the current funnel.
    pub async fn save_current(&self) -> Result<Funnel, CoreError> {
        let current = {
            let state = self.state.lock().await;
            state
                .current
                .clone()
                .ok_or_else(|| CoreError::Validation(NO_CURRENT_FUNNEL.to_string()))?
        };
        self.save(current).await
    }

    /// Delete a funnel from the store, then from the collection.
    ///
    /// Clears the current pointer if it referred to the deleted funnel. On
    /// failure the collection is left exactly as it was.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        match self.service.delete_funnel(id).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.funnels.retain(|f| f.id != Some(id));
                if state.current.as_ref().and_then(|f| f.id) == Some(id) {
                    state.set_current(None);
                }
                state.error = None;
                drop(state);

                tracing::info!(funnel_id = id, "Funnel deleted");
                self.publish(WorkspaceEvent::Deleted { id });
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.lock().await;
                state.error = Some(DELETE_FAILED_MESSAGE.to_string());
                drop(state);

                tracing::error!(funnel_id = id, error = %err, "{DELETE_FAILED_MESSAGE}");
                self.publish(WorkspaceEvent::Failed {
                    message: DELETE_FAILED_MESSAGE.to_string(),
                });
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Current funnel
    // -----------------------------------------------------------------------

    /// Make the already-loaded funnel with `id` current, or clear the current
    /// pointer when there is none. Does not touch the store.
    pub async fn select(&self, id: DbId) -> Option<Funnel> {
        let mut state = self.state.lock().await;
        let found = state.funnels.iter().find(|f| f.id == Some(id)).cloned();
        state.set_current(found.clone());
        drop(state);

        self.publish(WorkspaceEvent::Selected {
            id: found.as_ref().and_then(|f| f.id),
        });
        found
    }

    /// Start an unsaved funnel and make it current.
    pub async fn create_new(&self) -> Funnel {
        let funnel = Funnel::draft(Utc::now());
        let mut state = self.state.lock().await;
        state.set_current(Some(funnel.clone()));
        drop(state);

        self.publish(WorkspaceEvent::CurrentChanged);
        funnel
    }

    /// Replace the current funnel's elements. Returns `None` when nothing is
    /// being edited.
    pub async fn update_current_elements(&self, elements: ElementList) -> Option<Funnel> {
        let mut state = self.state.lock().await;
        let current = state.current.as_mut()?;
        current.set_elements(elements);
        let updated = current.clone();
        state.editors.retain_existing(&updated.elements);
        drop(state);

        self.publish(WorkspaceEvent::CurrentChanged);
        Some(updated)
    }

    /// Rename or re-describe the current funnel.
    pub async fn update_current_details(
        &self,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Funnel, CoreError> {
        let updated = {
            let mut state = self.state.lock().await;
            let current = state.current_mut()?;
            if let Some(name) = name {
                current.name = name;
            }
            if let Some(description) = description {
                current.description = description;
            }
            current.touch();
            current.clone()
        };
        self.publish(WorkspaceEvent::CurrentChanged);
        Ok(updated)
    }

    /// Replace the current funnel's content with a generated template,
    /// starting a new funnel first if none is being edited.
    pub async fn apply_template(&self, template: &FunnelTemplate) -> Funnel {
        let mut state = self.state.lock().await;
        let mut funnel = state
            .current
            .take()
            .unwrap_or_else(|| Funnel::draft(Utc::now()));
        funnel.apply_template(template);
        state.set_current(Some(funnel.clone()));
        drop(state);

        self.publish(WorkspaceEvent::CurrentChanged);
        funnel
    }

    /// Run `edit` against the current element list. `edit` reports whether
    /// it changed anything; only then is `updated_at` refreshed and a
    /// change event published.
    async fn edit_current<R>(
        &self,
        edit: impl FnOnce(&mut ElementList, &mut EditSessions) -> (R, bool),
    ) -> Result<R, CoreError> {
        let mut state = self.state.lock().await;
        let WorkspaceState {
            current, editors, ..
        } = &mut *state;
        let current = current
            .as_mut()
            .ok_or_else(|| CoreError::Validation(NO_CURRENT_FUNNEL.to_string()))?;

        let (result, changed) = edit(&mut current.elements, editors);
        if changed {
            current.touch();
        }
        drop(state);

        if changed {
            self.publish(WorkspaceEvent::CurrentChanged);
        }
        Ok(result)
    }

    pub async fn add_element(&self, element_type: ElementType) -> Result<FunnelElement, CoreError> {
        self.edit_current(|list, _| (list.add(element_type).clone(), true))
            .await
    }

    pub async fn update_element(
        &self,
        id: &ElementId,
        patch: &ElementPatch,
    ) -> Result<bool, CoreError> {
        patch.validate()?;
        self.edit_current(|list, _| {
            let changed = list.update(id, patch);
            (changed, changed)
        })
        .await
    }

    pub async fn delete_element(&self, id: &ElementId) -> Result<bool, CoreError> {
        self.edit_current(|list, editors| {
            let changed = list.delete(id);
            editors.cancel(id);
            (changed, changed)
        })
        .await
    }

    pub async fn reorder_elements(&self, from: usize, to: usize) -> Result<(), CoreError> {
        self.edit_current(|list, _| match list.reorder(from, to) {
            Ok(()) => (Ok(()), from != to),
            Err(err) => (Err(err), false),
        })
        .await?
    }

    /// Apply a drag result; a missing or invalid destination is a no-op.
    pub async fn drop_element(
        &self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<bool, CoreError> {
        self.edit_current(|list, _| {
            let moved = list.apply_drop(source, destination);
            (moved, moved && Some(source) != destination)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Edit buffers and preview
    // -----------------------------------------------------------------------

    /// Enter edit mode on an element of the current funnel, returning the
    /// seeded buffer.
    pub async fn begin_edit(&self, id: &ElementId) -> Result<String, CoreError> {
        self.edit_current(|list, editors| match list.get(id) {
            Some(element) => (Ok(editors.begin(element).to_string()), false),
            None => (Err(CoreError::not_found("Element", id)), false),
        })
        .await?
    }

    /// The Edit/Cancel button: returns whether the element is in edit mode
    /// afterwards.
    pub async fn toggle_edit(&self, id: &ElementId) -> Result<bool, CoreError> {
        self.edit_current(|list, editors| match list.get(id) {
            Some(element) => (Ok(editors.toggle(element)), false),
            None => (Err(CoreError::not_found("Element", id)), false),
        })
        .await?
    }

    pub async fn set_edit_buffer(&self, id: &ElementId, text: String) -> bool {
        let mut state = self.state.lock().await;
        state.editors.set_buffer(id, text)
    }

    pub async fn cancel_edit(&self, id: &ElementId) -> bool {
        let mut state = self.state.lock().await;
        state.editors.cancel(id)
    }

    /// Commit an element's edit buffer into the current funnel.
    pub async fn commit_edit(&self, id: &ElementId) -> Result<bool, CoreError> {
        self.edit_current(|list, editors| {
            let changed = editors.commit(id, list);
            (changed, changed)
        })
        .await
    }

    /// Flip between edit and preview mode; returns the new preview flag.
    pub async fn toggle_preview(&self) -> bool {
        let mut state = self.state.lock().await;
        state.preview = !state.preview;
        state.preview
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn current(&self) -> Option<Funnel> {
        self.state.lock().await.current.clone()
    }

    pub async fn funnels(&self) -> Vec<Funnel> {
        self.state.lock().await.funnels.clone()
    }

    pub async fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn snapshot(&self) -> WorkspaceSnapshot {
        let state = self.state.lock().await;
        let mut editing: Vec<EditBuffer> = state
            .editors
            .editing()
            .filter_map(|id| {
                state.editors.buffer(id).map(|text| EditBuffer {
                    element_id: id.clone(),
                    text: text.to_string(),
                })
            })
            .collect();
        editing.sort_by(|a, b| a.element_id.as_str().cmp(b.element_id.as_str()));

        WorkspaceSnapshot {
            load_state: state.load_state.clone(),
            funnels: state.funnels.clone(),
            current: state.current.clone(),
            saving: self.saving.load(Ordering::Acquire),
            error: state.error.clone(),
            preview: state.preview,
            editing,
        }
    }
}
