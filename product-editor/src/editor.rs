//! Product editor
//!
//! Composition root of the product form. Owns the versioned draft, the
//! pending thumbnail and the category tree for one edit session, and
//! drives the remote calls through [`EditorServices`].
//!
//! State sits behind a `parking_lot` mutex that is only taken in short,
//! synchronous sections; no lock is held across an `.await`.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use shared::models::Category;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use catalog_client::ClientResult;

use crate::assistant;
use crate::category::{CategoryOption, count_nodes, flatten_with};
use crate::config::{EditorConfig, NavigationPolicy};
use crate::error::{EditorError, EditorResult, GenerationError, UploadError};
use crate::fields::{DESCRIPTION, FieldDefinition, SelectOption, THUMBNAIL, product_form_controls};
use crate::form::{FormState, ProductDraft};
use crate::submission::{self, Dispatch};
use crate::transport::{EditorServices, ProductMutations};
use crate::upload::{
    MediaFile, ProgressTracker, UploadPhase, UploadState, resolve_receipt, validate_selection,
};

/// A field definition bound to the current draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldControl {
    pub definition: FieldDefinition,
    /// Current draft value, `null` when unset
    pub value: Value,
    /// Options to render; the category tree for the category select
    pub options: Vec<SelectOption>,
    /// Whether the AI description action is attached
    pub ai_action: bool,
}

/// Outcome of a successful [`ProductEditor::submit`]
#[derive(Debug)]
pub enum Submission {
    /// The mutation finished; carries the server's payload, if any
    Confirmed(Option<Value>),
    /// The mutation is still running; navigation already happened
    InFlight(JoinHandle<ClientResult<Option<Value>>>),
}

#[derive(Debug, Default)]
struct EditorState {
    form: FormState,
    upload: UploadState,
}

/// Decrements the busy counter on drop
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Settles one upload; an upload dropped before settling counts as failed
struct UploadGuard<'a> {
    state: &'a Mutex<EditorState>,
    progress: &'a ProgressTracker,
    file: Arc<MediaFile>,
    retain: bool,
    armed: bool,
}

impl UploadGuard<'_> {
    /// Finish under the caller's lock; returns whether no upload is left
    fn settle(&mut self, state: &mut EditorState, success: bool) -> bool {
        self.armed = false;
        state.upload.finish(&self.file, success, self.retain)
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let idle = self
            .state
            .lock()
            .upload
            .finish(&self.file, false, self.retain);
        if idle {
            self.progress.reset();
        }
        tracing::warn!(file = %self.file.name, "Thumbnail upload abandoned");
    }
}

/// One product edit session
pub struct ProductEditor {
    config: EditorConfig,
    services: EditorServices,
    categories: RwLock<Arc<Vec<Category>>>,
    state: Mutex<EditorState>,
    progress: ProgressTracker,
    busy: AtomicUsize,
}

impl std::fmt::Debug for ProductEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductEditor")
            .field("config", &self.config)
            .field("state", &*self.state.lock())
            .field("progress", &self.progress.current())
            .finish_non_exhaustive()
    }
}

impl ProductEditor {
    /// Create an editor without loading categories
    pub fn new(config: EditorConfig, services: EditorServices, initial: Arc<ProductDraft>) -> Self {
        Self {
            config,
            services,
            categories: RwLock::new(Arc::new(Vec::new())),
            state: Mutex::new(EditorState {
                form: FormState::new(initial),
                upload: UploadState::default(),
            }),
            progress: ProgressTracker::new(),
            busy: AtomicUsize::new(0),
        }
    }

    /// Create an editor and load the category tree once
    ///
    /// A failed category fetch is logged and leaves the tree empty; the
    /// form stays usable.
    pub async fn mount(
        config: EditorConfig,
        services: EditorServices,
        initial: Arc<ProductDraft>,
    ) -> Self {
        let editor = Self::new(config, services, initial);
        if let Err(e) = editor.refresh_categories().await {
            tracing::warn!(error = %e, "Category tree unavailable, continuing without it");
        }
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether any remote call is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) > 0
    }

    // ========== Categories ==========

    /// Fetch the category tree; returns the number of nodes loaded
    pub async fn refresh_categories(&self) -> EditorResult<usize> {
        let _busy = BusyGuard::enter(&self.busy);
        let tree = self
            .services
            .categories
            .fetch_categories()
            .await
            .map_err(EditorError::Categories)?;

        let count = count_nodes(&tree);
        *self.categories.write() = Arc::new(tree);
        tracing::info!(categories = count, "Category tree loaded");
        Ok(count)
    }

    pub fn categories(&self) -> Arc<Vec<Category>> {
        self.categories.read().clone()
    }

    pub fn category_options(&self) -> Vec<CategoryOption> {
        flatten_with(&self.categories(), &self.config.indent_unit)
    }

    // ========== Draft ==========

    pub fn values(&self) -> ProductDraft {
        self.state.lock().form.values().clone()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.state.lock().form.get(name).cloned()
    }

    pub fn revision(&self) -> u64 {
        self.state.lock().form.revision()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().form.generation()
    }

    /// Field-level change from a control
    pub fn set_field(&self, name: &str, value: Value) {
        self.state.lock().form.set_field(name, value);
    }

    pub fn merge(&self, partial: ProductDraft) {
        self.state.lock().form.merge(partial);
    }

    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&ProductDraft) -> ProductDraft,
    {
        self.state.lock().form.update(updater);
    }

    pub fn replace(&self, draft: ProductDraft) {
        self.state.lock().form.replace(draft);
    }

    /// Re-seed the draft when the initial data changed identity
    pub fn sync_initial(&self, initial: &Arc<ProductDraft>) -> bool {
        let replaced = self.state.lock().form.sync_initial(initial);
        if replaced {
            tracing::debug!("Draft re-seeded from new initial data");
        }
        replaced
    }

    /// Controls to render, bound to the current draft
    pub fn controls(&self) -> Vec<FieldControl> {
        let category_options: Vec<SelectOption> = self
            .category_options()
            .into_iter()
            .map(|o| SelectOption::new(o.value.to_string(), o.label))
            .collect();
        let draft = self.values();

        product_form_controls()
            .into_iter()
            .map(|definition| {
                let options = if definition.is_category_select() {
                    category_options.clone()
                } else {
                    definition.options.clone()
                };
                FieldControl {
                    value: draft.get(definition.name).cloned().unwrap_or(Value::Null),
                    ai_action: definition.has_ai_action(),
                    options,
                    definition,
                }
            })
            .collect()
    }

    pub fn submit_label(&self) -> &'static str {
        submission::submit_label(self.state.lock().form.values())
    }

    // ========== Thumbnail ==========

    /// Accept a file for upload; a rejected file changes nothing
    pub fn select_thumbnail(&self, file: MediaFile) -> Result<(), UploadError> {
        if let Err(e) = validate_selection(&file, &self.config.upload) {
            tracing::warn!(file = %file.name, size = file.size(), error = %e, "Thumbnail rejected");
            return Err(e);
        }
        tracing::debug!(file = %file.name, size = file.size(), "Thumbnail selected");
        self.state.lock().upload.select(file);
        self.progress.reset();
        Ok(())
    }

    pub fn pending_thumbnail(&self) -> Option<Arc<MediaFile>> {
        self.state.lock().upload.pending().cloned()
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.state.lock().upload.phase()
    }

    /// Upload the pending file and attach its reference as `thumbnail`
    ///
    /// On failure `thumbnail` is left as it was. Progress is back at 0 once
    /// the last running upload settles, whatever the outcome, including
    /// when this future is dropped before completing.
    pub async fn upload_thumbnail(&self) -> EditorResult<String> {
        let (file, generation, first) = {
            let mut state = self.state.lock();
            let file = state.upload.begin()?;
            (file, state.form.generation(), state.upload.in_flight() == 1)
        };
        let mut guard = UploadGuard {
            state: &self.state,
            progress: &self.progress,
            file: Arc::clone(&file),
            retain: self.config.upload.retain_pending_on_failure,
            armed: true,
        };

        let _busy = BusyGuard::enter(&self.busy);
        if first {
            self.progress.reset();
        }
        tracing::info!(file = %file.name, size = file.size(), "Uploading thumbnail");

        let sent = self
            .services
            .uploader
            .upload(&file, self.progress.callback())
            .await;
        let outcome = match sent {
            Ok(receipt) => resolve_receipt(receipt),
            Err(e) => Err(UploadError::Transport(e)),
        };

        let (result, idle) = {
            let mut state = self.state.lock();
            match outcome {
                Ok(reference) => {
                    match state
                        .form
                        .set_field_if_current(generation, THUMBNAIL, reference.clone())
                    {
                        Ok(_) => {
                            let idle = guard.settle(&mut state, true);
                            (Ok(reference), idle)
                        }
                        Err(current) => {
                            let idle = guard.settle(&mut state, false);
                            let stale = EditorError::StaleDraft {
                                started: generation,
                                current,
                            };
                            (Err(stale), idle)
                        }
                    }
                }
                Err(e) => {
                    let idle = guard.settle(&mut state, false);
                    (Err(EditorError::Upload(e)), idle)
                }
            }
        };
        if idle {
            self.progress.reset();
        }

        match &result {
            Ok(reference) => tracing::info!(reference = %reference, "Thumbnail uploaded"),
            Err(e) => tracing::error!(file = %file.name, error = %e, "Thumbnail upload failed"),
        }
        result
    }

    /// Clear the attached thumbnail and any pending file
    pub fn remove_thumbnail(&self) {
        let mut state = self.state.lock();
        state.form.set_field(THUMBNAIL, "");
        state.upload.clear();
    }

    /// Drop the selected file, keeping an attached thumbnail
    pub fn discard_selection(&self) {
        self.state.lock().upload.clear();
        self.progress.reset();
    }

    pub fn progress(&self) -> u8 {
        self.progress.current()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    // ========== AI description ==========

    /// Generate a description for the current draft and write it
    ///
    /// If the draft is replaced while the generator runs, the text is
    /// discarded and [`EditorError::StaleDraft`] is returned.
    pub async fn generate_description(&self) -> EditorResult<String> {
        let tree = self.categories();
        let (request, generation) = {
            let state = self.state.lock();
            let request = assistant::build_request(state.form.values(), &tree);
            (request, state.form.generation())
        };

        let _busy = BusyGuard::enter(&self.busy);
        tracing::info!(category = %request.category, "Generating description");

        let text = self
            .services
            .generator
            .generate(&request)
            .await
            .map_err(GenerationError::Transport)
            .and_then(assistant::accept_description)
            .inspect_err(|e| tracing::error!(error = %e, "Description generation failed"))?;

        let written = self
            .state
            .lock()
            .form
            .set_field_if_current(generation, DESCRIPTION, text.clone());
        match written {
            Ok(_) => Ok(text),
            Err(current) => {
                tracing::warn!(started = generation, current, "Discarding stale description");
                Err(EditorError::StaleDraft {
                    started: generation,
                    current,
                })
            }
        }
    }

    // ========== Submission ==========

    /// Validate the draft and dispatch create or update
    ///
    /// Validation failures dispatch nothing. Navigation follows the
    /// configured [`NavigationPolicy`].
    pub async fn submit(&self) -> EditorResult<Submission> {
        let prepared = {
            let state = self.state.lock();
            submission::prepare(state.form.values(), state.upload.has_pending())
        };
        let dispatch =
            prepared.inspect_err(|e| tracing::warn!(error = %e, "Submission rejected"))?;

        tracing::info!(update = dispatch.is_update(), "Submitting product");
        let route = self.config.listing_route.clone();

        match self.config.navigation {
            NavigationPolicy::AfterConfirmation => {
                let _busy = BusyGuard::enter(&self.busy);
                let saved = run_dispatch(self.services.products.as_ref(), &dispatch)
                    .await
                    .map_err(EditorError::Dispatch)
                    .inspect_err(|e| tracing::error!(error = %e, "Failed to save product"))?;
                self.services.navigator.navigate(&route);
                Ok(Submission::Confirmed(saved))
            }
            NavigationPolicy::AfterDispatch => {
                let products = Arc::clone(&self.services.products);
                let handle = tokio::spawn(async move {
                    let saved = run_dispatch(products.as_ref(), &dispatch).await;
                    if let Err(e) = &saved {
                        tracing::error!(error = %e, "Failed to save product");
                    }
                    saved
                });
                self.services.navigator.navigate(&route);
                Ok(Submission::InFlight(handle))
            }
        }
    }
}

async fn run_dispatch(
    products: &dyn ProductMutations,
    dispatch: &Dispatch,
) -> ClientResult<Option<Value>> {
    match dispatch {
        Dispatch::Create(payload) => products.create_product(payload).await,
        Dispatch::Update { id, payload } => products.update_product(id, payload).await,
    }
}
