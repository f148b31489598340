//! Generic controller behind every paginated entity screen.
//!
//! Actions take `&self` so they can overlap. State sits behind a
//! `parking_lot::Mutex` that is never held across an `.await`; each list
//! load carries a sequence number and only a result newer than the last
//! settled one, success or failure, may touch the displayed page.
//!
//! ```text
//! dialog:  Closed -> Open(Create | Edit) -> Closed
//! list:    Idle -> Loading -> Idle       (failure keeps the previous page)
//! delete:  Hidden -> Showing -> Hidden
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use parking_lot::Mutex;
use publisher_model::{Identified, PageQuery, SortDirection};

use crate::domains::catalog::error::{ControllerError, ControllerResult};
use crate::domains::catalog::kind::EntityKind;
use crate::domains::catalog::state::{ControllerState, DialogMode, DialogState};
use crate::infra::error::ApiError;
use crate::infra::services::EntityClient;

#[derive(Debug)]
struct Inner<K: EntityKind> {
    view: ControllerState<K>,
    settled_seq: u64,
    loads_in_flight: usize,
    dialog_epoch: u64,
}

/// Runs `settle` against the controller state when dropped, so in-flight
/// flags are cleared even if the action's future is abandoned.
struct Settle<'a, K: EntityKind> {
    inner: &'a Mutex<Inner<K>>,
    settle: fn(&mut Inner<K>),
}

impl<K: EntityKind> Drop for Settle<'_, K> {
    fn drop(&mut self) {
        (self.settle)(&mut self.inner.lock());
    }
}

fn settle_load<K: EntityKind>(inner: &mut Inner<K>) {
    inner.loads_in_flight = inner.loads_in_flight.saturating_sub(1);
    inner.view.loading = inner.loads_in_flight > 0;
}

fn settle_save<K: EntityKind>(inner: &mut Inner<K>) {
    inner.view.saving = false;
}

fn settle_delete<K: EntityKind>(inner: &mut Inner<K>) {
    inner.view.deleting = false;
}

#[derive(Debug)]
pub struct PaginatedResourceController<K: EntityKind, C: EntityClient<K>> {
    client: Arc<C>,
    inner: Mutex<Inner<K>>,
    next_seq: AtomicU64,
}

impl<K: EntityKind, C: EntityClient<K>> PaginatedResourceController<K, C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_query(client, PageQuery::default())
    }

    /// Controller whose first load will use `query`.
    pub fn with_query(client: Arc<C>, query: PageQuery) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                view: ControllerState::with_query(query),
                settled_seq: 0,
                loads_in_flight: 0,
                dialog_epoch: 0,
            }),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ControllerState<K> {
        self.inner.lock().view.clone()
    }

    /// Initial load. A non-blank `search_term` is sent to the title search
    /// instead of the plain list; later navigation always uses the list.
    pub async fn start(&self, search_term: Option<&str>) -> ControllerResult<()> {
        let query = self.snapshot().query();
        let term = search_term.map(str::trim).filter(|term| !term.is_empty());
        self.fetch(query, term).await
    }

    /// Records `query` as the current cursor and fetches that page.
    pub async fn load(&self, query: PageQuery) -> ControllerResult<()> {
        self.fetch(query, None).await
    }

    /// Fetches the current cursor again.
    pub async fn reload(&self) -> ControllerResult<()> {
        let query = self.snapshot().query();
        self.fetch(query, None).await
    }

    /// Moves to `page` with `size` rows, keeping the sort. The page index
    /// is sent as given, even past the end.
    pub async fn change_page(&self, page: u32, size: u32) -> ControllerResult<()> {
        let query = PageQuery {
            page,
            size,
            ..self.snapshot().query()
        };
        self.fetch(query, None).await
    }

    /// Re-sorts, keeping the page and size.
    pub async fn change_sort(&self, sort: SortDirection) -> ControllerResult<()> {
        let query = PageQuery {
            sort,
            ..self.snapshot().query()
        };
        self.fetch(query, None).await
    }

    async fn fetch(&self, query: PageQuery, search: Option<&str>) -> ControllerResult<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = {
            let mut inner = self.inner.lock();
            inner.view.page = query.page;
            inner.view.page_size = query.size;
            inner.view.sort = query.sort;
            inner.loads_in_flight += 1;
            inner.view.loading = true;
            Settle {
                inner: &self.inner,
                settle: settle_load::<K>,
            }
        };

        let result = match search {
            Some(term) => self.client.search_by_title(term, query).await,
            None => self.client.list(query).await,
        };

        let mut inner = self.inner.lock();
        if seq <= inner.settled_seq {
            debug!(
                "[{}] Discarding stale result for page {} (load #{} superseded by #{})",
                K::LABEL,
                query.page,
                seq,
                inner.settled_seq
            );
            return result.map(|_| ()).map_err(Into::into);
        }
        inner.settled_seq = seq;
        match result {
            Ok(page) => {
                debug!(
                    "[{}] Loaded {} of {} record(s) on page {}",
                    K::LABEL,
                    page.content.len(),
                    page.total_elements,
                    query.page
                );
                inner.view.items = page.content;
                inner.view.total_records = page.total_elements;
                inner.view.total_pages = page.total_pages;
                inner.view.last_error = None;
                Ok(())
            }
            Err(err) => {
                warn!("[{}] Failed to load page {}: {}", K::LABEL, query.page, err);
                inner.view.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Opens an empty create form, replacing any open draft.
    pub fn open_create(&self) {
        let mut inner = self.inner.lock();
        let view = &mut inner.view;
        view.editing = false;
        view.selected = None;
        view.draft = K::Draft::default();
        view.dialog = DialogState::Open(DialogMode::Create);
        inner.dialog_epoch += 1;
    }

    /// Opens the edit form seeded from `item`, replacing any open draft.
    pub fn open_edit(&self, item: K::Item) {
        let mut inner = self.inner.lock();
        let view = &mut inner.view;
        view.draft = K::draft_from_item(&item);
        view.selected = Some(item);
        view.editing = true;
        view.dialog = DialogState::Open(DialogMode::Edit);
        inner.dialog_epoch += 1;
    }

    /// Mutates the open draft in place.
    pub fn edit_draft(&self, f: impl FnOnce(&mut K::Draft)) -> ControllerResult<()> {
        let mut inner = self.inner.lock();
        if !inner.view.dialog_open() {
            return Err(ControllerError::DialogClosed);
        }
        f(&mut inner.view.draft);
        Ok(())
    }

    pub fn set_draft(&self, draft: K::Draft) -> ControllerResult<()> {
        self.edit_draft(|current| *current = draft)
    }

    /// Closes the dialog and discards the draft.
    pub fn close_dialog(&self) {
        let mut inner = self.inner.lock();
        inner.view.close_dialog();
        inner.dialog_epoch += 1;
    }

    /// Submits the open draft: update when editing, create otherwise. On
    /// success the dialog closes and the current page is reloaded; on
    /// failure the dialog stays open with the draft intact. A dialog opened
    /// or closed while the request was out is left alone.
    pub async fn save(&self) -> ControllerResult<K::Detail> {
        let (target, draft, epoch, saving) = {
            let mut inner = self.inner.lock();
            let view = &mut inner.view;
            if !view.dialog_open() {
                return Err(ControllerError::DialogClosed);
            }
            if view.saving {
                return Err(ControllerError::SaveInFlight);
            }
            let target = if view.editing {
                let id = view
                    .selected
                    .as_ref()
                    .map(Identified::id)
                    .ok_or(ControllerError::NothingSelected)?;
                Some(id)
            } else {
                None
            };
            view.saving = true;
            let draft = view.draft.clone();
            let saving = Settle {
                inner: &self.inner,
                settle: settle_save::<K>,
            };
            (target, draft, inner.dialog_epoch, saving)
        };

        let result = match target {
            Some(id) => self.client.update(id, &draft).await,
            None => self.client.create(&draft).await,
        };
        drop(saving);

        match result {
            Ok(saved) => {
                match target {
                    Some(id) => info!("[{}] Updated record {}", K::LABEL, id),
                    None => info!("[{}] Created record", K::LABEL),
                }
                {
                    let mut inner = self.inner.lock();
                    if inner.dialog_epoch == epoch {
                        inner.view.close_dialog();
                    } else {
                        debug!("[{}] Dialog changed during save; leaving it open", K::LABEL);
                    }
                    inner.view.last_error = None;
                }
                self.reload_after_mutation().await;
                Ok(saved)
            }
            Err(err) => {
                warn!("[{}] Save failed: {}", K::LABEL, err);
                self.record_error(&err);
                Err(err.into())
            }
        }
    }

    /// Shows the delete confirmation for `item`. Nothing is sent yet.
    pub fn request_delete(&self, item: K::Item) -> ControllerResult<()> {
        let mut inner = self.inner.lock();
        if inner.view.deleting {
            return Err(ControllerError::DeleteInFlight);
        }
        inner.view.pending_delete = Some(item);
        Ok(())
    }

    /// Deletes the record awaiting confirmation. The confirmation is hidden
    /// whatever the outcome; a success also reloads the current page.
    pub async fn confirm_delete(&self) -> ControllerResult<()> {
        let (id, deleting) = {
            let mut inner = self.inner.lock();
            if inner.view.deleting {
                return Err(ControllerError::DeleteInFlight);
            }
            let id = inner
                .view
                .pending_delete
                .as_ref()
                .map(Identified::id)
                .ok_or(ControllerError::NoPendingDelete)?;
            inner.view.deleting = true;
            let deleting = Settle {
                inner: &self.inner,
                settle: settle_delete::<K>,
            };
            (id, deleting)
        };

        let result = self.client.delete(id).await;
        drop(deleting);
        self.inner.lock().view.pending_delete = None;

        match result {
            Ok(()) => {
                info!("[{}] Deleted record {}", K::LABEL, id);
                self.reload_after_mutation().await;
                Ok(())
            }
            Err(err) => {
                warn!("[{}] Delete of record {} failed: {}", K::LABEL, id, err);
                self.record_error(&err);
                Err(err.into())
            }
        }
    }

    /// Hides the delete confirmation without contacting the server.
    pub fn cancel_delete(&self) {
        self.inner.lock().view.pending_delete = None;
    }

    fn record_error(&self, err: &ApiError) {
        self.inner.lock().view.last_error = Some(err.to_string());
    }

    /// The mutation already succeeded, so a failed reload is only logged;
    /// its message stays visible in `last_error`.
    async fn reload_after_mutation(&self) {
        if let Err(err) = self.reload().await {
            warn!("[{}] Reload after change failed: {}", K::LABEL, err);
        }
    }
}
