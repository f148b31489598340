//! Shared fixtures for the controller integration tests.
//!
//! [`RecordingClient`] stands in for the REST client: every call is
//! recorded, and list/save/delete outcomes are scripted per test. Any of
//! them can also be gated behind a oneshot so a test decides when an
//! overlapping request resolves.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use publisher_model::{Author, EntityId, Page, PageQuery};
use tokio::sync::oneshot;

use publisher_console::domains::catalog::{EntityKind, PaginatedResourceController};
use publisher_console::infra::services::EntityClient;
use publisher_console::infra::{ApiError, ApiResult};

/// One call made against the client
#[derive(Debug, Clone, PartialEq)]
pub enum Call<K: EntityKind> {
    List(PageQuery),
    Search(String, PageQuery),
    Get(EntityId),
    Create(K::Draft),
    Update(EntityId, K::Draft),
    Delete(EntityId),
}

enum Scripted<T> {
    Ready(ApiResult<T>),
    Gated(oneshot::Receiver<ApiResult<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> ApiResult<T> {
        match self {
            Scripted::Ready(result) => result,
            Scripted::Gated(receiver) => receiver
                .await
                .unwrap_or(Err(ApiError::Network("gate dropped".into()))),
        }
    }
}

struct Script<K: EntityKind> {
    calls: Vec<Call<K>>,
    lists: VecDeque<Scripted<Page<K::Item>>>,
    saves: VecDeque<Scripted<K::Detail>>,
    deletes: VecDeque<Scripted<()>>,
}

pub struct RecordingClient<K: EntityKind> {
    script: Mutex<Script<K>>,
}

impl<K: EntityKind> fmt::Debug for RecordingClient<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingClient")
            .field("calls", &self.script.lock().calls)
            .finish()
    }
}

impl<K: EntityKind> Default for RecordingClient<K> {
    fn default() -> Self {
        Self {
            script: Mutex::new(Script {
                calls: Vec::new(),
                lists: VecDeque::new(),
                saves: VecDeque::new(),
                deletes: VecDeque::new(),
            }),
        }
    }
}

impl<K: EntityKind> RecordingClient<K> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Next list or search resolves immediately with `result`.
    pub fn push_list(&self, result: ApiResult<Page<K::Item>>) {
        self.script.lock().lists.push_back(Scripted::Ready(result));
    }

    /// Next list or search waits until the returned sender fires.
    pub fn gate_list(&self) -> oneshot::Sender<ApiResult<Page<K::Item>>> {
        let (sender, receiver) = oneshot::channel();
        self.script
            .lock()
            .lists
            .push_back(Scripted::Gated(receiver));
        sender
    }

    /// Next create or update resolves with `result`.
    pub fn push_save(&self, result: ApiResult<K::Detail>) {
        self.script.lock().saves.push_back(Scripted::Ready(result));
    }

    pub fn gate_save(&self) -> oneshot::Sender<ApiResult<K::Detail>> {
        let (sender, receiver) = oneshot::channel();
        self.script
            .lock()
            .saves
            .push_back(Scripted::Gated(receiver));
        sender
    }

    pub fn push_delete(&self, result: ApiResult<()>) {
        self.script.lock().deletes.push_back(Scripted::Ready(result));
    }

    pub fn gate_delete(&self) -> oneshot::Sender<ApiResult<()>> {
        let (sender, receiver) = oneshot::channel();
        self.script
            .lock()
            .deletes
            .push_back(Scripted::Gated(receiver));
        sender
    }

    pub fn calls(&self) -> Vec<Call<K>> {
        self.script.lock().calls.clone()
    }

    /// Recorded calls other than list loads
    pub fn mutations(&self) -> Vec<Call<K>> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::List(_) | Call::Search(..)))
            .collect()
    }

    pub fn list_queries(&self) -> Vec<PageQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::List(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    fn next_list(&self, call: Call<K>, query: &PageQuery) -> Scripted<Page<K::Item>> {
        let mut script = self.script.lock();
        script.calls.push(call);
        script
            .lists
            .pop_front()
            .unwrap_or_else(|| Scripted::Ready(Ok(Page::empty(query))))
    }

    fn next_save(&self, call: Call<K>) -> Scripted<K::Detail> {
        let mut script = self.script.lock();
        script.calls.push(call);
        script
            .saves
            .pop_front()
            .unwrap_or(Scripted::Ready(Err(ApiError::EmptyResponse)))
    }
}

#[async_trait]
impl<K: EntityKind> EntityClient<K> for RecordingClient<K> {
    async fn list(&self, query: PageQuery) -> ApiResult<Page<K::Item>> {
        self.next_list(Call::List(query), &query).resolve().await
    }

    async fn get(&self, id: EntityId) -> ApiResult<K::Detail> {
        self.script.lock().calls.push(Call::Get(id));
        Err(ApiError::Status {
            status: 404,
            message: format!("not found with id: {id}"),
        })
    }

    async fn create(&self, draft: &K::Draft) -> ApiResult<K::Detail> {
        self.next_save(Call::Create(draft.clone())).resolve().await
    }

    async fn update(&self, id: EntityId, draft: &K::Draft) -> ApiResult<K::Detail> {
        self.next_save(Call::Update(id, draft.clone()))
            .resolve()
            .await
    }

    async fn delete(&self, id: EntityId) -> ApiResult<()> {
        let next = {
            let mut script = self.script.lock();
            script.calls.push(Call::Delete(id));
            script
                .deletes
                .pop_front()
                .unwrap_or(Scripted::Ready(Ok(())))
        };
        next.resolve().await
    }

    async fn search_by_title(&self, title: &str, query: PageQuery) -> ApiResult<Page<K::Item>> {
        self.next_list(Call::Search(title.to_string(), query), &query)
            .resolve()
            .await
    }
}

pub type Controller<K> = PaginatedResourceController<K, RecordingClient<K>>;

pub fn controller<K: EntityKind>() -> (Controller<K>, Arc<RecordingClient<K>>) {
    let client = RecordingClient::<K>::new();
    (PaginatedResourceController::new(client.clone()), client)
}

pub fn author(id: EntityId, name: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        ..Author::default()
    }
}

/// Page `number` of `total` records holding `items`
pub fn page_of<T>(items: Vec<T>, number: u32, size: u32, total: u64) -> Page<T> {
    let total_pages = total.div_ceil(u64::from(size.max(1))) as u32;
    Page {
        content: items,
        total_elements: total,
        total_pages,
        size,
        number,
    }
}
