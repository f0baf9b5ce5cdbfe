use futures::future::{AbortHandle, Abortable, LocalBoxFuture};
use futures::FutureExt;
use leptos::{prelude::*, task::spawn_local};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::poller::{BrowserTimers, Jitter, RandomJitter, StaggeredPoller, Timers};
use super::resource::{FetchKind, ResourceState};
use crate::api::{ApiClient, ApiError, QueryParams};
use crate::config::RefreshSettings;
use crate::i18n::Locale;
use crate::models::{list_from_value, Paginated};

pub type FetchFn = Rc<dyn Fn(String) -> LocalBoxFuture<'static, Result<Value, ApiError>>>;
pub type SpawnFn = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Requests still in flight for one resource.
#[derive(Default)]
struct InFlight {
    next: u64,
    handles: Vec<(u64, AbortHandle)>,
}

impl InFlight {
    fn push(&mut self, handle: AbortHandle) -> u64 {
        let seq = self.next;
        self.next += 1;
        self.handles.push((seq, handle));
        seq
    }

    fn finish(&mut self, seq: u64) {
        self.handles.retain(|(s, _)| *s != seq);
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.handles.drain(..) {
            handle.abort();
        }
    }
}

/// Starts one fetch of the current URL and writes its outcome to the state.
#[derive(Clone)]
struct Runner {
    state: RwSignal<ResourceState>,
    url: Rc<RefCell<String>>,
    in_flight: Rc<RefCell<InFlight>>,
    fetch: FetchFn,
    spawn: SpawnFn,
}

impl Runner {
    fn run(&self, kind: FetchKind) {
        let url = self.url.borrow().clone();
        let Some(ticket) = self.state.try_update(|s| s.begin(kind)) else {
            return;
        };
        let (handle, registration) = AbortHandle::new_pair();
        let seq = self.in_flight.borrow_mut().push(handle);
        let request = Abortable::new((self.fetch)(url.clone()), registration);
        let in_flight = Rc::downgrade(&self.in_flight);
        let state = self.state;

        (self.spawn)(
            async move {
                let Ok(result) = request.await else {
                    debug!("{kind:?} fetch of {url} aborted");
                    return;
                };
                if let Some(in_flight) = in_flight.upgrade() {
                    in_flight.borrow_mut().finish(seq);
                }
                let applied = state.try_update(|s| s.complete(ticket, result));
                debug!("{kind:?} fetch of {url}: {applied:?}");
            }
            .boxed_local(),
        );
    }
}

/// Fetch lifecycle of one refreshable resource: the poller, the requests it
/// started and the state they report to. Dropping it aborts whatever is
/// still in flight.
pub struct RefreshDriver<T: Timers, J: Jitter = RandomJitter> {
    runner: Runner,
    poller: StaggeredPoller<T, J>,
    interval: Duration,
}

impl<T: Timers, J: Jitter> RefreshDriver<T, J> {
    pub fn new(
        state: RwSignal<ResourceState>,
        poller: StaggeredPoller<T, J>,
        fetch: FetchFn,
        spawn: SpawnFn,
        interval: Duration,
    ) -> Self {
        Self {
            runner: Runner {
                state,
                url: Rc::new(RefCell::new(String::new())),
                in_flight: Rc::new(RefCell::new(InFlight::default())),
                fetch,
                spawn,
            },
            poller,
            interval,
        }
    }

    /// Points the resource at `url`: requests for the old URL are aborted,
    /// the poller restarts and its immediate call is the foreground load.
    pub fn retarget(&mut self, url: String) {
        debug!("Refreshing {url}");
        self.runner.in_flight.borrow_mut().abort_all();
        self.runner.state.try_update(ResourceState::retarget);
        *self.runner.url.borrow_mut() = url;

        let first = Cell::new(true);
        let runner = self.runner.clone();
        let tick: Rc<dyn Fn()> = Rc::new(move || {
            let kind = if first.replace(false) {
                FetchKind::Foreground
            } else {
                FetchKind::Background
            };
            runner.run(kind);
        });
        if let Err(e) = self.poller.start(tick, self.interval) {
            error!("Could not start refresh for {}: {e}", self.runner.url.borrow());
        }
    }

    pub fn refetch(&self) {
        self.runner.run(FetchKind::Foreground);
    }
}

impl<T: Timers, J: Jitter> Drop for RefreshDriver<T, J> {
    fn drop(&mut self) {
        self.poller.stop();
        self.runner.in_flight.borrow_mut().abort_all();
    }
}

/// Reactive view of a polled backend resource.
#[derive(Clone, Copy)]
pub struct RefreshableResource {
    state: RwSignal<ResourceState>,
    refetch: Callback<()>,
}

impl RefreshableResource {
    pub fn data(&self) -> Value {
        self.state.with(|s| s.data().clone())
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading())
    }

    pub fn error(&self) -> String {
        self.state.with(|s| s.error().to_string())
    }

    /// The payload decoded as a `{count, results}` page.
    pub fn page<T: DeserializeOwned>(&self) -> Paginated<T> {
        self.state.with(|s| Paginated::from_value(s.data()))
    }

    /// The payload decoded as a plain list.
    pub fn list<T: DeserializeOwned>(&self) -> Vec<T> {
        self.state.with(|s| list_from_value(s.data()))
    }

    /// Foreground refetch: shows the loading state and surfaces errors.
    pub fn refetch(&self) {
        self.refetch.run(());
    }

    pub fn on_refresh(&self) -> Callback<()> {
        self.refetch
    }
}

/// Fetches `path` with `params` now and keeps it fresh with a staggered
/// poller. Whenever the serialized URL changes the old poller and any
/// in-flight requests are dropped and the new URL is fetched in the
/// foreground.
pub fn use_fetch_with_refresh(
    path: &'static str,
    params: impl Fn() -> QueryParams + Send + Sync + 'static,
) -> RefreshableResource {
    let client = use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(Locale::default()));
    let settings = use_context::<RefreshSettings>().unwrap_or_default();

    let state = RwSignal::new(ResourceState::new(settings.background_errors));
    let target = {
        let client = client.clone();
        Memo::new(move |_| client.get(path, &params()).url)
    };
    let fetch: FetchFn = Rc::new(move |url: String| {
        let client = client.clone();
        async move { client.get_json_at(&url).await }.boxed_local()
    });
    let spawn: SpawnFn = Rc::new(|task: LocalBoxFuture<'static, ()>| spawn_local(task));
    let driver = StoredValue::new_local(RefreshDriver::new(
        state,
        StaggeredPoller::new(BrowserTimers),
        fetch,
        spawn,
        settings.interval(),
    ));

    Effect::new(move |_| {
        let url = target.get();
        driver.update_value(|d| d.retarget(url));
    });

    RefreshableResource {
        state,
        refetch: Callback::new(move |_| driver.with_value(|d| d.refetch())),
    }
}
