use color_eyre::eyre::OptionExt;
use crossterm::event::Event as CrosstermEvent;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::types::{Profile, ResultPage};
use crate::directory::controller::{FetchRequest, ToggleRequest};
use crate::directory::resolver::RelationshipFlags;

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events from the terminal.
    Crossterm(CrosstermEvent),
    /// Application-level events.
    App(Box<AppEvent>),
}

/// Application events: user intents and the outcomes of async work.
///
/// Every state change goes through the event loop, which is the only place
/// the directory state is mutated.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Quit,
    ToggleHelp,

    // -- Intents (sent from key handlers and commands) --
    /// The search box has been quiet for the debounce interval.
    QuerySettled {
        seq: u64,
        query: String,
    },
    /// Re-run page 1 of the current query immediately.
    Reload,
    LoadMore,
    ToggleFollow {
        user_id: String,
    },

    // -- Outcomes (sent from async tasks back to the event loop) --
    PageLoaded {
        request: FetchRequest,
        result: ApiResult<ResultPage>,
    },
    FlagsResolved(RelationshipFlags),
    ToggleCompleted {
        request: ToggleRequest,
        result: ApiResult<()>,
    },
    ProfileLoaded(ApiResult<Profile>),
}

/// API result type using `Arc<String>` so errors are `Clone`.
pub type ApiResult<T> = Result<T, Arc<String>>;

/// Wrap an app event for the event channel.
pub fn app_event(event: AppEvent) -> Event {
    Event::App(Box::new(event))
}

/// Terminal event handler.
///
/// Spawns a background task that emits tick and crossterm events, and exposes
/// an unbounded channel for application events.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns the event task.
    pub fn new(tick_rate_fps: f64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone(), tick_rate_fps);
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Receives the next event, blocking until one is available.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("Failed to receive event")
    }

    /// Queue an app event to be processed by the event loop.
    pub fn send(&self, event: AppEvent) {
        let _ = self.sender.send(app_event(event));
    }

    /// Clone the underlying sender for use in spawned async tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Background task that reads crossterm events and emits ticks.
struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
    tick_rate: Duration,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>, tick_rate_fps: f64) -> Self {
        Self {
            sender,
            tick_rate: Duration::from_secs_f64(1.0 / tick_rate_fps),
        }
    }

    async fn run(self) -> color_eyre::Result<()> {
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(self.tick_rate);
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => {
                    break;
                }
                _ = tick_delay => {
                    self.send(Event::Tick);
                }
                Some(Ok(evt)) = crossterm_event => {
                    self.send(Event::Crossterm(evt));
                }
            };
        }
        Ok(())
    }

    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}
