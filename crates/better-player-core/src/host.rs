//! Host seams - what the embedding platform provides to the core
//!
//! The core never touches a real DOM, timer or network. A host supplies:
//! - media backends, probed in priority order ([`VideoBackend`])
//! - a [`Scheduler`] for deferred (macro-task) work
//! - a [`FullscreenDriver`] bound to the player's root element
//! - optionally a [`SpriteLoader`] for the icon sprite

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::fullscreen::{FullscreenDriver, HeadlessFullscreen};
use crate::video::VideoBackend;

/// Deferred unit of work
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after the current call stack has unwound
pub trait Scheduler {
    fn defer(&self, task: Task);
}

/// Manually drained task queue for headless hosts and tests
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the tasks queued before this call, in FIFO order. Tasks deferred
    /// while running wait for the next call. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let pending = self.tasks.borrow().len();
        for _ in 0..pending {
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => return pending,
            }
        }
        pending
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Inserts the icon sprite into the page
pub trait SpriteLoader {
    fn load(&self, url: &str);
}

/// Platform services handed to [`Core`](crate::Core) at construction
pub struct Host {
    pub backends: Vec<Box<dyn VideoBackend>>,
    pub scheduler: Rc<dyn Scheduler>,
    pub fullscreen: Rc<dyn FullscreenDriver>,
    pub sprite_loader: Option<Rc<dyn SpriteLoader>>,
}

impl Host {
    /// Host without media backends: every source falls back to the no-video backend
    pub fn headless(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            backends: Vec::new(),
            scheduler,
            fullscreen: Rc::new(HeadlessFullscreen::default()),
            sprite_loader: None,
        }
    }

    /// Append a backend; earlier backends take priority
    pub fn with_backend(mut self, backend: impl VideoBackend + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    pub fn with_fullscreen(mut self, driver: Rc<dyn FullscreenDriver>) -> Self {
        self.fullscreen = driver;
        self
    }

    pub fn with_sprite_loader(mut self, loader: Rc<dyn SpriteLoader>) -> Self {
        self.sprite_loader = Some(loader);
        self
    }
}
