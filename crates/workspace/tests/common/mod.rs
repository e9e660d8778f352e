//! Shared test utilities for workspace integration tests.
//!
//! Provides a process host that records every call instead of spawning
//! processes, a surface factory that records what each surface receives,
//! and a temp-dir backed store environment.

// Not every test binary uses every helper
#![allow(dead_code)]

use broadcast::Broadcast;
use settings::{Invocation, JsonFileStore, MemoryStore};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use terminal::{
    Frame, HostEvent, ProcessHost, RenderSurface, SessionId, SurfaceArea, SurfaceFactory, TermSize,
};
use terminon_workspace::{ConfigManager, Workspace};
use theme::Theme;

pub use tempfile::{tempdir, TempDir};

// ============================================================================
// Process Host
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create(SessionId, Invocation),
    Write(SessionId, String),
    Resize(SessionId, TermSize),
    Close(SessionId),
}

/// Records host calls. Sessions never produce output on their own; tests
/// script output with [`data`] and [`exit`].
#[derive(Default)]
pub struct FakeHost {
    pub calls: Vec<HostCall>,
}

impl FakeHost {
    pub fn created(&self) -> Vec<SessionId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Create(id, _) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn closed(&self) -> Vec<SessionId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Close(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn writes_to(&self, id: &SessionId) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Write(target, data) if target == id => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn resizes_of(&self, id: &SessionId) -> Vec<TermSize> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Resize(target, size) if target == id => Some(*size),
                _ => None,
            })
            .collect()
    }
}

impl ProcessHost for FakeHost {
    fn create_session(&mut self, id: &SessionId, invocation: &Invocation) {
        self.calls.push(HostCall::Create(id.clone(), invocation.clone()));
    }

    fn write_session(&mut self, id: &SessionId, data: &str) {
        self.calls.push(HostCall::Write(id.clone(), data.to_string()));
    }

    fn resize_session(&mut self, id: &SessionId, size: TermSize) {
        self.calls.push(HostCall::Resize(id.clone(), size));
    }

    fn close_session(&mut self, id: &SessionId) {
        self.calls.push(HostCall::Close(id.clone()));
    }
}

pub fn data(id: &SessionId, data: &str) -> HostEvent {
    HostEvent::Data {
        id: id.clone(),
        data: data.to_string(),
    }
}

pub fn exit(id: &SessionId) -> HostEvent {
    HostEvent::Exit { id: id.clone() }
}

// ============================================================================
// Render Surfaces
// ============================================================================

/// Everything one surface received, in order.
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub initial_theme: &'static str,
    pub written: Vec<String>,
    pub themes: Vec<&'static str>,
    pub disposed: bool,
}

pub type SurfaceLogs = Rc<RefCell<Vec<SurfaceLog>>>;

struct RecordingSurface {
    index: usize,
    logs: SurfaceLogs,
    size: TermSize,
    theme: &'static Theme,
}

impl RenderSurface for RecordingSurface {
    fn write(&mut self, data: &str) {
        self.logs.borrow_mut()[self.index]
            .written
            .push(data.to_string());
    }

    fn fit(&mut self, area: SurfaceArea) -> TermSize {
        self.size = TermSize::fit(area);
        self.size
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn apply_theme(&mut self, theme: &'static Theme) {
        self.theme = theme;
        self.logs.borrow_mut()[self.index].themes.push(theme.id);
    }

    fn theme(&self) -> &'static Theme {
        self.theme
    }

    fn title(&self) -> Option<String> {
        None
    }

    fn take_replies(&mut self) -> Vec<String> {
        Vec::new()
    }

    fn snapshot(&self) -> Option<Frame> {
        None
    }

    fn dispose(&mut self) {
        self.logs.borrow_mut()[self.index].disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.logs.borrow()[self.index].disposed
    }
}

/// A factory whose surfaces append to the returned logs in creation order.
pub fn recording_surfaces() -> (SurfaceFactory, SurfaceLogs) {
    let logs: SurfaceLogs = Rc::new(RefCell::new(Vec::new()));
    let shared = logs.clone();
    let factory: SurfaceFactory = Box::new(move |theme: &'static Theme| {
        let index = {
            let mut logs = shared.borrow_mut();
            logs.push(SurfaceLog {
                initial_theme: theme.id,
                ..SurfaceLog::default()
            });
            logs.len() - 1
        };
        Box::new(RecordingSurface {
            index,
            logs: shared.clone(),
            size: TermSize::default(),
            theme,
        }) as Box<dyn RenderSurface>
    });
    (factory, logs)
}

// ============================================================================
// Workspace Setup
// ============================================================================

pub fn default_area() -> SurfaceArea {
    SurfaceArea::from_cells(80, 24)
}

/// A workspace over an in-memory store.
pub fn workspace() -> (Workspace<FakeHost>, SurfaceLogs) {
    let config = ConfigManager::load(Box::new(MemoryStore::new()), Broadcast::new());
    workspace_with(config)
}

pub fn workspace_with(config: ConfigManager) -> (Workspace<FakeHost>, SurfaceLogs) {
    let (factory, logs) = recording_surfaces();
    let workspace = Workspace::new(FakeHost::default(), config, factory, default_area());
    (workspace, logs)
}

/// Isolated directory holding a JSON store file.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let store_path = temp_dir.path().join("store.json");
        Self {
            temp_dir,
            store_path,
        }
    }

    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::open(&self.store_path)
    }

    pub fn config(&self) -> ConfigManager {
        ConfigManager::load(Box::new(self.open_store()), Broadcast::new())
    }

    pub fn read_store(&self) -> Option<String> {
        std::fs::read_to_string(&self.store_path).ok()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
