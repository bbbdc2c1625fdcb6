use std::fs;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Color32, Context, Vec2};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogSnapshot, ChartAxis, EntityStatus, load_catalog};

mod charts;
mod graph;
mod highlight;
mod layout;
mod render_utils;
mod ui;

pub struct FactmapApp {
    catalog_path: String,
    view_path: Option<String>,
    initial_view: Option<ViewConfig>,
    state: AppState,
    reload_rx: Option<Receiver<Result<CatalogSnapshot, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<CatalogSnapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ViewMode {
    Graph,
    Spider,
    Scatter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UnrelatedDisplayMode {
    Dim,
    Hide,
}

/// The explicit, serializable view state. Engines take plain parameters
/// read from here; nothing reads ambient or global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
struct ViewConfig {
    mode: ViewMode,
    focus: Option<String>,
    unrelated_mode: UnrelatedDisplayMode,
    displayed_properties: Vec<String>,
    spider_axes: Vec<ChartAxis>,
    scatter_x: Option<ChartAxis>,
    scatter_y: Option<ChartAxis>,
    max_weight: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::Graph,
            focus: None,
            unrelated_mode: UnrelatedDisplayMode::Dim,
            displayed_properties: Vec::new(),
            spider_axes: Vec::new(),
            scatter_x: None,
            scatter_y: None,
            max_weight: 10.0,
        }
    }
}

struct ViewModel {
    snapshot: CatalogSnapshot,
    view: ViewConfig,
    search: String,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    graph_dirty: bool,
    graph_cache: Option<GraphCache>,
    connect_drag: Option<ConnectDrag>,
    pending_connect: Option<ConnectRequest>,
}

struct GraphCache {
    nodes: Vec<GraphNode>,
    edges: Vec<(usize, usize)>,
}

struct GraphNode {
    id: String,
    name: String,
    status: EntityStatus,
    color: Color32,
    rows: Vec<(String, String)>,
    world_pos: Vec2,
    height: f32,
}

/// Primary drag that started on a node and may become a connection.
struct ConnectDrag {
    source_index: usize,
}

/// A validated connect gesture awaiting user confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ConnectRequest {
    source_id: String,
    source_name: String,
    target_id: String,
    target_name: String,
}

fn load_view_config(path: &str) -> Result<ViewConfig> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read view state {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse view state {path}"))
}

fn save_view_config(path: &str, view: &ViewConfig) -> Result<()> {
    let raw = serde_json::to_string_pretty(view).context("failed to serialize view state")?;
    fs::write(path, raw).with_context(|| format!("failed to write view state {path}"))
}

impl FactmapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        catalog_path: String,
        view_path: Option<String>,
    ) -> Self {
        let initial_view = view_path
            .as_deref()
            .and_then(|path| load_view_config(path).ok());
        let state = Self::start_load(catalog_path.clone());
        Self {
            catalog_path,
            view_path,
            initial_view,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(catalog_path: String) -> Receiver<Result<CatalogSnapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_catalog(&catalog_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(catalog_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(catalog_path),
        }
    }
}

impl eframe::App for FactmapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => {
                            // The first load applies the saved view state,
                            // when one was given.
                            let view = self.initial_view.take().unwrap_or_default();
                            AppState::Ready(Box::new(ViewModel::new(snapshot, view)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading factsheet catalog...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load factsheet catalog");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.catalog_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let mut save_view_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(
                    ctx,
                    &self.catalog_path,
                    self.view_path.as_deref(),
                    &mut reload_requested,
                    &mut save_view_requested,
                    is_reloading,
                );

                // A failed save must not tear down the running view.
                if save_view_requested
                    && let Some(view_path) = self.view_path.as_deref()
                    && let Err(error) = save_view_config(view_path, &model.view)
                {
                    eprintln!("factmap: {error:#}");
                }

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.catalog_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(snapshot) => {
                                    // Reloads keep the current view state.
                                    let view = model.view.clone();
                                    AppState::Ready(Box::new(ViewModel::new(snapshot, view)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
