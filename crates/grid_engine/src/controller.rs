//! The per-instance orchestrator: routes host operations and engine events
//! through the pure update function and executes the resulting effects.
use engine_logging::{engine_debug, engine_trace};
use grid_core::{
    update, ColumnSpec, Effect, GridConfig, GridOptions, GridState, GridViewModel, Msg,
    RenderScope, Renderer, Row,
};

use crate::engine::EngineHandle;
use crate::fetch::{AsyncSources, FetchSettings};
use crate::{EngineEvent, GridError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Host interaction; already inside a render cycle.
    Host,
    /// Timer or fetch completion; renders via the reconciliation pulse.
    Engine,
}

pub struct GridControllerBuilder {
    options: GridOptions,
    renderer: Box<dyn Renderer>,
    config: GridConfig,
    sources: Option<AsyncSources>,
    settings: FetchSettings,
}

impl GridControllerBuilder {
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sources(mut self, sources: AsyncSources) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Validates configuration, starts the engine and mounts the grid.
    pub fn build(self) -> Result<GridController, GridError> {
        let state = GridState::new(self.options, self.config)?;
        let resolved = if state.is_async() {
            Some(
                self.sources
                    .unwrap_or_default()
                    .resolve(&self.settings, &state.options().url_params)?,
            )
        } else {
            None
        };
        let engine = EngineHandle::new(resolved)?;

        let mut controller = GridController {
            state,
            engine,
            renderer: self.renderer,
        };
        controller.dispatch(Msg::Mounted, Origin::Host);
        Ok(controller)
    }
}

pub struct GridController {
    state: GridState,
    engine: EngineHandle,
    renderer: Box<dyn Renderer>,
}

impl GridController {
    pub fn builder(options: GridOptions, renderer: Box<dyn Renderer>) -> GridControllerBuilder {
        GridControllerBuilder {
            options,
            renderer,
            config: GridConfig::default(),
            sources: None,
            settings: FetchSettings::default(),
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn view(&self) -> GridViewModel {
        self.state.view()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.state.options().columns
    }

    /// Feeds raw search input; committed after the configured quiet period.
    pub fn search(&mut self, term: impl Into<String>) {
        self.dispatch(Msg::SearchChanged(term.into()), Origin::Host);
    }

    /// Column header click.
    pub fn order(&mut self, field: impl Into<String>) {
        self.dispatch(Msg::ColumnHeaderClicked(field.into()), Origin::Host);
    }

    pub fn select_page(&mut self, page: u32) {
        self.dispatch(Msg::PageSelected(page), Origin::Host);
    }

    pub fn first_page(&mut self) {
        self.select_page(1);
    }

    pub fn last_page(&mut self) {
        let last = self.state.total_pages();
        self.select_page(last);
    }

    pub fn set_display_limit(&mut self, limit: usize) {
        self.dispatch(Msg::DisplayLimitChanged(limit), Origin::Host);
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.dispatch(Msg::RowsReplaced(rows), Origin::Host);
    }

    /// Full reload: count, then rows.
    pub fn refresh(&mut self) {
        self.dispatch(Msg::RefreshRequested, Origin::Host);
    }

    pub fn recompile(&mut self, force: bool) {
        self.dispatch(Msg::RecompileRequested { force }, Origin::Host);
    }

    /// Applies every engine event already delivered. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.engine.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next engine event and applies it. False once the engine is gone.
    pub async fn next_event(&mut self) -> bool {
        match self.engine.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        engine_trace!("engine event {:?}", event);
        let msg = match event {
            EngineEvent::CountLoaded { request_id, result } => Msg::CountLoaded {
                request_id,
                result: result.map_err(|err| err.to_string()),
            },
            EngineEvent::PageLoaded { request_id, result } => Msg::PageLoaded {
                request_id,
                result: result.map_err(|err| err.to_string()),
            },
            EngineEvent::SearchTimerElapsed { generation } => {
                Msg::SearchDebounceElapsed { generation }
            }
            EngineEvent::ReconcileElapsed => Msg::ReconcileElapsed,
        };
        self.dispatch(msg, Origin::Engine);
    }

    fn dispatch(&mut self, msg: Msg, origin: Origin) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);

        if origin == Origin::Host && self.state.consume_dirty() {
            self.render(RenderScope::Update);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchCount { request_id, params } => {
                    engine_debug!("count request {} {:?}", request_id, params);
                    self.engine.fetch_count(request_id, params);
                }
                Effect::FetchPage { request_id, params } => {
                    engine_debug!("page request {} {:?}", request_id, params);
                    self.engine.fetch_page(request_id, params);
                }
                Effect::ScheduleSearchCommit { generation, delay } => {
                    self.engine.arm_search_timer(generation, delay);
                }
                Effect::ScheduleReconcile { delay } => {
                    self.engine.schedule_reconcile(delay);
                }
                Effect::Render(scope) => self.render(scope),
            }
        }
    }

    fn render(&mut self, scope: RenderScope) {
        self.state.consume_dirty();
        let view = self.state.view();
        self.renderer
            .render(scope, &self.state.options().columns, &view);
    }
}
