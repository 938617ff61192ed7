use engine_logging::{engine_debug, engine_error, engine_warn};

use crate::pagination::is_selectable;
use crate::{Effect, GridState, Msg, RenderScope};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: GridState, msg: Msg) -> (GridState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            if state.is_mounted() {
                return (state, Vec::new());
            }
            state.set_mounted();
            let mut effects = vec![Effect::Render(RenderScope::Full)];
            if state.is_async() {
                effects.extend(begin_full_refresh(&mut state));
            }
            effects
        }
        Msg::SearchChanged(value) => {
            if !state.options().enable_search {
                engine_debug!("search input ignored: search disabled");
                return (state, Vec::new());
            }
            let generation = state.arm_search(value);
            vec![Effect::ScheduleSearchCommit {
                generation,
                delay: state.config().search_debounce(),
            }]
        }
        Msg::SearchDebounceElapsed { generation } => {
            if generation != state.search_generation() {
                engine_debug!("stale search timer {} ignored", generation);
                return (state, Vec::new());
            }
            if !state.commit_search() {
                return (state, Vec::new());
            }
            state.set_current_page(1);
            state.mark_dirty();
            let mut effects = Vec::new();
            if state.is_async() && state.is_mounted() {
                effects.extend(begin_full_refresh(&mut state));
            }
            effects.extend(request_reconcile(&mut state));
            effects
        }
        Msg::ColumnHeaderClicked(field) => {
            if !state.options().is_sortable(&field) {
                return (state, Vec::new());
            }
            let reverse = state.predicate() == Some(field.as_str()) && !state.reverse();
            state.set_sort(field, reverse);
            state.set_current_page(1);
            state.mark_dirty();
            current_page_change(&mut state)
        }
        Msg::PageSelected(page) => {
            if !is_selectable(page, state.current_page(), state.total_pages()) {
                return (state, Vec::new());
            }
            state.set_current_page(page);
            state.mark_dirty();
            current_page_change(&mut state)
        }
        Msg::DisplayLimitChanged(limit) => {
            let limit = if limit == 0 {
                state.config().default_page_limit()
            } else {
                limit
            };
            if limit == state.display_limit() {
                return (state, Vec::new());
            }
            state.set_display_limit(limit);
            state.data_mut().loading_full = false;
            state.mark_dirty();
            if !state.is_async() {
                clamp_local_page(&mut state);
                Vec::new()
            } else if state.is_mounted() {
                begin_full_refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::RowsReplaced(rows) => {
            if !state.set_local_rows(rows) {
                engine_warn!("rows replaced on an async grid; ignored");
                return (state, Vec::new());
            }
            state.mark_dirty();
            clamp_local_page(&mut state);
            Vec::new()
        }
        Msg::RefreshRequested => {
            state.mark_dirty();
            if state.is_async() && state.is_mounted() {
                begin_full_refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::RecompileRequested { force } => {
            let scope = if force {
                RenderScope::Full
            } else {
                RenderScope::Body
            };
            vec![Effect::Render(scope)]
        }
        Msg::CountLoaded { request_id, result } => {
            if !state.is_latest_count(request_id) {
                engine_debug!("stale count response {} discarded", request_id);
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(total) => {
                    state.data_mut().total = total;
                    let mut effects = request_reconcile(&mut state);
                    effects.push(issue_page_fetch(&mut state));
                    effects
                }
                Err(err) => {
                    engine_error!("count request {} failed: {}", request_id, err);
                    finish_loading(&mut state);
                    request_reconcile(&mut state)
                }
            }
        }
        Msg::PageLoaded { request_id, result } => {
            if !state.is_latest_page(request_id) {
                engine_debug!("stale page response {} discarded", request_id);
                return (state, Vec::new());
            }
            match result {
                Ok(rows) => state.data_mut().rows = rows,
                Err(err) => engine_error!("page request {} failed: {}", request_id, err),
            }
            finish_loading(&mut state);
            state.mark_dirty();
            request_reconcile(&mut state)
        }
        Msg::ReconcileElapsed => {
            state.set_reconcile_pending(false);
            vec![Effect::Render(RenderScope::Update)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Count first, rows once the count is known.
fn begin_full_refresh(state: &mut GridState) -> Vec<Effect> {
    state.set_current_page(1);
    let data = state.data_mut();
    data.loading = true;
    data.loading_full = true;
    let request_id = state.issue_count_request();
    state.mark_dirty();
    engine_debug!("full refresh, count request {}", request_id);
    vec![Effect::FetchCount {
        request_id,
        params: state.request_params(),
    }]
}

/// Page-only refresh; the local pipeline needs nothing beyond the new offset.
fn current_page_change(state: &mut GridState) -> Vec<Effect> {
    if !(state.is_async() && state.is_mounted()) {
        return Vec::new();
    }
    state.data_mut().loading_full = false;
    vec![issue_page_fetch(state)]
}

fn issue_page_fetch(state: &mut GridState) -> Effect {
    let request_id = state.issue_page_request();
    state.data_mut().loading = true;
    Effect::FetchPage {
        request_id,
        params: state.request_params(),
    }
}

fn finish_loading(state: &mut GridState) {
    let data = state.data_mut();
    data.loading = false;
    data.loading_full = false;
    data.first_loaded = true;
}

fn request_reconcile(state: &mut GridState) -> Vec<Effect> {
    if state.reconcile_pending() {
        engine_debug!("reconcile already pending; coalesced");
        return Vec::new();
    }
    state.set_reconcile_pending(true);
    vec![Effect::ScheduleReconcile {
        delay: state.config().reconcile_delay(),
    }]
}

fn clamp_local_page(state: &mut GridState) {
    let total_pages = state.total_pages();
    if state.current_page() > total_pages {
        state.set_current_page(total_pages);
    }
}
