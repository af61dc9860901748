use crate::{
    routes::{
        function::{FUNCTION_PATH, get_function, post_function},
        index::get_index_route,
        search::{SEARCH_PATH, SELECT_PATH, get_search, post_search, post_select},
    },
    session_store::MemorySessionStore,
    state::RollbookState,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer, cookie::time::Duration};

pub mod function;
pub mod index;
pub mod search;

pub fn router(
    state: RollbookState,
    session_store: MemorySessionStore,
    secure_cookies: bool,
) -> Router {
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(1)));

    Router::new()
        .route("/", get(get_index_route))
        .route(FUNCTION_PATH, get(get_function).post(post_function))
        .route(SEARCH_PATH, get(get_search).post(post_search))
        .route(SELECT_PATH, post(post_select))
        .layer(session_layer)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
