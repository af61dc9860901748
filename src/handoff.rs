use crate::{
    data::student::Student,
    error::{RollbookResult, TowerSessionSnafu},
    routes::function::FUNCTION_PATH,
};
use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use snafu::ResultExt;
use tower_sessions::Session;

pub const SLOT_KEY: &str = "selectedStudent";

/// The single-student slot that carries a search result over to the function page.
#[derive(Debug, Clone)]
pub struct HandoffSlot {
    session: Session,
}

impl HandoffSlot {
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Overwrites whatever the slot held.
    pub async fn put(&self, student: &Student) -> RollbookResult<()> {
        self.session
            .insert(SLOT_KEY, student)
            .await
            .context(TowerSessionSnafu)
    }

    /// Reads and clears the slot in one step. Undecodable content is dropped.
    pub async fn take(&self) -> Option<Student> {
        match self.session.remove::<Student>(SLOT_KEY).await {
            Ok(student) => student,
            Err(e) => {
                warn!(?e, "discarding unreadable hand-off slot");
                None
            }
        }
    }
}

/// Full navigation: `HX-Redirect` when htmx asked, a 303 otherwise.
pub fn navigate(headers: &HeaderMap, to: &'static str) -> Response {
    if headers.contains_key("HX-Request") {
        ([("HX-Redirect", HeaderValue::from_static(to))]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Puts `student` in the slot and sends the browser to the function page.
pub async fn hand_off(
    slot: &HandoffSlot,
    headers: &HeaderMap,
    student: &Student,
) -> RollbookResult<Response> {
    slot.put(student).await?;
    info!(id = ?student.id, "handing student off to the function page");
    Ok(navigate(headers, FUNCTION_PATH))
}
