use crate::{
    api::StudentApi,
    data::student::{SearchCriteria, Student, StudentField},
    error::{DecodeStudentSnafu, RollbookResult},
    handoff::{HandoffSlot, hand_off},
    maud_conveniences::{
        Notice, form_submit_button, nav_link, render_clickable_table, simple_form_element, title,
    },
    routes::function::FUNCTION_PATH,
    state::RollbookState,
};
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tower_sessions::Session;

pub const SEARCH_PATH: &str = "/search";
pub const SELECT_PATH: &str = "/search/select";
/// Elements htmx flags with `htmx-request` while a search form submission is in flight.
const IN_FLIGHT_TARGETS: &str = "#loading, #results";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub criteria: SearchCriteria,
    pub results: Vec<Student>,
    pub error: Option<String>,
    pub list_visible: bool,
}

/// What a filtered search asks the browser to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Show(Option<Notice>),
    Select(Student),
}

impl SearchPage {
    /// Fetches every student, or hides the list if it is already showing.
    pub async fn toggle_all(&mut self, api: &dyn StudentApi) {
        if self.list_visible {
            self.list_visible = false;
            self.results.clear();
            return;
        }

        if let Some(students) = self.fetch(api).await {
            self.results = students;
            self.list_visible = true;
        }
    }

    /// Fetches every student and keeps those matching the criteria. A unique match is selected outright.
    pub async fn search(&mut self, api: &dyn StudentApi) -> SearchOutcome {
        if self.criteria.is_empty() {
            return SearchOutcome::Show(Some(Notice::failure(
                "Please enter at least one search criterion",
            )));
        }

        let Some(students) = self.fetch(api).await else {
            return SearchOutcome::Show(None);
        };

        let mut matched = self.criteria.filter(students);
        debug!(matched = matched.len(), "filtered students");
        self.list_visible = true;

        if matched.len() == 1 {
            if let Some(only) = matched.pop() {
                return SearchOutcome::Select(only);
            }
        }

        self.results = matched;
        SearchOutcome::Show(None)
    }

    async fn fetch(&mut self, api: &dyn StudentApi) -> Option<Vec<Student>> {
        self.error = None;

        let fetched = match api.find_all().await {
            Ok(envelope) if envelope.is_success() => match envelope.body {
                Some(students) => Some(students),
                None => {
                    self.error = Some(unable_to_fetch(&envelope.message));
                    None
                }
            },
            Ok(envelope) => {
                self.error = Some(unable_to_fetch(&envelope.message));
                None
            }
            Err(e) => {
                error!(?e, "Error fetching students");
                self.error = Some(format!("An error occurred: {e}"));
                None
            }
        };

        if fetched.is_none() {
            self.list_visible = false;
            self.results.clear();
        }
        fetched
    }

    /// Loading is the browser's in-flight state: while a submission runs, htmx marks `#results` with
    /// `htmx-request`, which hides it and reveals `#loading` in its place.
    fn render_results(&self) -> Markup {
        html! {
            @if let Some(error) = &self.error {
                div role="alert" class="text-red-400 text-center py-4" {(error)}
            } @else if self.list_visible {
                @if self.results.is_empty() {
                    div class="text-gray-400 text-center py-4" {"No students match"}
                } @else {
                    (render_clickable_table(
                        StudentField::ALL.map(StudentField::label),
                        SELECT_PATH,
                        self.results.iter().map(student_row).collect(),
                    ))
                }
            }
        }
    }

    pub fn render(&self, notice: Option<&Notice>) -> Markup {
        html! {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
                (title("Search Students"))

                @if let Some(notice) = notice {
                    (notice)
                }

                form method="post" action=(SEARCH_PATH) hx-indicator=(IN_FLIGHT_TARGETS) {
                    input type="hidden" name="list_visible" value=(self.list_visible.to_string());

                    div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                        @for field in StudentField::FORM {
                            (simple_form_element(
                                field.form_name(),
                                field.label(),
                                false,
                                Some("text"),
                                Some(self.criteria.get(field)),
                            ))
                        }
                    }

                    div class="flex flex-row space-x-4 justify-center" {
                        (form_submit_button("action", "all", "ALL", true))
                        (form_submit_button("action", "search", "Search", true))
                    }
                }

                div id="loading" class="htmx-indicator text-center py-4" {"Loading..."}
                div id="results" class="[&.htmx-request]:hidden" {
                    (self.render_results())
                }
            }
        }
    }
}

fn student_row(student: &Student) -> (String, [Markup; 7]) {
    let cells = StudentField::ALL.map(|field| html! { (student.field_text(field).as_ref()) });
    (select_vals(student), cells)
}

fn unable_to_fetch(message: &str) -> String {
    if message.is_empty() {
        "Unable to fetch student records".to_string()
    } else {
        message.to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectForm {
    /// The selected student as JSON.
    student: String,
}

fn select_vals(student: &Student) -> String {
    serde_json::to_string(&SelectForm {
        student: serde_json::to_string(student).unwrap_or_default(),
    })
    .unwrap_or_default()
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchAction {
    All,
    Search,
}

#[derive(Deserialize, Debug)]
pub struct SearchForm {
    action: SearchAction,
    #[serde(default)]
    list_visible: bool,
    #[serde(default)]
    account: String,
    #[serde(default)]
    seat_number: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    grade: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    email: String,
}

impl SearchForm {
    pub fn into_page(self) -> (SearchAction, SearchPage) {
        let page = SearchPage {
            criteria: SearchCriteria {
                account: self.account,
                seat_number: self.seat_number,
                name: self.name,
                department: self.department,
                grade: self.grade,
                class: self.class,
                email: self.email,
            },
            list_visible: self.list_visible,
            ..SearchPage::default()
        };
        (self.action, page)
    }
}

fn nav() -> (Markup, Markup) {
    (nav_link("/", "Home"), nav_link(FUNCTION_PATH, "Edit"))
}

pub async fn get_search(State(state): State<RollbookState>) -> Markup {
    let (left, right) = nav();
    state.render(Some(left), Some(right), SearchPage::default().render(None))
}

pub async fn post_search(
    State(state): State<RollbookState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> RollbookResult<Response> {
    let (action, mut page) = form.into_page();

    let notice = match action {
        SearchAction::All => {
            page.toggle_all(state.api()).await;
            None
        }
        SearchAction::Search => match page.search(state.api()).await {
            SearchOutcome::Select(student) => {
                return hand_off(&HandoffSlot::new(session), &headers, &student).await;
            }
            SearchOutcome::Show(notice) => notice,
        },
    };

    let (left, right) = nav();
    Ok(state
        .render(Some(left), Some(right), page.render(notice.as_ref()))
        .into_response())
}

pub async fn post_select(
    session: Session,
    headers: HeaderMap,
    Form(SelectForm { student }): Form<SelectForm>,
) -> RollbookResult<Response> {
    let student: Student = serde_json::from_str(&student).context(DecodeStudentSnafu)?;
    hand_off(&HandoffSlot::new(session), &headers, &student).await
}
