use crate::{
    api::StudentApi,
    data::student::{Student, StudentField},
    handoff::HandoffSlot,
    maud_conveniences::{Notice, form_submit_button, nav_link, simple_form_element, title},
    routes::search::SEARCH_PATH,
    state::RollbookState,
};
use axum::{Form, extract::State};
use maud::{Markup, html};
use serde::Deserialize;
use tower_sessions::Session;

pub const FUNCTION_PATH: &str = "/function";

/// The create/update/delete form: one student plus whether it already exists server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionPage {
    pub form: Student,
    pub existing: bool,
}

impl FunctionPage {
    pub fn from_handoff(handed_off: Option<Student>) -> Self {
        handed_off.map_or_else(Self::default, |form| Self {
            form,
            existing: true,
        })
    }

    pub fn edit_field(&mut self, field: StudentField, value: &str) {
        self.form.set_field(field, value);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    /// The identifier to update/delete, if the form holds an existing record.
    fn target_id(&self) -> Option<String> {
        if self.existing {
            self.form.existing_id().map(ToString::to_string)
        } else {
            None
        }
    }

    pub async fn create(&mut self, api: &dyn StudentApi) -> Notice {
        let missing = self.form.missing_required_fields();
        if !missing.is_empty() {
            let names: Vec<_> = missing.into_iter().map(StudentField::label).collect();
            return Notice::failure(format!(
                "Please fill in the following fields: {}",
                names.join(", ")
            ));
        }

        match api.insert_one(&self.form).await {
            Ok(envelope) if envelope.is_success() => {
                info!(account = %self.form.account, "student added");
                self.reset();
                Notice::success("Student added")
            }
            Ok(envelope) => Notice::failure(format!("Failed to add student: {}", envelope.message)),
            Err(e) => {
                error!(?e, "Error adding student");
                Notice::failure("Failed to add student")
            }
        }
    }

    pub async fn update(&mut self, api: &dyn StudentApi) -> Notice {
        let Some(id) = self.target_id() else {
            return Notice::failure("Please select a student to update first");
        };

        match api.update_by_id(&id, &self.form).await {
            Ok(envelope) if envelope.is_success() => {
                info!(%id, "student updated");
                Notice::success("Student updated")
            }
            Ok(envelope) => Notice::failure(format!(
                "Failed to update student: {}",
                envelope.message
            )),
            Err(e) => {
                error!(?e, %id, "Error updating student");
                Notice::failure("Failed to update student")
            }
        }
    }

    pub async fn delete(&mut self, api: &dyn StudentApi) -> Notice {
        let Some(id) = self.target_id() else {
            return Notice::failure("Please select a student to delete first");
        };

        match api.delete_by_id(&id).await {
            Ok(envelope) if envelope.is_success() => {
                info!(%id, "student deleted");
                self.reset();
                Notice::success("Student deleted")
            }
            Ok(envelope) => Notice::failure(format!(
                "Failed to delete student: {}",
                envelope.message
            )),
            Err(e) => {
                error!(?e, %id, "Error deleting student");
                Notice::failure("Failed to delete student")
            }
        }
    }

    pub fn render(&self, notice: Option<&Notice>) -> Markup {
        html! {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
                @if self.existing {
                    (title("Edit Student"))
                } @else {
                    (title("New Student"))
                }

                @if let Some(notice) = notice {
                    (notice)
                }

                form method="post" action=(FUNCTION_PATH) {
                    @if let Some(id) = &self.form.id {
                        input type="hidden" name="id" value=(id);
                    }
                    input type="hidden" name="existing" value=(self.existing.to_string());

                    @for field in StudentField::FORM {
                        (simple_form_element(
                            field.form_name(),
                            field.label(),
                            false,
                            Some(field.input_type()),
                            Some(self.form.field_text(field).as_ref()),
                        ))
                    }

                    div class="flex flex-row space-x-4 justify-center" {
                        (form_submit_button("action", "create", "+", true))
                        (form_submit_button("action", "delete", "-", self.existing))
                        (form_submit_button("action", "update", "Update", self.existing))
                    }
                }
            }
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FunctionAction {
    Create,
    Update,
    Delete,
}

#[derive(Deserialize, Debug)]
pub struct FunctionForm {
    action: FunctionAction,
    #[serde(default)]
    existing: bool,
    #[serde(default)]
    id: Option<String>,
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

impl FunctionForm {
    fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::SeatNumber => &self.seat_number,
            StudentField::Account => &self.account,
            StudentField::Name => &self.name,
            StudentField::Department => &self.department,
            StudentField::Grade => &self.grade,
            StudentField::Class => &self.class,
            StudentField::Email => &self.email,
        }
    }

    /// Rebuilds the page state the browser submitted.
    pub fn into_page(self) -> (FunctionAction, FunctionPage) {
        let mut page = FunctionPage {
            form: Student {
                id: self.id.clone().filter(|id| !id.is_empty()),
                ..Student::default()
            },
            existing: self.existing,
        };
        for field in StudentField::FORM {
            page.edit_field(field, self.value(field));
        }
        (self.action, page)
    }
}

fn nav() -> (Markup, Markup) {
    (nav_link("/", "Home"), nav_link(SEARCH_PATH, "Search"))
}

pub async fn get_function(State(state): State<RollbookState>, session: Session) -> Markup {
    let page = FunctionPage::from_handoff(HandoffSlot::new(session).take().await);
    let (left, right) = nav();
    state.render(Some(left), Some(right), page.render(None))
}

pub async fn post_function(
    State(state): State<RollbookState>,
    Form(form): Form<FunctionForm>,
) -> Markup {
    let (action, mut page) = form.into_page();
    let notice = match action {
        FunctionAction::Create => page.create(state.api()).await,
        FunctionAction::Update => page.update(state.api()).await,
        FunctionAction::Delete => page.delete(state.api()).await,
    };
    debug!(?action, success = notice.is_success(), "function page action");

    let (left, right) = nav();
    state.render(Some(left), Some(right), page.render(Some(&notice)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::fake::{ApiCall, FakeStudentApi},
        data::student::tests::bob,
    };

    fn new_bob() -> Student {
        Student { id: None, seat_number: 0, ..bob() }
    }

    #[test]
    fn handoff_marks_existing() {
        let page = FunctionPage::from_handoff(Some(bob()));
        assert!(page.existing);
        assert_eq!(page.form, bob());

        assert_eq!(FunctionPage::from_handoff(None), FunctionPage::default());
    }

    #[tokio::test]
    async fn create_sends_form_and_resets() {
        let api = FakeStudentApi::new(vec![]);
        let mut page = FunctionPage::default();
        for (field, value) in [
            (StudentField::Account, "a1"),
            (StudentField::Name, "Bob"),
            (StudentField::Department, "CS"),
            (StudentField::Grade, "2"),
            (StudentField::Class, "B"),
            (StudentField::Email, "b@x.com"),
        ] {
            page.edit_field(field, value);
        }

        let notice = page.create(&api).await;

        assert!(notice.is_success());
        assert_eq!(api.calls(), vec![ApiCall::InsertOne(new_bob())]);
        assert_eq!(page, FunctionPage::default());
    }

    #[tokio::test]
    async fn create_reports_exactly_the_missing_fields() {
        let api = FakeStudentApi::new(vec![]);
        let mut page = FunctionPage::default();
        page.edit_field(StudentField::Account, "a1");
        page.edit_field(StudentField::Grade, "2");
        page.edit_field(StudentField::SeatNumber, "4");

        let notice = page.create(&api).await;

        assert!(!notice.is_success());
        assert_eq!(
            notice.message,
            "Please fill in the following fields: Name, Department, Class, Email"
        );
        assert!(api.calls().is_empty());
        assert_eq!(page.form.account, "a1");
    }

    #[tokio::test]
    async fn create_failure_keeps_the_form() {
        let api = FakeStudentApi::failing("duplicate account");
        let mut page = FunctionPage::from_handoff(Some(new_bob()));
        page.existing = false;

        let notice = page.create(&api).await;
        assert_eq!(notice.message, "Failed to add student: duplicate account");
        assert_eq!(page.form, new_bob());

        let api = FakeStudentApi::unreachable();
        let notice = page.create(&api).await;
        assert_eq!(notice.message, "Failed to add student");
        assert_eq!(page.form, new_bob());
    }

    #[tokio::test]
    async fn update_requires_an_existing_student() {
        let api = FakeStudentApi::new(vec![]);
        let mut page = FunctionPage {
            form: bob(),
            existing: false,
        };

        let notice = page.update(&api).await;
        assert!(notice.message.contains("select a student"));

        let mut page = FunctionPage {
            form: new_bob(),
            existing: true,
        };
        let notice = page.delete(&api).await;
        assert!(notice.message.contains("select a student"));

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_values() {
        let api = FakeStudentApi::new(vec![]);
        let mut page = FunctionPage::from_handoff(Some(bob()));
        page.edit_field(StudentField::Name, "Robert");

        let notice = page.update(&api).await;

        assert!(notice.is_success());
        let expected = Student {
            name: "Robert".into(),
            ..bob()
        };
        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateById("s-1".into(), expected.clone())]
        );
        assert_eq!(page.form, expected);
        assert!(page.existing);
    }

    #[tokio::test]
    async fn update_failure_reports_server_message() {
        let api = FakeStudentApi::failing("stale record");
        let mut page = FunctionPage::from_handoff(Some(bob()));

        let notice = page.update(&api).await;
        assert_eq!(notice.message, "Failed to update student: stale record");
        assert!(page.existing);
    }

    #[tokio::test]
    async fn delete_resets_on_success_only() {
        let api = FakeStudentApi::unreachable();
        let mut page = FunctionPage::from_handoff(Some(bob()));
        let notice = page.delete(&api).await;
        assert_eq!(notice.message, "Failed to delete student");
        assert_eq!(page.form, bob());

        let api = FakeStudentApi::new(vec![]);
        let notice = page.delete(&api).await;
        assert!(notice.is_success());
        assert_eq!(api.calls(), vec![ApiCall::DeleteById("s-1".into())]);
        assert_eq!(page, FunctionPage::default());
    }

    #[test]
    fn form_rebuilds_page_state() {
        let form: FunctionForm = parse_form(
            "action=update&existing=true&id=s-1&account=a1&seat_number=12&name=Bob&department=CS&grade=2&class=B&email=b%40x.com",
        );
        let (action, page) = form.into_page();

        assert_eq!(action, FunctionAction::Update);
        assert!(page.existing);
        assert_eq!(page.form, bob());
    }

    #[test]
    fn blank_id_is_dropped() {
        let form: FunctionForm =
            parse_form("action=create&existing=false&id=&seat_number=");
        let (_, page) = form.into_page();
        assert_eq!(page, FunctionPage::default());
    }

    #[test]
    fn render_disables_mutations_for_new_records() {
        let rendered = FunctionPage::default().render(None).into_string();
        assert!(rendered.contains(r#"value="delete" disabled"#));
        assert!(rendered.contains(r#"value="update" disabled"#));
        assert!(!rendered.contains(r#"name="id""#));

        let rendered = FunctionPage::from_handoff(Some(bob())).render(None).into_string();
        assert!(!rendered.contains(r#"value="update" disabled"#));
        assert!(rendered.contains(r#"name="id" value="s-1""#));
        assert!(rendered.contains(r#"value="Bob""#));
    }

    fn parse_form(body: &str) -> FunctionForm {
        use axum::{body::Body, extract::FromRequest, http::Request};

        let request = Request::post(FUNCTION_PATH)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime
            .block_on(Form::<FunctionForm>::from_request(request, &()))
            .unwrap()
            .0
    }
}
