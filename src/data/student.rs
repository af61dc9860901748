use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A student record as the remote API speaks it.
///
/// Decoding never rejects a record over a field's JSON type: one odd record must not cost the whole list.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Student {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_id"
    )]
    pub id: Option<String>,
    #[serde(rename = "帳號", default, deserialize_with = "lenient_text")]
    pub account: String,
    #[serde(rename = "座號", default, deserialize_with = "lenient_seat_number")]
    pub seat_number: i64,
    #[serde(rename = "姓名", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "院系", default, deserialize_with = "lenient_text")]
    pub department: String,
    #[serde(rename = "年級", default, deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(rename = "班級", default, deserialize_with = "lenient_text")]
    pub class: String,
    #[serde(rename = "Email", default, deserialize_with = "lenient_text")]
    pub email: String,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Value::deserialize(deserializer).map(value_text)
}

/// Numbers and booleans become their text, null becomes empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|value| value_text(value).unwrap_or_default())
}

fn lenient_seat_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate_seat_number))
            .unwrap_or_default(),
        Value::String(text) => coerce_seat_number(&text),
        Value::Bool(flag) => i64::from(flag),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    SeatNumber,
    Account,
    Name,
    Department,
    Grade,
    Class,
    Email,
}

impl StudentField {
    /// Table order.
    pub const ALL: [Self; 7] = [
        Self::SeatNumber,
        Self::Account,
        Self::Name,
        Self::Department,
        Self::Grade,
        Self::Class,
        Self::Email,
    ];

    /// Form order.
    pub const FORM: [Self; 7] = [
        Self::Account,
        Self::SeatNumber,
        Self::Name,
        Self::Department,
        Self::Grade,
        Self::Class,
        Self::Email,
    ];

    pub const REQUIRED: [Self; 6] = [
        Self::Account,
        Self::Name,
        Self::Department,
        Self::Grade,
        Self::Class,
        Self::Email,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SeatNumber => "Seat Number",
            Self::Account => "Account",
            Self::Name => "Name",
            Self::Department => "Department",
            Self::Grade => "Grade",
            Self::Class => "Class",
            Self::Email => "Email",
        }
    }

    pub const fn form_name(self) -> &'static str {
        match self {
            Self::SeatNumber => "seat_number",
            Self::Account => "account",
            Self::Name => "name",
            Self::Department => "department",
            Self::Grade => "grade",
            Self::Class => "class",
            Self::Email => "email",
        }
    }

    pub const fn input_type(self) -> &'static str {
        match self {
            Self::SeatNumber => "number",
            Self::Email => "email",
            _ => "text",
        }
    }
}

/// `Number(text)` without the NaN: blank or unparsable input becomes zero.
pub fn coerce_seat_number(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .unwrap_or_else(|_| text.parse::<f64>().map_or(0, truncate_seat_number))
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_seat_number(number: f64) -> i64 {
    if number.is_finite() {
        number.trunc() as i64
    } else {
        0
    }
}

impl Student {
    pub fn field_text(&self, field: StudentField) -> Cow<'_, str> {
        match field {
            StudentField::SeatNumber => Cow::Owned(self.seat_number.to_string()),
            StudentField::Account => Cow::Borrowed(&self.account),
            StudentField::Name => Cow::Borrowed(&self.name),
            StudentField::Department => Cow::Borrowed(&self.department),
            StudentField::Grade => Cow::Borrowed(&self.grade),
            StudentField::Class => Cow::Borrowed(&self.class),
            StudentField::Email => Cow::Borrowed(&self.email),
        }
    }

    pub fn set_field(&mut self, field: StudentField, value: &str) {
        let slot = match field {
            StudentField::SeatNumber => {
                self.seat_number = coerce_seat_number(value);
                return;
            }
            StudentField::Account => &mut self.account,
            StudentField::Name => &mut self.name,
            StudentField::Department => &mut self.department,
            StudentField::Grade => &mut self.grade,
            StudentField::Class => &mut self.class,
            StudentField::Email => &mut self.email,
        };
        value.clone_into(slot);
    }

    /// Required fields left empty, in [`StudentField::REQUIRED`] order.
    pub fn missing_required_fields(&self) -> Vec<StudentField> {
        StudentField::REQUIRED
            .into_iter()
            .filter(|field| self.field_text(*field).is_empty())
            .collect()
    }

    /// The identifier, if the record has been created server-side.
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Filter values typed into the search form. Empty values match anything.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub seat_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub email: String,
}

impl SearchCriteria {
    pub fn get(&self, field: StudentField) -> &str {
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

    pub fn is_empty(&self) -> bool {
        StudentField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    /// Case-insensitive substring match on every non-empty criterion.
    pub fn matches(&self, student: &Student) -> bool {
        StudentField::ALL.into_iter().all(|field| {
            let wanted = self.get(field);
            wanted.is_empty()
                || student
                    .field_text(field)
                    .to_lowercase()
                    .contains(&wanted.to_lowercase())
        })
    }

    pub fn filter(&self, students: Vec<Student>) -> Vec<Student> {
        students
            .into_iter()
            .filter(|student| self.matches(student))
            .collect()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn bob() -> Student {
        Student {
            id: Some("s-1".into()),
            account: "a1".into(),
            seat_number: 12,
            name: "Bob".into(),
            department: "CS".into(),
            grade: "2".into(),
            class: "B".into(),
            email: "b@x.com".into(),
        }
    }

    pub fn ann() -> Student {
        Student {
            id: Some("s-2".into()),
            account: "a2".into(),
            seat_number: 3,
            name: "Ann".into(),
            department: "EE".into(),
            grade: "3".into(),
            class: "A".into(),
            email: "ann@x.com".into(),
        }
    }

    #[test]
    fn wire_names_follow_the_api() {
        let json = serde_json::to_value(bob()).unwrap();
        assert_eq!(json["_id"], "s-1");
        assert_eq!(json["帳號"], "a1");
        assert_eq!(json["座號"], 12);
        assert_eq!(json["Email"], "b@x.com");

        let new = serde_json::to_value(Student::default()).unwrap();
        assert!(new.get("_id").is_none());
    }

    #[test]
    fn partial_records_fill_defaults() {
        let student: Student = serde_json::from_str(r#"{"_id":"x","姓名":"Bob"}"#).unwrap();
        assert_eq!(student.name, "Bob");
        assert_eq!(student.seat_number, 0);
        assert!(student.account.is_empty());
    }

    #[test]
    fn null_seat_number_keeps_the_list() {
        let envelope: crate::api::Envelope<Vec<Student>> = serde_json::from_str(
            r#"{"code":200,"message":"ok","body":[
                {"_id":"s-1","帳號":"a1","座號":12,"姓名":"Bob"},
                {"_id":"s-2","帳號":"a2","座號":null,"姓名":"Ann"}
            ]}"#,
        )
        .unwrap();

        let students = envelope.body.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].seat_number, 12);
        assert_eq!(students[1].seat_number, 0);
        assert_eq!(students[1].name, "Ann");
    }

    #[test]
    fn odd_seat_numbers_coerce_like_form_input() {
        let seat = |json: &str| {
            serde_json::from_str::<Student>(&format!(r#"{{"座號":{json}}}"#))
                .unwrap()
                .seat_number
        };
        assert_eq!(seat("3.9"), 3);
        assert_eq!(seat(r#"" 7 ""#), 7);
        assert_eq!(seat(r#""twelve""#), 0);
        assert_eq!(seat("true"), 1);
        assert_eq!(seat("[1]"), 0);
    }

    #[test]
    fn numeric_account_decodes_as_text() {
        let student: Student = serde_json::from_str(
            r#"{"_id":17,"帳號":1234,"年級":2,"班級":null,"Email":false,"姓名":"Bob"}"#,
        )
        .unwrap();

        assert_eq!(student.id.as_deref(), Some("17"));
        assert_eq!(student.account, "1234");
        assert_eq!(student.grade, "2");
        assert!(student.class.is_empty());
        assert_eq!(student.email, "false");
        assert_eq!(student.name, "Bob");

        let criteria = SearchCriteria {
            account: "23".into(),
            ..SearchCriteria::default()
        };
        assert!(criteria.matches(&student));
    }

    #[test]
    fn seat_number_coercion() {
        assert_eq!(coerce_seat_number("42"), 42);
        assert_eq!(coerce_seat_number(" 7 "), 7);
        assert_eq!(coerce_seat_number(""), 0);
        assert_eq!(coerce_seat_number("abc"), 0);
        assert_eq!(coerce_seat_number("3.9"), 3);
        assert_eq!(coerce_seat_number("-2"), -2);
    }

    #[test]
    fn set_field_updates_in_place() {
        let mut student = Student::default();
        student.set_field(StudentField::Name, "Bob");
        student.set_field(StudentField::SeatNumber, "5");
        assert_eq!(student.name, "Bob");
        assert_eq!(student.seat_number, 5);
    }

    #[test]
    fn missing_fields_reported_in_order() {
        let student = Student {
            account: "a1".into(),
            department: "CS".into(),
            class: "B".into(),
            ..Student::default()
        };
        assert_eq!(
            student.missing_required_fields(),
            vec![StudentField::Name, StudentField::Grade, StudentField::Email]
        );
        assert!(bob().missing_required_fields().is_empty());
        assert_eq!(Student::default().missing_required_fields().len(), 6);
    }

    #[test]
    fn blank_identifier_is_not_existing() {
        let mut student = bob();
        assert_eq!(student.existing_id(), Some("s-1"));
        student.id = Some(String::new());
        assert_eq!(student.existing_id(), None);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let criteria = SearchCriteria {
            name: "bo".into(),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.filter(vec![bob(), ann()]), vec![bob()]);
    }

    #[test]
    fn filter_ands_across_fields() {
        let criteria = SearchCriteria {
            email: "X.COM".into(),
            class: "a".into(),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.filter(vec![bob(), ann()]), vec![ann()]);

        let criteria = SearchCriteria {
            name: "bob".into(),
            department: "EE".into(),
            ..SearchCriteria::default()
        };
        assert!(criteria.filter(vec![bob(), ann()]).is_empty());
    }

    #[test]
    fn seat_number_matches_as_text() {
        let criteria = SearchCriteria {
            seat_number: "1".into(),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.filter(vec![bob(), ann()]), vec![bob()]);
    }

    #[test]
    fn empty_criteria() {
        assert!(SearchCriteria::default().is_empty());
        assert!(SearchCriteria::default().matches(&ann()));
        assert!(
            !SearchCriteria {
                grade: "2".into(),
                ..SearchCriteria::default()
            }
            .is_empty()
        );
    }
}
