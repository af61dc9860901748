use crate::{
    api::{Envelope, SUCCESS_CODE, StudentApi},
    data::student::Student,
    error::{DecodeEnvelopeSnafu, RollbookResult},
};
use async_trait::async_trait;
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FindAll,
    InsertOne(Student),
    UpdateById(String, Student),
    DeleteById(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success,
    Failure { code: i64, message: String },
    Transport,
}

/// Records every call and answers with a scripted reply.
#[derive(Debug)]
pub struct FakeStudentApi {
    students: Vec<Student>,
    reply: Reply,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeStudentApi {
    pub fn new(students: Vec<Student>) -> Self {
        Self::replying(students, Reply::Success)
    }

    pub fn replying(students: Vec<Student>, reply: Reply) -> Self {
        Self {
            students,
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::replying(
            Vec::new(),
            Reply::Failure {
                code: 500,
                message: message.to_string(),
            },
        )
    }

    pub fn unreachable() -> Self {
        Self::replying(Vec::new(), Reply::Transport)
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T>(&self, call: ApiCall, body: Option<T>) -> RollbookResult<Envelope<T>> {
        self.calls.lock().unwrap().push(call);

        match &self.reply {
            Reply::Success => Ok(Envelope {
                code: SUCCESS_CODE,
                message: "ok".into(),
                body,
            }),
            Reply::Failure { code, message } => Ok(Envelope {
                code: *code,
                message: message.clone(),
                body: None,
            }),
            Reply::Transport => serde_json::from_str::<Envelope<Value>>("<html>")
                .context(DecodeEnvelopeSnafu)
                .map(|_| unreachable!("`<html>` is never json")),
        }
    }
}

#[async_trait]
impl StudentApi for FakeStudentApi {
    async fn find_all(&self) -> RollbookResult<Envelope<Vec<Student>>> {
        self.answer(ApiCall::FindAll, Some(self.students.clone()))
    }

    async fn insert_one(&self, student: &Student) -> RollbookResult<Envelope<Value>> {
        self.answer(ApiCall::InsertOne(student.clone()), None)
    }

    async fn update_by_id(&self, id: &str, student: &Student) -> RollbookResult<Envelope<Value>> {
        self.answer(ApiCall::UpdateById(id.to_string(), student.clone()), None)
    }

    async fn delete_by_id(&self, id: &str) -> RollbookResult<Envelope<Value>> {
        self.answer(ApiCall::DeleteById(id.to_string()), None)
    }
}
