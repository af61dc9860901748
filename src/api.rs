use crate::{data::student::Student, error::RollbookResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

pub mod client;
#[cfg(test)]
pub mod fake;

pub const SUCCESS_CODE: i64 = 200;

/// The `{code, message, body}` shape every student API call answers with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub body: Option<T>,
}

impl<T> Envelope<T> {
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// The remote student endpoints.
///
/// `Err` means the call never produced an envelope (transport failure);
/// an envelope with a non-200 code is an application failure and comes back as `Ok`.
#[async_trait]
pub trait StudentApi: Debug + Send + Sync {
    async fn find_all(&self) -> RollbookResult<Envelope<Vec<Student>>>;
    async fn insert_one(&self, student: &Student) -> RollbookResult<Envelope<Value>>;
    async fn update_by_id(&self, id: &str, student: &Student) -> RollbookResult<Envelope<Value>>;
    async fn delete_by_id(&self, id: &str) -> RollbookResult<Envelope<Value>>;
}
