use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::str::ParseBoolError;

pub type RollbookResult<T> = Result<T, RollbookError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollbookError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` as a boolean from {:?}", name, original))]
    ParseBool {
        source: ParseBoolError,
        name: &'static str,
        original: String,
    },
    #[snafu(display("Unable to parse URL {:?}", original))]
    ParseUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("Unable to append path segments to {}", base))]
    BuildUrl { base: url::Url },
    #[snafu(display("Error reaching the student API"))]
    Transport { source: ureq::Transport },
    #[snafu(display("Student API answered with something other than an envelope"))]
    DecodeEnvelope { source: serde_json::Error },
    #[snafu(display("Error serialising request body"))]
    EncodeBody { source: serde_json::Error },
    #[snafu(display("Error decoding selected student"))]
    DecodeStudent { source: serde_json::Error },
    #[snafu(display("Unable to join blocking task"))]
    JoinBlocking { source: tokio::task::JoinError },
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: tower_sessions::session::Error,
    },
}

impl RollbookError {
    /// Whether this failure happened while talking to the remote student API.
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::DecodeEnvelope { .. }
                | Self::EncodeBody { .. }
                | Self::BuildUrl { .. }
                | Self::JoinBlocking { .. }
        )
    }
}

impl IntoResponse for RollbookError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream api
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Rollbook Error"}
                    span {(desc)}
                }
            }
        };

        let status_code = if self.is_transport() {
            BG
        } else {
            match &self {
                Self::BadEnvVar { .. } | Self::ParseBool { .. } | Self::ParseUrl { .. } => ISE,
                Self::DecodeStudent { .. } => BI,
                Self::TowerSession { .. } => ISE,
                _ => ISE,
            }
        };

        error!(?self, "Error!");
        (status_code, basic_error(self.to_string())).into_response()
    }
}
