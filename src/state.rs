use crate::api::StudentApi;
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;

pub const APP_TITLE: &str = "Student Management System";

#[derive(Clone, Debug)]
pub struct RollbookState {
    api: Arc<dyn StudentApi>,
}

impl RollbookState {
    pub fn new(api: Arc<dyn StudentApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &dyn StudentApi {
        self.api.as_ref()
    }

    /// Wraps page content in the shared layout. `left` and `right` are the header's navigation links.
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, left: Option<Markup>, right: Option<Markup>, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { (APP_TITLE) }
                }
                body hx-boost="true" class="bg-gray-900 min-h-screen flex flex-col text-white" {
                    header class="flex flex-row items-center justify-between bg-teal-700" {
                        div class="w-40" { @if let Some(left) = left { (left) } }
                        h1 class="text-3xl font-semibold py-6" { (APP_TITLE) }
                        div class="w-40 text-right" { @if let Some(right) = right { (right) } }
                    }
                    main class="flex-1 flex flex-col items-center justify-center p-8" {
                        (markup)
                    }
                }
            }
        }
    }
}
