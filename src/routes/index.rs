use crate::{
    routes::{function::FUNCTION_PATH, search::SEARCH_PATH},
    state::RollbookState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RollbookState>) -> Markup {
    state.render(None, None, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            div class="flex flex-row space-x-8 justify-center" {
                a href=(FUNCTION_PATH) class="bg-teal-600 hover:bg-teal-800 font-bold rounded-full w-32 h-32 flex items-center justify-center text-xl" {
                    "Edit"
                }
                a href=(SEARCH_PATH) class="bg-teal-600 hover:bg-teal-800 font-bold rounded-full w-32 h-32 flex items-center justify-center text-xl" {
                    "Search"
                }
            }
        }
    })
}
