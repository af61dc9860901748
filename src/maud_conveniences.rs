use maud::{Markup, Render, html};

/// A table whose rows each `hx-post` their own `hx-vals` to `row_target` when clicked.
pub fn render_clickable_table<const N: usize>(
    titles: [&'static str; N],
    row_target: &'static str,
    items: Vec<(String, [Markup; N])>,
) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @for (row_vals, row) in items {
                        tr hx-post=(row_target) hx-vals=(row_vals) class="cursor-pointer hover:bg-gray-700" {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input type=(input_type.unwrap_or("text")) id=(id) name=(id) required[required] value=[value] class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
        },
    )
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
        }
    }
}

pub fn form_submit_button(name: &'static str, value: &'static str, text: &'static str, enabled: bool) -> Markup {
    html! {
        button type="submit" name=(name) value=(value) disabled[!enabled] class="bg-teal-500 hover:bg-teal-700 disabled:opacity-50 disabled:cursor-not-allowed text-black font-bold py-2 px-6 rounded-full focus:outline-none focus:shadow-outline" {
            (text)
        }
    }
}

pub fn nav_link(href: &'static str, text: &'static str) -> Markup {
    html! {
        a href=(href) class="bg-teal-800 hover:bg-teal-900 font-bold py-4 px-6" {(text)}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// What the user is told after an action, shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

impl Render for Notice {
    fn render(&self) -> Markup {
        let (classes, heading) = match self.kind {
            NoticeKind::Success => (
                "bg-green-100 border border-green-400 text-green-700",
                "Done!",
            ),
            NoticeKind::Failure => ("bg-red-100 border border-red-400 text-red-700", "Alert!"),
        };

        html! {
            div role="alert" class={(classes) " px-4 py-3 rounded relative mb-4"} {
                strong class="font-bold" {(heading)}
                " "
                span class="block sm:inline" {(self.message)}
            }
        }
    }
}
