use maud::{Markup, Render, html};

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn render_nav() -> Markup {
    html! {
        nav class="w-full bg-gray-800 shadow-md mb-6" {
            div class="max-w-5xl mx-auto px-4 py-3 flex flex-row items-center justify-between" {
                a href="/" class="text-xl font-bold" {"Student Records"}
                a href="/students/create" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {"Add Student"}
            }
        }
    }
}

pub fn render_table<const N: usize>(titles: [&'static str; N], rows: Vec<[Markup; N]>) -> Markup {
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
                    @for row in rows {
                        tr {
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

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2 text-gray-200" {(s)}
    }
}

pub fn card(heading: Markup, body: Markup) -> Markup {
    html! {
        div class="bg-gray-800 rounded shadow-md w-full" {
            div class="flex flex-row items-center justify-between border-b border-gray-600 p-4" {
                (heading)
            }
            div class="p-4" {
                (body)
            }
        }
    }
}

pub fn alert_danger(message: impl Render) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            (message)
        }
    }
}

pub fn alert_warning(message: impl Render) -> Markup {
    html! {
        div class="bg-yellow-100 border border-yellow-400 text-yellow-800 px-4 py-3 rounded relative mb-4" role="alert" {
            (message)
        }
    }
}

pub fn spinner() -> Markup {
    html! {
        div class="flex justify-center mt-5" role="status" {
            div class="h-8 w-8 animate-spin rounded-full border-4 border-gray-500 border-t-white" {}
        }
    }
}

/// Green for "active", grey for every other status.
pub fn status_badge(status: Option<&str>, active: bool) -> Markup {
    let colour = if active { "bg-green-600" } else { "bg-gray-600" };
    html! {
        span class={"px-2 py-1 rounded text-sm " (colour)} {(status.unwrap_or("-"))}
    }
}

pub fn form_element(id: &'static str, label: &'static str, error: Option<&str>, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
            @if let Some(error) = error {
                p class="text-red-400 text-sm mt-1" {(error)}
            }
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    ty: Option<&'static str>,
    required: bool,
    value: &str,
    error: Option<&str>,
) -> Markup {
    form_element(id, label, error, html! {
        input type=(ty.unwrap_or("text")) id=(id) name=(id) required[required] value=(value) class=(INPUT_CLASSES) {}
    })
}

pub fn select_form_element(
    id: &'static str,
    label: &'static str,
    options: &[(&'static str, &'static str)],
    selected: &str,
    error: Option<&str>,
) -> Markup {
    form_element(id, label, error, html! {
        select id=(id) name=(id) class=(INPUT_CLASSES) {
            @if options.iter().all(|(value, _)| *value != selected) {
                option value=(selected) selected {(selected)}
            }
            @for (value, text) in options {
                option value=(value) selected[*value == selected] {(text)}
            }
        }
    })
}

pub fn form_submit_button(idle: &'static str, busy: &'static str) -> Markup {
    html! {
        button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
            span class="idle-label" {(idle)}
            span class="busy-label" {(busy)}
        }
    }
}
