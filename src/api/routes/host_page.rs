//! Demo Host Page
//!
//! - GET / - A bare page that embeds the widget the way a third-party site
//!   would. When the config names a custom trigger, the page provides an
//!   element with that id.

use axum::{extract::State, response::Html};
use chatwidget_runtime::Trigger;
use std::sync::Arc;

use crate::api::state::AppState;

/// GET /
pub async fn host_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render(&state.config.assets.entry, &state.config.widget.bot.trigger))
}

fn render(entry: &str, trigger: &Trigger) -> String {
    let trigger_element = match trigger {
        Trigger::Default => String::new(),
        Trigger::Element(id) => format!(
            r##"    <p><a href="#" id="{}">Talk to us</a></p>
"##,
            escape(id)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Chat widget demo</title>
  </head>
  <body>
    <h1>Chat widget demo</h1>
    <p>This page stands in for a host site embedding the widget.</p>
{trigger_element}    <script type="module">
      import init from "/widget/{entry}";
      init();
    </script>
  </body>
</html>
"#,
        trigger_element = trigger_element,
        entry = escape(entry),
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
