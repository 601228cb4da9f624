//! Index page rendering.
//!
//! The template is plain HTML read once at startup. These placeholders are
//! replaced on every render:
//!
//! | Placeholder | Content |
//! |-------------|---------|
//! | `{{ form }}` | the artist search form |
//! | `{{ artist }}` | the selected artist (escaped), or empty |
//! | `{{ error_msg }}` | an error paragraph, or empty |
//! | `{{ chart }}` | the inline SVG chart, or empty |

use std::path::Path;

use tagviz_core::chart::TAG_COUNT_CHOICES;

use crate::error::ServerError;

/// File name of the index template inside the templates directory.
pub const INDEX_TEMPLATE: &str = "index.html";

const FORM: &str = "{{ form }}";
const ARTIST: &str = "{{ artist }}";
const ERROR_MSG: &str = "{{ error_msg }}";
const CHART: &str = "{{ chart }}";

/// Values interpolated into the index page.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub artist: Option<&'a str>,
    pub max_tags: Option<usize>,
    pub error_msg: Option<&'a str>,
    /// Trusted markup, inserted verbatim.
    pub chart_svg: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    /// Read `index.html` from the templates directory.
    pub fn load(templates_dir: &Path) -> Result<Self, ServerError> {
        let path = templates_dir.join(INDEX_TEMPLATE);
        let source = std::fs::read_to_string(&path)
            .map_err(|e| ServerError::Template { path, source: e })?;
        Ok(Self::from_source(source))
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn render(&self, view: &PageView<'_>) -> String {
        let error = view
            .error_msg
            .map(|msg| format!(r#"<p class="error">{}</p>"#, escape_html(msg)))
            .unwrap_or_default();

        let form = search_form(view.artist, view.max_tags);
        let artist = view.artist.map(escape_html).unwrap_or_default();
        let values = [
            (FORM, form.as_str()),
            (ARTIST, artist.as_str()),
            (ERROR_MSG, error.as_str()),
            (CHART, view.chart_svg.as_deref().unwrap_or_default()),
        ];

        // single pass, so interpolated text is never rescanned for placeholders
        let mut out = String::with_capacity(self.source.len() + form.len());
        let mut rest = self.source.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match values.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
                Some((placeholder, value)) => {
                    out.push_str(value);
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    out.push_str("{{");
                    rest = &tail[2..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn search_form(artist: Option<&str>, max_tags: Option<usize>) -> String {
    let value = artist.map(escape_html).unwrap_or_default();
    let selected = max_tags.unwrap_or(TAG_COUNT_CHOICES[0]);

    let options: String = TAG_COUNT_CHOICES
        .iter()
        .map(|n| {
            let attr = if *n == selected { " selected" } else { "" };
            format!(r#"<option value="{n}"{attr}>{n} most used tags</option>"#)
        })
        .collect();

    format!(
        r#"<form method="post" action="/">
  <input type="text" id="artist_autocomplete" name="artist" value="{value}" required
         placeholder="Type artist name e.g. Metallica"
         oninput="this.setCustomValidity('')"
         oninvalid="this.setCustomValidity('Please select an artist from the suggested options')">
  <label for="max_tags">Maximum tags to show</label>
  <select id="max_tags" name="max_tags">{options}</select>
  <input type="submit" value="Select">
</form>"#
    )
}

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
