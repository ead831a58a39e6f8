// Shots widget.
// Widget options with input sanitation, and the HTML fragment listing a user's shots.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::CacheStore;
use crate::dribbble::{DribbbleClient, Shot, Transport};
use crate::error::Result;

/// Shown in place of the shots when they could not be fetched.
pub const FALLBACK_MESSAGE: &str = "Womp. Could not connect to Dribbble.";

/// Largest shot count offered to the widget owner.
pub const MAX_WIDGET_SHOTS: u32 = 12;

/// Options of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    pub title: String,
    pub desc: String,
    pub shots: u32,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            title: "Dribbble".to_string(),
            desc: "Use our Dribbble widget to display your shots.".to_string(),
            shots: 4,
        }
    }
}

/// Raw option values as submitted by the widget owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetForm {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub shots: Option<String>,
}

impl WidgetOptions {
    /// Apply submitted values, stripping markup from the text fields.
    ///
    /// Missing fields and an unparsable shot count keep their current values;
    /// the shot count is clamped to the choices offered (1 to 12).
    pub fn update(&mut self, form: &WidgetForm) {
        if let Some(title) = &form.title {
            self.title = strip_tags(title);
        }
        if let Some(desc) = &form.desc {
            self.desc = strip_tags(desc);
        }
        if let Some(shots) = &form.shots {
            match shots.trim().parse() {
                Ok(count) => self.shots = u32::clamp(count, 1, MAX_WIDGET_SHOTS),
                Err(_) => warn!("Ignoring shot count {shots:?}"),
            }
        }
    }
}

/// Remove anything between `<` and `>`.
pub fn strip_tags(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => output.push(c),
            _ => {}
        }
    }

    output
}

/// Escape text for use inside HTML content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

fn render_shot(output: &mut String, shot: &Shot) {
    let dimension = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();

    let _ = write!(
        output,
        "<div class=\"bean-shot\"><a href=\"{}\" target=\"blank\"><img height=\"{}\" width=\"{}\" src=\"{}\" alt=\"\" /></a></div>",
        escape_html(shot.html_url().unwrap_or_default()),
        dimension(shot.height()),
        dimension(shot.width()),
        escape_html(shot.image_url().unwrap_or_default()),
    );
}

/// Render the widget markup for the outcome of a shots request.
pub fn render(options: &WidgetOptions, shots: &Result<Vec<Shot>>) -> String {
    let mut output = String::new();

    if !options.title.is_empty() {
        let _ = write!(output, "<h3 class=\"widget-title\">{}</h3>", escape_html(&options.title));
    }
    if !options.desc.is_empty() {
        let _ = write!(output, "<p>{}</p>", escape_html(&options.desc));
    }

    output.push_str("<div class=\"bean-dribbble-shots\">");
    match shots {
        Ok(shots) => {
            for shot in shots {
                render_shot(&mut output, shot);
            }
        }
        Err(e) => {
            warn!("Rendering widget fallback: {e}");
            output.push_str(FALLBACK_MESSAGE);
        }
    }
    output.push_str("</div>");

    output
}

/// Fetch `account`'s shots and render them.
///
/// Every failure, including a missing account name or token, renders the
/// fallback message.
pub async fn render_feed<S: CacheStore, T: Transport>(
    client: &DribbbleClient<S, T>,
    account: &str,
    token: &str,
    options: &WidgetOptions,
) -> String {
    let shots = client.retrieve_shots(account, token, options.shots).await;
    render(options, &shots)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::ClientConfig;
    use crate::dribbble::RequestOutcome;
    use crate::dribbble::testing::FakeTransport;
    use crate::error::DribbbleError;

    fn client(outcome: RequestOutcome) -> DribbbleClient<MemoryCache, FakeTransport> {
        DribbbleClient::with_transport(
            ClientConfig::default(),
            MemoryCache::new(),
            FakeTransport::always(outcome),
        )
    }

    fn shot(id: u64) -> Shot {
        serde_json::from_value(json!({
            "id": id,
            "html_url": format!("https://dribbble.com/shots/{id}"),
            "width": 400,
            "height": 300,
            "images": {"normal": format!("https://cdn.example/{id}.png")}
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = WidgetOptions::default();
        assert_eq!(options.title, "Dribbble");
        assert_eq!(options.shots, 4);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("plain"), "plain");
        assert_eq!(strip_tags("<b>bold</b> text"), "bold text");
        assert_eq!(strip_tags("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(strip_tags("a > b"), "a > b");
    }

    #[test]
    fn test_update_sanitizes_fields() {
        let mut options = WidgetOptions::default();
        options.update(&WidgetForm {
            title: Some("<em>My</em> Shots".to_string()),
            desc: Some("Latest <a href=\"x\">work</a>".to_string()),
            shots: Some(" 8 ".to_string()),
        });

        assert_eq!(options.title, "My Shots");
        assert_eq!(options.desc, "Latest work");
        assert_eq!(options.shots, 8);
    }

    #[test]
    fn test_update_keeps_values_for_missing_or_bad_input() {
        let mut options = WidgetOptions::default();
        options.update(&WidgetForm {
            title: None,
            desc: None,
            shots: Some("many".to_string()),
        });

        assert_eq!(options, WidgetOptions::default());
    }

    #[test]
    fn test_update_clamps_shot_count() {
        let mut options = WidgetOptions::default();
        options.update(&WidgetForm {
            shots: Some("40".to_string()),
            ..WidgetForm::default()
        });
        assert_eq!(options.shots, 12);

        options.update(&WidgetForm {
            shots: Some("0".to_string()),
            ..WidgetForm::default()
        });
        assert_eq!(options.shots, 1);
    }

    #[test]
    fn test_render_shots() {
        let options = WidgetOptions {
            title: "Dribbble".to_string(),
            desc: String::new(),
            shots: 2,
        };
        let html = render(&options, &Ok(vec![shot(1), shot(2)]));

        assert!(html.starts_with("<h3 class=\"widget-title\">Dribbble</h3>"));
        assert!(!html.contains("<p>"));
        assert_eq!(html.matches("class=\"bean-shot\"").count(), 2);
        assert!(html.contains(
            "<a href=\"https://dribbble.com/shots/1\" target=\"blank\"><img height=\"300\" width=\"400\" src=\"https://cdn.example/1.png\" alt=\"\" /></a>"
        ));
        assert!(!html.contains(FALLBACK_MESSAGE));
        assert!(html.ends_with("</div></div>"));
    }

    #[test]
    fn test_render_fallback_on_error() {
        let html = render(&WidgetOptions::default(), &Err(DribbbleError::Http(401)));

        assert!(html.contains("<p>Use our Dribbble widget to display your shots.</p>"));
        assert!(html.contains(&format!(
            "<div class=\"bean-dribbble-shots\">{FALLBACK_MESSAGE}</div>"
        )));
    }

    #[test]
    fn test_render_escapes_attributes() {
        let shot: Shot = serde_json::from_value(json!({
            "html_url": "https://dribbble.com/shots/1?a=1&b=\"2\"",
            "images": {"normal": "x.png"}
        }))
        .unwrap();
        let options = WidgetOptions {
            title: String::new(),
            desc: String::new(),
            shots: 1,
        };

        let html = render(&options, &Ok(vec![shot]));
        assert!(html.contains("href=\"https://dribbble.com/shots/1?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("height=\"\" width=\"\""));
    }

    #[tokio::test]
    async fn test_feed_without_credentials_renders_fallback() {
        let client = client(RequestOutcome::response(200, Some("[]".into())));
        let options = WidgetOptions::default();

        for (account, token) in [("", ""), ("jsmith", ""), ("", "abc123")] {
            let html = render_feed(&client, account, token, &options).await;
            assert!(html.contains(&format!(
                "<div class=\"bean-dribbble-shots\">{FALLBACK_MESSAGE}</div>"
            )));
        }
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_feed_renders_fetched_shots() {
        let body = serde_json::to_string(&vec![shot(1), shot(2), shot(3)]).unwrap();
        let client = client(RequestOutcome::response(200, Some(body)));
        let options = WidgetOptions {
            shots: 3,
            ..WidgetOptions::default()
        };

        let html = render_feed(&client, "jsmith", "abc123", &options).await;

        assert_eq!(html.matches("class=\"bean-shot\"").count(), 3);
        assert!(
            client.transport().requests()[0]
                .url
                .ends_with("/users/jsmith/shots?per_page=3")
        );
    }
}
