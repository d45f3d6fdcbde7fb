use crate::domain::model::MailMessage;
use serde_json::Value;

pub const DEFAULT_SUBJECT: &str = "New form submission";

pub fn render_message(subject: &str, value: &Value) -> MailMessage {
    MailMessage {
        subject: subject.to_string(),
        text_body: render_text(value),
        html_body: render_html(value),
    }
}

pub fn render_text(value: &Value) -> String {
    match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(name, field)| format!("{}: {}", name, display_value(field)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => pretty(other),
    }
}

pub fn render_html(value: &Value) -> String {
    match value {
        Value::Object(fields) => {
            let mut html = String::from("<table>\n");
            for (name, field) in fields {
                html.push_str(&format!(
                    "<tr><th>{}</th><td>{}</td></tr>\n",
                    escape_html(name),
                    escape_html(&display_value(field))
                ));
            }
            html.push_str("</table>");
            html
        }
        other => format!("<pre>{}</pre>", escape_html(&pretty(other))),
    }
}

// 字串不加引號，其他值用緊湊 JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
