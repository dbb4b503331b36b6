use crate::control::Control;

/// Class every enroll/unenroll control carries, whatever its state.
pub const CONTROL_CLASS: &str = "unenroll-btn";

pub fn render_control(control: &Control) -> String {
    let marker = control.marker();
    let disabled = if control.pending { " disabled" } else { "" };
    format!(
        r#"<button type="button" class="{CONTROL_CLASS} {classes}" data-course-id="{id}"{disabled}><i class="fas {icon} mr-1"></i>{label}</button>"#,
        classes = marker.classes.join(" "),
        id = escape_html(control.course_id.as_str()),
        icon = marker.icon,
        label = marker.label,
    )
}

pub fn render_page(controls: &[Control]) -> String {
    let items: String = controls
        .iter()
        .map(|control| format!("      <li>{}</li>\n", render_control(control)))
        .collect();
    PAGE_HTML.replace("{{CONTROLS}}", &items)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn unescape_html(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Courses</title>
</head>
<body>
  <main>
    <ul class="courses">
{{CONTROLS}}    </ul>
  </main>
</body>
</html>
"#;
