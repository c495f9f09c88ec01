//! HTML for the single page of the app

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;
use uuid::Uuid;

use crate::app_config::{Config, TranslationStyle};
use crate::app_controller::StatusMessage;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { font-size: 1.6rem; }
.caption { color: #666; }
.banner { background: #fde8e8; border: 1px solid #e0a0a0; padding: .75rem; border-radius: 6px; }
form label { display: block; margin-top: 1rem; font-weight: 600; }
textarea, select, input[type=text] { width: 100%; box-sizing: border-box; padding: .4rem; }
button { margin-top: 1.25rem; padding: .5rem 1.25rem; }
ul.status { list-style: none; padding: 0; }
ul.status li { padding: .4rem .6rem; margin: .3rem 0; border-radius: 4px; }
.success { background: #e6f4ea; } .info { background: #e8f0fe; }
.warning { background: #fff4e5; } .error { background: #fde8e8; }
a.download { display: inline-block; margin-top: 1rem; font-weight: 600; }
"#;

/// Values pre-filled in the form
#[derive(Debug, Clone)]
pub(crate) struct FormDefaults {
    pub style: TranslationStyle,
    pub instructions: String,
    pub output_name: String,
}

impl FormDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            style: config.translation.style,
            instructions: config.translation.extra_instructions.clone(),
            output_name: config.document.output_file_name.clone(),
        }
    }
}

pub(crate) struct PageView<'a> {
    pub startup_error: Option<&'a str>,
    pub form: FormDefaults,
    pub messages: &'a [StatusMessage],
    pub download: Option<(Uuid, &'a str)>,
}

pub(crate) fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Hebrew PDF → English Word</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<h1>Hebrew PDF → English Word</h1>\n");
    html.push_str(
        "<p class=\"caption\">Upload one or more Hebrew PDFs. Each page is translated and \
         everything is combined into one Word document.</p>\n",
    );

    if let Some(error) = view.startup_error {
        let _ = writeln!(html, "<div class=\"banner\">{}</div>", encode_text(error));
    }

    render_form(&mut html, &view.form, view.startup_error.is_some());

    if !view.messages.is_empty() {
        html.push_str("<ul class=\"status\">\n");
        for message in view.messages {
            let _ = writeln!(
                html,
                "<li class=\"{}\">{}</li>",
                message.level.as_str(),
                encode_text(&message.message)
            );
        }
        html.push_str("</ul>\n");
    }

    if let Some((id, name)) = view.download {
        let _ = writeln!(
            html,
            "<a class=\"download\" href=\"/download/{}\" download=\"{}\">Download {}</a>",
            id,
            encode_double_quoted_attribute(name),
            encode_text(name)
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, form: &FormDefaults, disabled: bool) {
    html.push_str("<form method=\"post\" action=\"/translate\" enctype=\"multipart/form-data\">\n");
    html.push_str("<label for=\"files\">Hebrew PDFs</label>\n");
    html.push_str("<input id=\"files\" type=\"file\" name=\"files\" accept=\"application/pdf,.pdf\" multiple>\n");

    html.push_str("<label for=\"style\">Translation style</label>\n<select id=\"style\" name=\"style\">\n");
    for style in TranslationStyle::ALL {
        let selected = if style == form.style { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            style.to_lowercase_string(),
            selected,
            encode_text(style.display_name())
        );
    }
    html.push_str("</select>\n");

    let _ = writeln!(
        html,
        "<label for=\"instructions\">Extra instructions (optional)</label>\n\
         <textarea id=\"instructions\" name=\"instructions\" rows=\"3\" \
         placeholder=\"e.g. Keep names transliterated, translate 'Hashem' as 'God'\">{}</textarea>",
        encode_text(&form.instructions)
    );

    let _ = writeln!(
        html,
        "<label for=\"output_name\">Output file name</label>\n\
         <input id=\"output_name\" type=\"text\" name=\"output_name\" value=\"{}\">",
        encode_double_quoted_attribute(&form.output_name)
    );

    let _ = writeln!(
        html,
        "<button type=\"submit\"{}>Translate to Word</button>\n</form>",
        if disabled { " disabled" } else { "" }
    );
}
