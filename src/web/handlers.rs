//! HTTP request handlers

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

use super::pages::{render_page, FormDefaults, PageView};
use super::AppState;
use crate::app_controller::{RunRequest, StatusLevel, StatusMessage, UploadedFile};
use crate::document::DOCX_CONTENT_TYPE;
use crate::file_utils::FileManager;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// False while the translator is not configured
    pub translator_ready: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        translator_ready: state.is_ready(),
    })
}

/// The upload form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = PageView {
        startup_error: state.startup_error(),
        form: FormDefaults::from_config(state.config()),
        messages: &[],
        download: None,
    };
    Html(render_page(&view))
}

/// Run the pipeline for one form submission
pub async fn translate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut request = RunRequest {
        options: state
            .controller
            .as_ref()
            .map(|c| c.default_options())
            .unwrap_or_default(),
        ..Default::default()
    };
    let mut messages = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (e.status(), format!("Failed to read upload: {e}")))?;

        match name.as_str() {
            "files" => {
                let file_name = file_name.unwrap_or_default();
                // Browsers send an empty part when no file was chosen
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                if !FileManager::has_extension(&file_name, "pdf") {
                    let message = format!("{file_name}: not a PDF, ignored.");
                    warn!("{}", message);
                    messages.push(StatusMessage {
                        level: StatusLevel::Warning,
                        message,
                    });
                    continue;
                }
                request.files.push(UploadedFile::new(file_name, data));
            }
            "style" => {
                let value = String::from_utf8_lossy(&data);
                match value.parse() {
                    Ok(style) => request.options.style = style,
                    Err(e) => warn!("{}, keeping {}", e, request.options.style),
                }
            }
            "instructions" => {
                request.options.extra_instructions = String::from_utf8_lossy(&data).trim().to_string();
            }
            "output_name" => {
                let value = String::from_utf8_lossy(&data).trim().to_string();
                if !value.is_empty() {
                    request.output_name = Some(value);
                }
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    let mut form = FormDefaults::from_config(state.config());
    form.style = request.options.style;
    form.instructions = request.options.extra_instructions.clone();

    let Some(controller) = state.controller.clone() else {
        messages.push(StatusMessage {
            level: StatusLevel::Error,
            message: state
                .startup_error()
                .unwrap_or("The translator is not configured.")
                .to_string(),
        });
        let view = PageView {
            startup_error: state.startup_error(),
            form,
            messages: &messages,
            download: None,
        };
        return Ok(Html(render_page(&view)));
    };

    info!("Translation requested for {} file(s)", request.files.len());
    let outcome = controller
        .run(request, |done, total| debug!("Progress: {}/{} pages", done, total))
        .await;
    messages.extend(outcome.report.messages);

    let download = outcome.document.map(|prepared| {
        let id = state.store_download(prepared.file_name.clone(), prepared.bytes);
        (id, prepared.file_name)
    });

    let view = PageView {
        startup_error: state.startup_error(),
        form,
        messages: &messages,
        download: download.as_ref().map(|(id, name)| (*id, name.as_str())),
    };
    Ok(Html(render_page(&view)))
}

/// Hand out a prepared document; each id works once
pub async fn download(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(prepared) = state.take_download(&id) else {
        return (
            StatusCode::NOT_FOUND,
            "Download not found. It may have been retrieved already.",
        )
            .into_response();
    };

    info!(
        "Serving {} ({} bytes, prepared {})",
        prepared.file_name,
        prepared.bytes.len(),
        prepared.created_at.format("%H:%M:%S")
    );

    let disposition = format!("attachment; filename=\"{}\"", header_safe(&prepared.file_name));
    (
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        prepared.bytes,
    )
        .into_response()
}

// Header values must be visible ASCII
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"') || c == ' ' { c } else { '_' })
        .collect()
}
