//! This module provides a client to the student-data and assistant service

use std::error::Error;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::chat::{ChatEvent, ChatStreamDecoder};
use crate::course::StudentRecord;
use crate::syllabus::SyllabusData;
use crate::traits::StudentDataSource;

static STUDENT_DATA_PATH: &str = "/api/get_student_data";
static CHAT_PATH: &str = "/api/chat";
static SAVE_SYLLABUS_PATH: &str = "/api/save_syllabus_data";

/// The `action` that asks the chat endpoint to analyze a syllabus instead of chatting
static ANALYZE_SYLLABUS_ACTION: &str = "analyze_syllabus";


/// A client to the remote service. Requests are not retried, and have no timeout
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self{
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client to the service set in the configuration
    pub fn from_config() -> Result<Self, Box<dyn Error>> {
        Self::new(crate::config::API_URL.as_str())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch and validate the student record
    pub async fn get_student_data(&self) -> Result<StudentRecord, Box<dyn Error>> {
        let url = self.endpoint(STUDENT_DATA_PATH)?;
        log::debug!("Fetching student data from {}", url);

        let res = self.http.get(url).send().await?;
        let res = check_status(res, "fetch student data").await?;
        let value: Value = res.json().await?;
        StudentRecord::from_json(value)
    }

    /// Send a prompt to the assistant.
    ///
    /// `on_chunk` is called with every piece of the answer as soon as it is received.
    /// This returns the whole answer.
    pub async fn chat<F>(&self, prompt: &str, mut on_chunk: F) -> Result<String, Box<dyn Error>>
    where
        F: FnMut(&str),
    {
        let url = self.endpoint(CHAT_PATH)?;
        let res = self.http.post(url)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?;
        let mut res = check_status(res, "chat").await?;

        let mut decoder = ChatStreamDecoder::new();
        let mut answer = String::new();
        let mut complete = false;
        while let Some(bytes) = res.chunk().await? {
            for event in decoder.push(&bytes)? {
                match event {
                    ChatEvent::Chunk(chunk) => {
                        on_chunk(&chunk);
                        answer.push_str(&chunk);
                    },
                    ChatEvent::Complete => complete = true,
                }
            }
        }
        match decoder.finish()? {
            Some(ChatEvent::Chunk(chunk)) => {
                on_chunk(&chunk);
                answer.push_str(&chunk);
            },
            Some(ChatEvent::Complete) => complete = true,
            None => (),
        }

        if complete == false {
            log::warn!("Chat stream ended without a completion marker");
        }
        Ok(answer)
    }

    /// Upload a syllabus PDF and return the course data the assistant extracted from it
    pub async fn analyze_syllabus(&self, file_name: &str, pdf: Vec<u8>) -> Result<SyllabusData, Box<dyn Error>> {
        let url = self.endpoint(CHAT_PATH)?;
        log::info!("Uploading {} for analysis ({} bytes)", file_name, pdf.len());

        let part = Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", part)
            .text("action", ANALYZE_SYLLABUS_ACTION);

        let res = self.http.post(url).multipart(form).send().await?;
        let res = check_status(res, "analyze syllabus").await?;
        let value: Value = res.json().await?;
        if let Some(err) = value.get("error") {
            return Err(format!("Syllabus analysis failed: {}", err).into());
        }
        match serde_json::from_value(value) {
            Ok(data) => Ok(data),
            Err(err) => Err(format!("Invalid syllabus data: {}", err).into()),
        }
    }

    /// Save (possibly edited) syllabus data to the student record
    pub async fn save_syllabus_data(&self, data: &SyllabusData) -> Result<(), Box<dyn Error>> {
        let url = self.endpoint(SAVE_SYLLABUS_PATH)?;
        let res = self.http.post(url)
            .json(&json!({ "data": data }))
            .send()
            .await?;
        check_status(res, "save syllabus data").await?;
        log::info!("Saved syllabus data for {}", data.course_name);
        Ok(())
    }
}

#[async_trait]
impl StudentDataSource for Client {
    async fn get_student_data(&self) -> Result<StudentRecord, Box<dyn Error>> {
        Client::get_student_data(self).await
    }
}

/// Turn a non-2xx response into an error, including the server message if there is one
async fn check_status(res: Response, what: &str) -> Result<Response, Box<dyn Error>> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(status_error(what, status, &body).into())
}

fn status_error(what: &str, status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body).ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(|s| s.to_string()));
    match message {
        Some(msg) => format!("Failed to {}: HTTP {} ({})", what, status, msg),
        None => format!("Failed to {}: HTTP {}", what, status),
    }
}
