//! W3C WebDriver client
//!
//! Speaks the WebDriver HTTP protocol to a driver server such as
//! MicrosoftWebDriver or msedgedriver. One client owns one session.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use a11yscore_core::{AutomationDriver, DriverError};

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Deserialize)]
struct Envelope {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

pub struct WebDriverClient {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverClient {
    /// Opens a new session for `browser_name` on the server at `base_url`.
    pub async fn connect(base_url: &str, browser_name: &str) -> Result<Self, DriverError> {
        let client = Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();
        let body = json!({
            "capabilities": { "alwaysMatch": { "browserName": browser_name } }
        });
        let value = send(&client, Method::POST, &format!("{base_url}/session"), Some(body)).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Session("response carried no sessionId".into()))?
            .to_string();
        info!(%base_url, %session_id, browser_name, "Started WebDriver session");
        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, path)
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, DriverError> {
        send(&self.client, method, &self.url(path), body).await
    }

    async fn find_by_id(&self, element_id: &str) -> Result<String, DriverError> {
        let selector = format!("[id=\"{}\"]", element_id.replace('"', "\\\""));
        let value = self
            .call(
                Method::POST,
                "/element",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await
            .map_err(|e| match e {
                DriverError::ElementNotFound(_) => DriverError::ElementNotFound(element_id.into()),
                other => other,
            })?;
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| DriverError::Protocol("element reference missing from response".into()))
    }
}

async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, DriverError> {
    debug!(%method, url, "WebDriver request");
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let resp = request
        .send()
        .await
        .map_err(|e| DriverError::Http(e.to_string()))?;
    let status = resp.status();
    let envelope: Envelope = resp
        .json()
        .await
        .map_err(|e| DriverError::Protocol(format!("{status}: {e}")))?;
    if status.is_success() {
        return Ok(envelope.value);
    }
    Err(wire_error(envelope.value))
}

fn wire_error(value: Value) -> DriverError {
    match serde_json::from_value::<WireError>(value) {
        Ok(err) if err.error == "no such element" => DriverError::ElementNotFound(err.message),
        Ok(err) if err.error == "invalid session id" || err.error == "session not created" => {
            DriverError::Session(format!("{}: {}", err.error, err.message))
        }
        Ok(err) => DriverError::Protocol(format!("{}: {}", err.error, err.message)),
        Err(e) => DriverError::Protocol(format!("unrecognised error payload: {e}")),
    }
}

#[async_trait]
impl AutomationDriver for WebDriverClient {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        info!(url, "Navigating");
        self.call(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
    }

    async fn execute_raw(&self, script: &str, args: &[Value]) -> Result<Value, DriverError> {
        self.call(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    async fn send_keys(&self, element_id: &str, text: &str) -> Result<(), DriverError> {
        let element = self.find_by_id(element_id).await?;
        self.call(
            Method::POST,
            &format!("/element/{element}/value"),
            Some(json!({ "text": text })),
        )
        .await
        .map(|_| ())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let value = self.call(Method::GET, "/screenshot", None).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| DriverError::Protocol("screenshot was not a string".into()))?;
        STANDARD
            .decode(encoded)
            .map_err(|e| DriverError::Protocol(format!("screenshot was not base64: {e}")))
    }

    async fn close(&self) -> Result<(), DriverError> {
        info!(session_id = %self.session_id, "Closing WebDriver session");
        self.call(Method::DELETE, "", None).await.map(|_| ())
    }
}
