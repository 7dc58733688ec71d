use serde_json::Value;

const SYSTEM_INSTRUCTION: &str = "Respond JSON only. Proportions 70:30.";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ask the model for a massing layout and return its JSON payload as-is.
pub async fn generate_layout(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<Value, BoxError> {
    let request = build_request(client, api_key, model, prompt)?;
    let response = client.execute(request).await?.error_for_status()?;

    let body: Value = response.json().await?;
    let text = candidate_text(&body).ok_or("response has no candidate text")?;
    tracing::debug!(len = text.len(), "model answered");
    Ok(serde_json::from_str(text)?)
}

/// The key travels in a header so it never shows up in the URL, and so
/// never in a `reqwest::Error` that gets logged.
fn build_request(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> reqwest::Result<reqwest::Request> {
    client
        .post(format!("{ENDPOINT}/{model}:generateContent"))
        .header("x-goog-api-key", api_key)
        .header("content-type", "application/json")
        .json(&request_body(prompt))
        .build()
}

fn request_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "generationConfig": { "responseMimeType": "application/json" }
    })
}

/// `candidates[0].content.parts[0].text`
fn candidate_text(body: &Value) -> Option<&str> {
    body["candidates"]
        .as_array()?
        .first()?["content"]["parts"]
        .as_array()?
        .first()?["text"]
        .as_str()
}
