use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use tracing::warn;

use crate::config;
use crate::normalize::{contains_any, has_digit, TABLE_TERMS};
use crate::table::Table;

const API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const VISION_MODEL: &str = "deepseek-vision";
const CHAT_MODEL: &str = "deepseek-chat";

/// Below this length a formatted reply is considered implausible and dropped.
const MIN_PLAUSIBLE_REPLY: usize = 8;

const TABLE_FROM_IMAGE_PROMPT: &str = "这张图片中包含一个表格，请精确提取表格内容，以下面的格式返回JSON数据：\
{\"headers\":[列标题], \"rows\":[[行1数据], [行2数据], ...]}。仅返回JSON数据，不要包含任何其他解释文本。";

const TABLE_FROM_TEXT_PROMPT: &str = "以下是一个从网页上复制的表格内容。请提取表格结构，并以JSON格式返回，格式为：\
{\"headers\":[列标题], \"rows\":[[行1数据], [行2数据], ...]}。仅返回JSON数据，不要包含任何其他解释文本。";

const FORMAT_STRATEGY_PROMPT: &str = "从以下文本中提取BTC交易策略的关键信息，并格式化为包含以下列的表格：\
时间、方向、开仓、止盈、止损。如果某些字段不存在，请标记为\"N/A\"。确保输出为纯表格格式，不要有任何额外解释。";

/// Outcome of one model call. Failures are values, not errors: the caller
/// degrades them to "no candidate from this source" and carries on.
#[derive(Debug, Clone)]
pub enum ModelReply {
    /// The model answered with a structured table.
    Table(Table),
    /// The model answered with free text.
    Text(String),
    /// Transport failure or unparsable reply; `raw_response` carries whatever
    /// body was available.
    Failed {
        error: String,
        raw_response: Option<String>,
    },
}

pub struct DeepSeekClient {
    api_key: Option<String>,
    api_url: String,
    http: reqwest::Client,
}

impl DeepSeekClient {
    /// Key resolution order: explicit parameter, config file, environment.
    pub fn new(api_key: Option<&str>) -> Self {
        let key = config::resolve_api_key(api_key, Path::new(config::DEFAULT_CONFIG_PATH));
        if key.is_none() {
            warn!("no DeepSeek API key found; model-backed extraction will be unavailable");
        }
        DeepSeekClient {
            api_key: key,
            api_url: API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the vision model to read the table out of a screenshot.
    pub async fn extract_table_from_image(&self, image: &[u8]) -> ModelReply {
        let encoded = BASE64.encode(image);
        let payload = serde_json::json!({
            "model": VISION_MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": TABLE_FROM_IMAGE_PROMPT },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:image/jpeg;base64,{encoded}") } }
                ]
            }],
            "temperature": 0
        });
        let content = match self.complete(payload).await {
            Ok(content) => content,
            Err(failed) => return failed,
        };
        parse_table_reply(&content)
    }

    /// Ask the chat model to lift a table structure out of copied text.
    pub async fn reformat_table_text(&self, text: &str) -> ModelReply {
        let prompt = format!("{TABLE_FROM_TEXT_PROMPT}\n\n{text}");
        let payload = serde_json::json!({
            "model": CHAT_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0
        });
        let content = match self.complete(payload).await {
            Ok(content) => content,
            Err(failed) => return failed,
        };
        parse_table_reply(&content)
    }

    /// Reformat a strategy answer into bare table lines. Returns None when
    /// the call fails or the reply is implausibly short.
    pub async fn format_strategy(&self, text: &str, prompt: Option<&str>) -> Option<String> {
        let prompt = match prompt {
            Some(p) => p.to_string(),
            None => format!("{FORMAT_STRATEGY_PROMPT}\n\n```\n{text}\n```"),
        };
        let payload = serde_json::json!({
            "model": CHAT_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.1,
            "max_tokens": 800
        });
        let content = match self.complete(payload).await {
            Ok(content) => content,
            Err(ModelReply::Failed { error, .. }) => {
                warn!(%error, "strategy formatting call failed");
                return None;
            }
            Err(_) => return None,
        };

        let table = extract_table_lines(&content);
        let result = if table.trim().is_empty() { content } else { table };
        if result.trim().len() < MIN_PLAUSIBLE_REPLY {
            return None;
        }
        Some(result)
    }

    /// POST one chat-completions request and return the reply content.
    /// Transport and shape failures come back as `ModelReply::Failed`.
    async fn complete(&self, payload: serde_json::Value) -> Result<String, ModelReply> {
        let Some(key) = &self.api_key else {
            return Err(ModelReply::Failed {
                error: "no API key configured".into(),
                raw_response: None,
            });
        };

        let response = match self
            .http
            .post(&self.api_url)
            .bearer_auth(key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "model request failed");
                return Err(ModelReply::Failed {
                    error: e.to_string(),
                    raw_response: None,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "model request rejected");
            return Err(ModelReply::Failed {
                error: format!("API request failed with status {status}"),
                raw_response: Some(body),
            });
        }

        let body: ChatResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return Err(ModelReply::Failed {
                    error: format!("unreadable API response: {e}"),
                    raw_response: None,
                })
            }
        };
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ModelReply::Failed {
                error: "API response carried no choices".into(),
                raw_response: None,
            })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// The model is told to answer with bare JSON but often wraps it in a code
/// fence anyway.
fn strip_fences(reply: &str) -> &str {
    if let Some(rest) = reply.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(rest).trim()
    } else if reply.contains("```") {
        reply.split("```").nth(1).unwrap_or(reply).trim()
    } else {
        reply.trim()
    }
}

/// Interpret a reply that should be `{"headers": [...], "rows": [...]}` but
/// may be `{"text": "..."}` or arbitrary junk.
fn parse_table_reply(reply: &str) -> ModelReply {
    let json_text = strip_fences(reply);

    if let Ok(table) = serde_json::from_str::<Table>(json_text) {
        return ModelReply::Table(table);
    }

    #[derive(Deserialize)]
    struct TextReply {
        text: String,
    }
    if let Ok(text) = serde_json::from_str::<TextReply>(json_text) {
        return ModelReply::Text(text.text);
    }

    warn!("model reply was not a table");
    ModelReply::Failed {
        error: "reply did not parse as table JSON".into(),
        raw_response: Some(reply.to_string()),
    }
}

/// Keep only reply lines that look like table content: keyword-bearing lines
/// and pipe-delimited lines with digits, minus code fences and list markers.
fn extract_table_lines(content: &str) -> String {
    let enumerator = regex::Regex::new(r"^\d+\.\s+").unwrap();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .filter(|line| {
            contains_any(line, TABLE_TERMS) || (line.contains('|') && has_digit(line))
        })
        .map(|line| enumerator.replace(line, "").to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_reply_parses_to_table() {
        let reply = "```json\n{\"headers\":[\"方向\",\"开仓价\",\"止盈价\",\"止损价\"],\"rows\":[[\"空\",\"80500\",\"78000\",\"83500\"]]}\n```";
        match parse_table_reply(reply) {
            ModelReply::Table(t) => {
                assert_eq!(t.headers[0], "方向");
                assert_eq!(t.rows[0][0], "空");
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn bare_json_reply_parses_to_table() {
        let reply = "{\"headers\":[\"direction\"],\"rows\":[[\"short\"]]}";
        assert!(matches!(parse_table_reply(reply), ModelReply::Table(_)));
    }

    #[test]
    fn text_shaped_reply_becomes_text() {
        let reply = "{\"text\": \"方向: 空, 开仓价: 80500\"}";
        match parse_table_reply(reply) {
            ModelReply::Text(t) => assert!(t.contains("开仓价")),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn junk_reply_fails_with_raw_response() {
        match parse_table_reply("sorry, I cannot read this image") {
            ModelReply::Failed { raw_response, .. } => {
                assert!(raw_response.unwrap().contains("sorry"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn table_line_filter_keeps_signal_lines() {
        let content = "好的，表格如下：\n```\n时间 | 方向 | 开仓 | 止盈 | 止损\n1. 20250411 | 多 | 81000 | 83259 | 80000\n```\n以上仅供参考。";
        let filtered = extract_table_lines(content);
        assert!(filtered.contains("时间 | 方向"));
        assert!(filtered.contains("20250411 | 多"));
        assert!(!filtered.contains("1. "));
        assert!(!filtered.contains("```"));
    }
}
