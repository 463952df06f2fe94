use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::neynar::WeightedReply;

const STOP_TERM: &str = "$DEGEN";
const ELLIPSIS: &str = "...";

/// Chat-completion summarizer. Output is bounded by `char_budget`: an
/// over-long first answer gets one compression request on the secondary
/// model, and whatever comes back is clipped so the budget is never exceeded.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    compress_model: String,
    char_budget: usize,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

impl OpenAiClient {
    pub fn from_config(config: &OpenAiConfig) -> Option<Self> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            compress_model: config.compress_model.clone(),
            char_budget: config.char_budget,
        })
    }

    pub fn char_budget(&self) -> usize {
        self.char_budget
    }

    /// Distills the themes of a reply thread into 3 short comma-separated
    /// words, weighted by reply likes. All generation errors are rewrapped as
    /// a summarizer failure.
    pub async fn summarize_replies(
        &self,
        cast_text: &str,
        replies: &[WeightedReply],
    ) -> Result<String, String> {
        let replies_json = serde_json::to_string(replies)
            .map_err(|err| format!("failed to encode replies: {}", err))?;
        let prompt = build_summary_prompt(cast_text, &replies_json, self.char_budget);

        let content = self
            .chat(&self.model, prompt)
            .await
            .map_err(|err| format!("summary generation failed: {}", err))?;

        if content.chars().count() <= self.char_budget {
            return Ok(content);
        }

        let compressed = self
            .chat(&self.compress_model, build_compress_prompt(&content, self.char_budget))
            .await
            .map_err(|err| format!("summary generation failed: {}", err))?;

        Ok(clip_to_budget(&compressed, self.char_budget))
    }

    async fn chat(&self, model: &str, prompt: String) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("openai request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("openai API error: {}", status));
            }
            return Err(format!("openai API error: {} {}", status, detail));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| format!("openai response parse failed: {}", err))?;

        let content = body
            .choices
            .first()
            .ok_or_else(|| "openai response missing choices".to_string())?
            .message
            .content
            .trim()
            .to_string();
        Ok(content)
    }
}

pub fn build_summary_prompt(cast_text: &str, replies_json: &str, char_budget: usize) -> String {
    format!(
        "Please summarize a collection of replies I will share and identify the top 3 \
frequently mentioned topics. These topics should let a new user who has not read the \
whole list of replies quickly get an idea of the core themes being talked about.\n\n\
This is the original post which the user likely has read:\n\n{cast}\n\n\
We don't want to call out extremely obvious stuff from the post itself but find \
interesting themes being talked about in the replies.\n\n\
PROVIDE 3 WORDS UNDER STRICTLY {budget} CHARACTERS IN TOTAL, SEPARATED BY COMMAS, \
summarizing frequent yet interesting themes in the replies. Make sure to weigh the \
replies based on the number of likes each one has. More liked replies should get a \
higher weight when you are trying to summarize the topics. Again avoid obvious topics \
that are already in the original post. Please avoid {stop} as a stop word if it is \
frequently mentioned.\n\n\
Here is a JSON array of the replies along with the number of likes each one got:\n\n\
{replies}\n\n\
REMEMBER AGAIN, RESPONSE NEEDS TO BE STRICTLY UNDER {budget} CHARACTERS TOTAL.",
        cast = cast_text,
        budget = char_budget,
        stop = STOP_TERM,
        replies = replies_json,
    )
}

pub fn build_compress_prompt(input: &str, char_budget: usize) -> String {
    format!(
        "Please summarize the following words under {} characters, separated by comma: {}",
        char_budget, input
    )
}

/// Truncates `text` so the result never exceeds `budget` characters, marking
/// the cut with an ellipsis when there is room for one.
pub fn clip_to_budget(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget <= ELLIPSIS.len() {
        return text.chars().take(budget).collect();
    }
    let kept: String = text.chars().take(budget - ELLIPSIS.len()).collect();
    format!("{}{}", kept, ELLIPSIS)
}
