use serde::{Deserialize, Serialize};

use crate::config::NeynarConfig;

/// Social-graph client: validates signed frame/action payloads and fetches
/// cast conversations.
#[derive(Clone)]
pub struct NeynarClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

/// Interactor and cast extracted from a successfully validated action.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub fid: Option<u64>,
    pub cast_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub cast_text: String,
    pub replies: Vec<WeightedReply>,
}

/// A direct reply weighted by engagement; likes and recasts count equally.
#[derive(Debug, Clone, Serialize)]
pub struct WeightedReply {
    pub text: String,
    pub num_likes: u64,
}

#[derive(Serialize)]
struct ValidateRequest {
    message_bytes_in_hex: String,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
    action: Option<ValidatedAction>,
}

#[derive(Deserialize)]
struct ValidatedAction {
    interactor: Option<Interactor>,
    cast: Option<CastRef>,
}

#[derive(Deserialize)]
struct Interactor {
    fid: Option<u64>,
}

#[derive(Deserialize)]
struct CastRef {
    hash: Option<String>,
}

#[derive(Deserialize)]
struct ConversationEnvelope {
    conversation: ConversationBody,
}

#[derive(Deserialize)]
struct ConversationBody {
    cast: ConversationCast,
}

#[derive(Deserialize)]
struct ConversationCast {
    text: Option<String>,
    #[serde(default)]
    direct_replies: Vec<ReplyCast>,
}

#[derive(Deserialize)]
struct ReplyCast {
    text: Option<String>,
    reactions: Option<ReplyReactions>,
}

#[derive(Deserialize)]
struct ReplyReactions {
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    recasts: u64,
}

impl NeynarClient {
    pub fn from_config(config: &NeynarConfig) -> Result<Self, String> {
        if config.api_key.trim().is_empty() {
            return Err("NEYNAR_API_KEY is not set".to_string());
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        })
    }

    /// Validates a signed action payload. `Ok(None)` means the service
    /// answered but rejected the signature; transport and parse failures are
    /// errors.
    pub async fn validate_action(
        &self,
        message_bytes: &str,
    ) -> Result<Option<ActionContext>, String> {
        let url = format!(
            "{}/v2/farcaster/frame/validate",
            self.api_base.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .header("api_key", &self.api_key)
            .json(&ValidateRequest {
                message_bytes_in_hex: message_bytes.to_string(),
            })
            .send()
            .await
            .map_err(|err| format!("neynar validate request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("neynar API error: {}", status));
            }
            return Err(format!("neynar API error: {} {}", status, detail));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|err| format!("neynar validate parse failed: {}", err))?;

        if !body.valid {
            return Ok(None);
        }

        let action = body.action;
        Ok(Some(ActionContext {
            fid: action
                .as_ref()
                .and_then(|action| action.interactor.as_ref())
                .and_then(|interactor| interactor.fid),
            cast_hash: action
                .as_ref()
                .and_then(|action| action.cast.as_ref())
                .and_then(|cast| cast.hash.clone()),
        }))
    }

    /// Fetches a cast's thread and reduces the direct replies to weighted
    /// summarization input.
    pub async fn conversation(&self, cast_hash: &str) -> Result<Conversation, String> {
        let url = format!(
            "{}/v2/farcaster/cast/conversation",
            self.api_base.trim_end_matches('/')
        );
        let response = self
            .client
            .get(url)
            .query(&[
                ("identifier", cast_hash),
                ("type", "hash"),
                ("reply_depth", "5"),
                ("include_chronological_parent_casts", "false"),
            ])
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .send()
            .await
            .map_err(|err| format!("neynar conversation request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("neynar API error: {}", status));
            }
            return Err(format!("neynar API error: {} {}", status, detail));
        }

        let body: ConversationEnvelope = response
            .json()
            .await
            .map_err(|err| format!("neynar conversation parse failed: {}", err))?;

        let cast = body.conversation.cast;
        let replies = cast
            .direct_replies
            .into_iter()
            .map(|reply| {
                let num_likes = reply
                    .reactions
                    .map(|reactions| reactions.likes + reactions.recasts)
                    .unwrap_or(0);
                WeightedReply {
                    text: reply.text.unwrap_or_default(),
                    num_likes,
                }
            })
            .collect();

        Ok(Conversation {
            cast_text: cast.text.unwrap_or_default(),
            replies,
        })
    }
}
