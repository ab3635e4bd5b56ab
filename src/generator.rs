use tracing::{debug, info};

use crate::error::{GiftError, Result};
use crate::gpt::Recommender;
use crate::parser::{parse_gifts, GiftSuggestion};
use crate::profile::Profile;
use crate::prompt::Prompt;

/// Result of a generation cycle that reached the model and got a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Suggestions(Vec<GiftSuggestion>),
    /// The reply had no usable lines.
    Unparsed { raw: String },
}

/// Keeps the last submitted profile so it can be regenerated without re-entry.
#[derive(Debug, Default)]
pub struct GiftGenerator {
    profile: Option<Profile>,
    gifts: Vec<GiftSuggestion>,
}

impl GiftGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn gifts(&self) -> &[GiftSuggestion] {
        &self.gifts
    }

    pub async fn submit(&mut self, client: &dyn Recommender, profile: Profile) -> Result<Outcome> {
        self.profile = Some(profile);
        self.run(client).await
    }

    pub async fn regenerate(&mut self, client: &dyn Recommender) -> Result<Outcome> {
        if self.profile.is_none() {
            return Err(GiftError::NoProfile);
        }
        self.run(client).await
    }

    async fn run(&mut self, client: &dyn Recommender) -> Result<Outcome> {
        self.gifts.clear();
        let profile = self.profile.as_ref().ok_or(GiftError::NoProfile)?;
        client.preflight()?;
        let prompt = Prompt::from_profile(profile);
        info!("generating gifts for: {}", prompt.user);

        let reply = client.generate(prompt.system, &prompt.user).await.map_err(|e| {
            debug!("生成礼物推荐失败: {e}");
            e
        })?;

        let gifts = parse_gifts(&reply);
        if gifts.is_empty() {
            info!("API返回内容: {reply}");
            return Ok(Outcome::Unparsed { raw: reply });
        }
        self.gifts = gifts.clone();
        Ok(Outcome::Suggestions(gifts))
    }
}
