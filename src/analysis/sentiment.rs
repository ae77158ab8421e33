//! News sentiment scoring.
//!
//! Fetches recent headlines for a coin from a NewsAPI-compatible endpoint and
//! asks a chat-completions model for a single score in [-1.0, 1.0]. Sentiment
//! is a best-effort signal: every failure path degrades to 0.0 with a warning
//! rather than failing the coin.

use crate::domain::model::CoinSpec;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use chrono::{Duration, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;

const SCORING_PROMPT: &str = "You are a financial sentiment analyst. Based on the following news headlines, provide a single sentiment score from -1.0 (very negative) to 1.0 (very positive) for the cryptocurrency mentioned. Respond with only the numerical score and nothing else.";

const MAX_ARTICLES: usize = 10;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

pub async fn news_sentiment<C: ConfigProvider>(client: &Client, config: &C, coin: &CoinSpec) -> f64 {
    tracing::info!("Starting sentiment analysis for {}...", coin.ticker);

    let Some(news_key) = config.news_api_key() else {
        tracing::warn!("No news API key configured. Skipping sentiment analysis.");
        return 0.0;
    };
    let Some(llm_key) = config.llm_api_key() else {
        tracing::warn!("No LLM API key configured. Skipping sentiment analysis.");
        return 0.0;
    };

    let articles = match fetch_articles(client, config.news_api_base(), news_key, &coin.name).await
    {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!("News request failed for {}: {}", coin.name, e);
            return 0.0;
        }
    };
    if articles.is_empty() {
        tracing::warn!("No recent news articles found for {}.", coin.name);
        return 0.0;
    }

    let news_text = headlines_block(&articles);
    match score_headlines(client, config, llm_key, &coin.name, &news_text).await {
        Ok(Some(score)) => {
            tracing::info!("Sentiment analysis complete for {}. Score: {:.2}", coin.ticker, score);
            score
        }
        Ok(None) => {
            tracing::warn!("Could not parse a sentiment score for {}.", coin.name);
            0.0
        }
        Err(e) => {
            tracing::warn!("Sentiment scoring failed for {}: {}", coin.name, e);
            0.0
        }
    }
}

async fn fetch_articles(
    client: &Client,
    base: &str,
    api_key: &str,
    coin_name: &str,
) -> Result<Vec<Article>> {
    // Search the last 3 days so quiet coins still return something.
    let from = (Utc::now() - Duration::days(3)).format("%Y-%m-%d").to_string();
    let url = format!("{}/v2/everything", base.trim_end_matches('/'));
    let response: NewsResponse = client
        .get(&url)
        .query(&[
            ("q", coin_name),
            ("from", from.as_str()),
            ("sortBy", "publishedAt"),
            ("language", "en"),
            ("apiKey", api_key),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(response.articles.into_iter().take(MAX_ARTICLES).collect())
}

fn headlines_block(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "Title: {}. Desc: {}",
                a.title,
                a.description.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn score_headlines<C: ConfigProvider>(
    client: &Client,
    config: &C,
    api_key: &str,
    coin_name: &str,
    news_text: &str,
) -> Result<Option<f64>> {
    let url = format!(
        "{}/v1/chat/completions",
        config.llm_api_base().trim_end_matches('/')
    );
    let body = serde_json::json!({
        "model": config.llm_model(),
        "messages": [
            {"role": "system", "content": SCORING_PROMPT},
            {
                "role": "user",
                "content": format!(
                    "Analyze the sentiment for {} from these articles:\n\n{}",
                    coin_name, news_text
                ),
            }
        ],
        "temperature": 0.0,
        "max_tokens": 10,
    });

    let response: ChatResponse = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let content = response
        .choices
        .first()
        .map(|c| c.message.content.as_str())
        .unwrap_or("");
    Ok(parse_score(content))
}

fn score_regex() -> &'static Regex {
    static SCORE_RE: OnceLock<Regex> = OnceLock::new();
    SCORE_RE.get_or_init(|| Regex::new(r"-?\d+\.?\d*").unwrap())
}

/// Extracts the first numeric token from a model reply and clamps it to
/// [-1.0, 1.0].
pub fn parse_score(content: &str) -> Option<f64> {
    let matched = score_regex().find(content)?;
    let score: f64 = matched.as_str().parse().ok()?;
    Some(score.clamp(-1.0, 1.0))
}
