//! Prompt templates and response-size limits for the backend requests.

/// Size of the simulated post sample every analysis is based on.
pub const SAMPLE_POST_COUNT: u32 = 100;

/// `meta.fetchMode` tag the synthesis stage is instructed to emit.
pub const FETCH_MODE: &str = "fixed-newest-100";

// Cardinality caps requested from the synthesis stage and enforced at
// finalize. Oversized structured replies are the main cause of upstream
// truncation failures.
pub const MAX_TOPICS: usize = 4;
pub const MAX_SUBREDDITS: usize = 3;
pub const MAX_PAIN_POINTS_PER_TOPIC: usize = 3;
pub const MAX_POSTS_PER_TOPIC: usize = 3;
pub const MAX_BRANDS: usize = 4;
pub const MAX_EXAMPLE_POSTS_PER_BRAND: usize = 1;

/// Context-gathering request: grounded search constrained to reddit.com and
/// the last 12 months. The free-text reply becomes the synthesis context.
#[must_use]
pub fn grounding_prompt(query: &str) -> String {
    format!(
        "Perform a market research search for \"{query}\" on site:reddit.com.\n\
         Find recent discussions (last 12 months).\n\
         Identify top {MAX_SUBREDDITS} subreddits.\n\
         Collect details for 10 representative threads.\n\
         Goal: Gather data to simulate {SAMPLE_POST_COUNT} representative posts."
    )
}

/// Structured-generation request embedding the grounding context and the
/// fixed output schema with explicit list-length limits.
#[must_use]
pub fn synthesis_prompt(query: &str, search_context: &str) -> String {
    format!(
        r#"You are a Data Engine. Simulate a dataset of EXACTLY {SAMPLE_POST_COUNT} Reddit posts regarding "{query}" based on the search context below.

Search Context:
{search_context}

Output strictly valid JSON.

CRITICAL RULES:
1. **Sample Size**: Calculations based on {SAMPLE_POST_COUNT} posts.
2. **Metrics**: "totalPostsVolume" must be a number (e.g., 2850). "engagementRate" must be a percentage number (e.g., 8.2).
3. **Language**: Titles/Snippets in English. Summaries/Labels in Simplified Chinese.
4. **Limits (To prevent errors)**:
   - 'topics': Max {MAX_TOPICS} items
   - 'subreddits': Max {MAX_SUBREDDITS} items
   - 'painPoints' inside topics: Max {MAX_PAIN_POINTS_PER_TOPIC} items
   - 'topPosts' inside topics: Max {MAX_POSTS_PER_TOPIC} items
   - 'brands': Max {MAX_BRANDS} items
   - 'examplePosts' inside brands: Max {MAX_EXAMPLE_POSTS_PER_BRAND} item

Structure:
{{
  "meta": {{ "fetchedPostCount": {SAMPLE_POST_COUNT}, "fetchMode": "{FETCH_MODE}" }},
  "metrics": {{
    "totalPostsGrowth": number,
    "totalPostsVolume": number,
    "activeTrends": number,
    "engagementRate": number,
    "activeUsers": number
  }},
  "subreddits": [
    {{
      "name": "string (e.g. r/Parenting)",
      "memberCount": number,
      "postVolume": number,
      "percentage": number,
      "history": [{{"month": "string", "value": number}}],
      "topTopics": ["string"],
      "brands": ["string"],
      "painPoints": [{{ "subject": "严重程度", "A": number, "fullMark": 25 }}, {{ "subject": "频率", "A": number, "fullMark": 25 }}, {{ "subject": "时效性", "A": number, "fullMark": 25 }}, {{ "subject": "未满足度", "A": number, "fullMark": 25 }}],
      "topPosts": [ {{ "title": "string", "url": "string", "snippet": "string", "summary_cn": "string", "subreddit": "string", "upvotes": number, "comments": number, "date": "string", "sentiment": "negative" }} ]
    }}
  ],
  "topics": [
    {{
      "title": "string (English)",
      "growth": number,
      "volume": number,
      "sentiment": number,
      "history": [{{"month": "string", "value": number}}],
      "brands": ["string"],
      "painPoints": [
        {{ "id": "string", "title": "string (Chinese)", "severity": number, "frequency": number, "recency": number, "unmetNeed": number, "totalScore": number, "quotes": ["string"] }}
      ],
      "userPersona": {{
        "type": "string",
        "motivation": "string",
        "complaints": "string",
        "scenario": "string",
        "severity": "string",
        "tone": "string"
      }},
      "topPosts": [
        {{ "title": "string", "url": "string", "snippet": "string", "summary_cn": "string", "subreddit": "string", "upvotes": number, "comments": number, "date": "string", "sentiment": "neutral" }}
      ]
    }}
  ],
  "brands": [
    {{
      "name": "string",
      "mentions": number,
      "yoyGrowth": number,
      "sentiment": {{ "pos": number, "neu": number, "neg": number }},
      "topComplaints": ["string"],
      "topPraises": ["string"],
      "examplePosts": [{{ "title": "string", "url": "string" }}]
    }}
  ]
}}"#
    )
}

/// Keyword-suggestion request: a plain JSON array of 5–8 keywords, mirroring
/// the language of the theme.
#[must_use]
pub fn keyword_prompt(theme: &str) -> String {
    format!(
        "Generate 5-8 relevant search keywords or sub-topics for the market research theme: \"{theme}\".\n\
         Return ONLY a JSON array of strings. Keywords should be in Simplified Chinese if the theme is Chinese, \
         otherwise relevant to the language. Example: [\"keyword1\", \"keyword2\"]."
    )
}

/// Ad-hoc search request: free-text answer grounded in Reddit discussions.
#[must_use]
pub fn search_prompt(question: &str) -> String {
    format!(
        "Answer this user question based on Reddit discussions: \"{question}\".\n\
         Provide a concise summary answer in Simplified Chinese and a list of relevant sources found during search."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounding_prompt_scopes_to_reddit_and_window() {
        let prompt = grounding_prompt("iphone battery");
        assert!(prompt.contains("site:reddit.com"));
        assert!(prompt.contains("last 12 months"));
        assert!(prompt.contains("top 3 subreddits"));
    }

    #[test]
    fn synthesis_prompt_embeds_context_and_caps() {
        let prompt = synthesis_prompt("iphone battery", "ctx-marker");
        assert!(prompt.contains("ctx-marker"));
        assert!(prompt.contains("'topics': Max 4 items"));
        assert!(prompt.contains("'subreddits': Max 3 items"));
        assert!(prompt.contains("'brands': Max 4 items"));
        assert!(prompt.contains(FETCH_MODE));
    }

    #[test]
    fn keyword_prompt_requests_plain_array() {
        let prompt = keyword_prompt("smart home");
        assert!(prompt.contains("JSON array of strings"));
        assert!(prompt.contains("smart home"));
    }
}
