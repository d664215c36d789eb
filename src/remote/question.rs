//! Today's question

use super::ApiClient;
use crate::calendar::date_key;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The question assigned to a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayQuestion {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assigned_date: Option<NaiveDate>,
}

impl ApiClient {
    /// GET /questions?date=YYYY-MM-DD
    pub async fn fetch_question(&self, date: NaiveDate) -> Result<TodayQuestion> {
        let key = date_key(date);
        debug!("Fetching question for {}", key);

        let response = self
            .client
            .get(self.url("/questions"))
            .query(&[("date", key.as_str())])
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_payload() {
        let q: TodayQuestion = serde_json::from_str(
            r#"{"id":9,"content":"요즘 가장 행복했던 순간은?","assignedDate":"2025-11-02"}"#,
        )
        .unwrap();

        assert_eq!(q.assigned_date, NaiveDate::from_ymd_opt(2025, 11, 2));
        assert_eq!(q.category, None);
    }
}
