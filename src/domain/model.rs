use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// 一筆發射紀錄，欄位名稱與 SpaceX GraphQL schema 相同
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launch {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mission_id: Vec<String>,
    #[serde(default)]
    pub mission_name: Option<String>,
    pub launch_date_local: String,
    #[serde(default)]
    pub launch_site: Option<LaunchSite>,
    #[serde(default)]
    pub rocket: Option<Rocket>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSite {
    #[serde(default)]
    pub site_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rocket {
    #[serde(default)]
    pub rocket_name: Option<String>,
}

impl Launch {
    pub fn site_name(&self) -> &str {
        self.launch_site
            .as_ref()
            .and_then(|site| site.site_name.as_deref())
            .unwrap_or("")
    }

    pub fn rocket_name(&self) -> &str {
        self.rocket
            .as_ref()
            .and_then(|rocket| rocket.rocket_name.as_deref())
            .unwrap_or("")
    }

    pub fn mission_name(&self) -> &str {
        self.mission_name.as_deref().unwrap_or("")
    }

    /// Empty and missing details are treated the same.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// GraphQL 回應中的 `data` 物件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub launches: Vec<Launch>,
}

/// Current value of the upstream data source. `None` while the fetch has not completed.
pub type SourceState = Option<QueryResult>;

/// A launch after date normalization. The raw date stays in `launch`;
/// `year` is the filter/sort key and never comes from `display_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEntry {
    pub launch: Launch,
    pub display_date: String,
    pub year: i32,
}

impl LaunchEntry {
    pub fn id(&self) -> &str {
        &self.launch.id
    }

    pub fn raw_date(&self) -> &str {
        &self.launch.launch_date_local
    }
}

/// 日期無法解析而被排除的紀錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLaunch {
    pub id: String,
    pub raw_date: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub launches: Vec<Arc<LaunchEntry>>,
    pub rejected: Vec<RejectedLaunch>,
    pub total_records: usize,
    /// Every year present in the normalized data, newest first.
    pub available_years: Vec<i32>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
