use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod error;

pub use error::ProviderError;

/// Publication status of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Published,
    Processing,
    Draft,
}

/// Who can see a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

/// Channel that published a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
}

/// Represents a video resource
///
/// `view_count`, `like_count` and `dislike_count` are aggregates reported by
/// the backend. The client never writes to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub status: VideoStatus,
    pub visibility: Visibility,
    pub author: Author,
    pub thumbnail_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Length in seconds, 0 for live streams
    pub duration: u32,
    pub view_count: u64,
    pub like_count: u64,
    pub dislike_count: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_live: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Video {
    pub fn is_live(&self) -> bool {
        self.is_live || self.duration == 0
    }
}

/// Account record of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public profile attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The client-side session. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub profile: Profile,
}

/// Tokens handed out by login and register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Plain acknowledgement returned by logout and analytics calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub username: String,
    pub avatar_url: String,
}

/// Represents a comment on a video, with its replies in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: CommentAuthor,
    pub content: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// Position of a page inside a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Builds a cursor for `total` items split into pages of `page_size`.
    ///
    /// `page` is clamped to `1..=total_pages` so the cursor never points past
    /// the last page. An empty result set has zero pages and stays on page 1.
    pub fn new(page: u32, page_size: u32, total: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size);
        let page = if total_pages == 0 {
            1
        } else {
            page.clamp(1, total_pages)
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    pub fn has_more(&self) -> bool {
        self.total > 0 && self.page < self.total_pages
    }
}

/// One page of videos along with its cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub pagination: Pagination,
}

/// Field used to order video listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    ViewCount,
    LikeCount,
    Duration,
    Title,
}

impl FromStr for SortField {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "published_at" | "publishedAt" => Ok(Self::PublishedAt),
            "view_count" | "viewCount" => Ok(Self::ViewCount),
            "like_count" | "likeCount" => Ok(Self::LikeCount),
            "duration" => Ok(Self::Duration),
            "title" => Ok(Self::Title),
            other => Err(ProviderError::InvalidQuery(format!(
                "unknown sort field '{}'",
                other
            ))),
        }
    }
}

/// Parameters of a video listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoQuery {
    pub page: u32,
    pub page_size: u32,
    pub q: Option<String>,
    pub sort_by: SortField,
    pub sort_desc: bool,
}

impl Default for VideoQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 24,
            q: None,
            sort_by: SortField::CreatedAt,
            sort_desc: true,
        }
    }
}

/// Feed filters shown above the discovery grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    #[default]
    All,
    Trending,
    Gaming,
    Esports,
    Tutorials,
    Live,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        FilterCategory::All,
        FilterCategory::Trending,
        FilterCategory::Gaming,
        FilterCategory::Esports,
        FilterCategory::Tutorials,
        FilterCategory::Live,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FilterCategory::All => "all",
            FilterCategory::Trending => "trending",
            FilterCategory::Gaming => "gaming",
            FilterCategory::Esports => "esports",
            FilterCategory::Tutorials => "tutorials",
            FilterCategory::Live => "live",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterCategory::All => "All",
            FilterCategory::Trending => "Trending",
            FilterCategory::Gaming => "Gaming",
            FilterCategory::Esports => "Esports",
            FilterCategory::Tutorials => "Tutorials",
            FilterCategory::Live => "Live",
        }
    }

    /// Whether the feed for this filter is the popularity ranking rather
    /// than the paged listing.
    pub fn uses_popular_ranking(&self) -> bool {
        matches!(self, FilterCategory::All | FilterCategory::Trending)
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterCategory {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCategory::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProviderError::InvalidQuery(format!("unknown filter '{}'", s)))
    }
}

/// A filter pill as displayed, with the number of videos it advertises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub id: FilterCategory,
    pub label: String,
    pub count: u32,
}

/// Recorded analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

/// Event submitted by a caller as part of a batch. The timestamp is filled
/// in on arrival when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_counts_partial_last_page() {
        let cursor = Pagination::new(1, 24, 36);
        assert_eq!(cursor.total_pages, 2);
        assert!(cursor.has_more());

        let last = Pagination::new(2, 24, 36);
        assert!(!last.has_more());
    }

    #[test]
    fn empty_result_set_has_no_pages() {
        let cursor = Pagination::new(1, 24, 0);
        assert_eq!(cursor.total_pages, 0);
        assert_eq!(cursor.page, 1);
        assert!(!cursor.has_more());
    }

    #[test]
    fn pagination_never_points_past_last_page() {
        let cursor = Pagination::new(9, 10, 25);
        assert_eq!(cursor.total_pages, 3);
        assert_eq!(cursor.page, 3);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let cursor = Pagination::new(1, 0, 3);
        assert_eq!(cursor.page_size, 1);
        assert_eq!(cursor.total_pages, 3);
    }

    #[test]
    fn filter_ids_parse_back() {
        for category in FilterCategory::ALL {
            assert_eq!(category.id().parse::<FilterCategory>().unwrap(), category);
        }
        assert!("cooking".parse::<FilterCategory>().is_err());
    }

    #[test]
    fn only_all_and_trending_use_popular_ranking() {
        let popular: Vec<_> = FilterCategory::ALL
            .into_iter()
            .filter(FilterCategory::uses_popular_ranking)
            .collect();
        assert_eq!(popular, vec![FilterCategory::All, FilterCategory::Trending]);
    }

    #[test]
    fn video_query_defaults_to_newest_first() {
        let query = VideoQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 24);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert!(query.sort_desc);
    }

    #[test]
    fn sort_field_accepts_both_spellings() {
        assert_eq!("view_count".parse::<SortField>().unwrap(), SortField::ViewCount);
        assert_eq!("viewCount".parse::<SortField>().unwrap(), SortField::ViewCount);
        assert!("rating".parse::<SortField>().is_err());
    }

    #[test]
    fn analytics_event_serializes_type_key() {
        let event = AnalyticsEvent {
            event_type: "page_view".to_string(),
            properties: serde_json::Map::new(),
            timestamp: Utc::now(),
            session_id: "mock_session_123".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "page_view");
    }
}
