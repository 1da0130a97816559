//! Ranking, filtering and paging over a snapshot of the catalog.

use domain::{Pagination, SortField, Video, VideoPage, VideoQuery};
use std::cmp::Ordering;

/// Queries shorter than this get no suggestions
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Most viewed videos first, truncated to `limit`.
///
/// The cursor describes the truncated ranking itself, so it never reports a
/// second page.
pub fn rank_popular(mut videos: Vec<Video>, limit: u32) -> VideoPage {
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos.truncate(limit as usize);
    let total = videos.len() as u32;
    VideoPage {
        videos,
        pagination: Pagination::new(1, limit, total),
    }
}

fn matches_query(video: &Video, needle: &str) -> bool {
    video.title.to_lowercase().contains(needle)
        || video.author.username.to_lowercase().contains(needle)
}

fn compare(field: SortField, a: &Video, b: &Video) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::PublishedAt => a.published_at.cmp(&b.published_at),
        SortField::ViewCount => a.view_count.cmp(&b.view_count),
        SortField::LikeCount => a.like_count.cmp(&b.like_count),
        SortField::Duration => a.duration.cmp(&b.duration),
        SortField::Title => a.title.cmp(&b.title),
    }
}

/// Filters, sorts and pages `videos` according to `query`.
///
/// The text filter matches title or author username, ignoring case. Sorting
/// is stable, so equal keys keep catalog order in both directions. A page
/// past the end yields no videos.
pub fn query_videos(videos: Vec<Video>, query: &VideoQuery) -> VideoPage {
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<Video> = match needle {
        Some(needle) => videos
            .into_iter()
            .filter(|video| matches_query(video, &needle))
            .collect(),
        None => videos,
    };

    if query.sort_desc {
        matching.sort_by(|a, b| compare(query.sort_by, b, a));
    } else {
        matching.sort_by(|a, b| compare(query.sort_by, a, b));
    }

    let page_size = query.page_size.max(1);
    let page = query.page.max(1);
    let total = matching.len() as u32;
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);

    let videos = matching
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    VideoPage {
        videos,
        pagination: Pagination::new(page, page_size, total),
    }
}

/// Titles containing `q`, without duplicates, in catalog order.
pub fn suggest_titles(videos: &[Video], q: &str) -> Vec<String> {
    if q.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
        return Vec::new();
    }
    let needle = q.to_lowercase();
    let mut titles: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);
    for video in videos {
        if titles.len() == MAX_SUGGESTIONS {
            break;
        }
        if video.title.to_lowercase().contains(&needle) && !titles.contains(&video.title) {
            titles.push(video.title.clone());
        }
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::{InMemoryRepository, Repository};

    fn catalog() -> Vec<Video> {
        InMemoryRepository::with_seed(11).get_videos()
    }

    #[test]
    fn popular_is_sorted_by_views_and_truncated() {
        let page = rank_popular(catalog(), 24);
        assert_eq!(page.videos.len(), 24);
        assert!(
            page.videos
                .windows(2)
                .all(|pair| pair[0].view_count >= pair[1].view_count)
        );
        assert_eq!(page.pagination.total, 24);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_more());
    }

    #[test]
    fn popular_with_large_limit_returns_whole_catalog() {
        let page = rank_popular(catalog(), 100);
        assert_eq!(page.videos.len(), 36);
        assert!(!page.pagination.has_more());
    }

    #[test]
    fn query_pages_through_catalog() {
        let first = query_videos(catalog(), &VideoQuery::default());
        assert_eq!(first.videos.len(), 24);
        assert_eq!(first.pagination.total, 36);
        assert_eq!(first.pagination.total_pages, 2);
        assert!(first.pagination.has_more());

        let second = query_videos(
            catalog(),
            &VideoQuery {
                page: 2,
                ..VideoQuery::default()
            },
        );
        assert_eq!(second.videos.len(), 12);
        assert!(!second.pagination.has_more());

        let mut ids: Vec<_> = first.videos.iter().chain(&second.videos).map(|v| &v.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 36);
    }

    #[test]
    fn query_defaults_to_newest_first() {
        let page = query_videos(catalog(), &VideoQuery::default());
        assert!(
            page.videos
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }

    #[test]
    fn ascending_sort_when_not_descending() {
        let page = query_videos(
            catalog(),
            &VideoQuery {
                sort_by: SortField::Duration,
                sort_desc: false,
                page_size: 36,
                ..VideoQuery::default()
            },
        );
        assert!(page.videos.windows(2).all(|pair| pair[0].duration <= pair[1].duration));
    }

    #[test]
    fn equal_keys_keep_catalog_order() {
        let page = query_videos(
            catalog(),
            &VideoQuery {
                q: Some("Ultimate Gaming Setup".to_string()),
                sort_by: SortField::Title,
                ..VideoQuery::default()
            },
        );
        let ids: Vec<_> = page.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "17", "27"]);
    }

    #[test]
    fn text_filter_matches_title_or_username_ignoring_case() {
        let by_title = query_videos(
            catalog(),
            &VideoQuery {
                q: Some("MONTAGE".to_string()),
                ..VideoQuery::default()
            },
        );
        assert_eq!(by_title.videos.len(), 1);
        assert_eq!(by_title.videos[0].id, "1");

        let by_author = query_videos(
            catalog(),
            &VideoQuery {
                q: Some("esports_central".to_string()),
                ..VideoQuery::default()
            },
        );
        assert_eq!(by_author.videos.len(), 1);
        assert_eq!(by_author.videos[0].id, "3");
    }

    #[test]
    fn no_matches_means_no_pages() {
        let page = query_videos(
            catalog(),
            &VideoQuery {
                q: Some("zzzz-nothing".to_string()),
                ..VideoQuery::default()
            },
        );
        assert!(page.videos.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_more());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = query_videos(
            catalog(),
            &VideoQuery {
                page: 5,
                ..VideoQuery::default()
            },
        );
        assert!(page.videos.is_empty());
        assert_eq!(page.pagination.page, 2);
        assert!(!page.pagination.has_more());
    }

    #[test]
    fn short_queries_get_no_suggestions() {
        let videos = catalog();
        for q in ["", "g", "é"] {
            assert!(suggest_titles(&videos, q).is_empty());
        }
    }

    #[test]
    fn suggestions_are_distinct_and_capped() {
        let suggestions = suggest_titles(&catalog(), "gam");
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        for title in &suggestions {
            assert!(title.to_lowercase().contains("gam"));
        }
        let mut unique = suggestions.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), suggestions.len());
        assert_eq!(
            suggestions,
            vec![
                "Epic Gaming Montage - Best Plays 2024",
                "Beginner's Guide to Competitive Gaming",
                "Ultimate Gaming Setup Tour 2024",
                "Coaching Session: Improve Your Game",
            ]
        );
    }

    #[test]
    fn repeated_titles_are_suggested_once() {
        let suggestions = suggest_titles(&catalog(), "psychology");
        assert_eq!(suggestions, vec!["The Psychology of Winning"]);
    }
}
