//! Header search box with type-ahead suggestions.
//!
//! Typing and dismissing the panel are independent: a click outside the
//! input hides the panel, but the query stays. Suggestion responses carry
//! the generation they were requested under, so an answer for an older
//! query never overwrites a newer one.

use serde::Serialize;
use video_service::{MIN_SUGGESTION_QUERY_CHARS, VideoClient};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounds of the search input on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchBox {
    query: String,
    suggestions: Vec<String>,
    panel_open: bool,
    focused: bool,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    bounds: Option<Rect>,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    /// Records the new input value. Returns the lookup to issue, if the
    /// query is long enough to warrant one.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<SuggestionRequest> {
        self.query = query.into();
        self.generation += 1;
        if self.query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
            self.suggestions.clear();
            self.panel_open = false;
            return None;
        }
        Some(SuggestionRequest {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Returns false when the response belongs to an outdated query.
    pub fn apply_suggestions(
        &mut self,
        request: &SuggestionRequest,
        result: Result<Vec<String>, domain::ProviderError>,
    ) -> bool {
        if request.generation != self.generation {
            return false;
        }
        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.panel_open = true;
            }
            Err(err) => {
                tracing::debug!(query = %request.query, error = %err, "Suggestion lookup failed");
                self.suggestions.clear();
            }
        }
        true
    }

    /// Fills the input with the picked suggestion without searching.
    pub fn select_suggestion(&mut self, suggestion: &str) {
        self.query = suggestion.to_string();
        // invalidate lookups still running for the typed prefix
        self.generation += 1;
        self.panel_open = false;
    }

    pub fn on_focus(&mut self) {
        self.focused = true;
        if !self.suggestions.is_empty() {
            self.panel_open = true;
        }
    }

    pub fn on_blur(&mut self) {
        self.focused = false;
    }

    /// Pointer pressed somewhere on the page
    pub fn on_pointer_down(&mut self, point: Point) {
        let inside = self.bounds.is_some_and(|bounds| bounds.contains(point));
        if !inside {
            self.panel_open = false;
        }
    }

    /// Submits the current query. Blank queries are ignored.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        self.panel_open = false;
        Some(query.to_string())
    }
}

/// Runs the lookup for a query change against `videos`, if one is needed
pub async fn on_query_change(
    search: &std::sync::Mutex<SearchBox>,
    videos: &dyn VideoClient,
    query: &str,
) {
    let request = search
        .lock()
        .expect("Failed to acquire lock on search box")
        .set_query(query);
    let Some(request) = request else {
        return;
    };
    let result = videos.get_search_suggestions(&request.query).await;
    search
        .lock()
        .expect("Failed to acquire lock on search box")
        .apply_suggestions(&request, result);
}
