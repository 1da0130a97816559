use serde::Serialize;
use std::fmt;

/// The two screens plus the fallback for anything else
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Watch { video_id: String },
    NotFound,
}

impl Route {
    /// Resolves a request target such as `/watch?v=12`
    pub fn parse(target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        match path.trim_end_matches('/') {
            "" => Route::Home,
            "/watch" => match query.and_then(|query| query_param(query, "v")) {
                Some(id) if !id.trim().is_empty() => Route::Watch { video_id: id },
                _ => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Watch { video_id } => format!("/watch?v={}", urlencoding::encode(video_id)),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name != key {
            return None;
        }
        let value = value.replace('+', " ");
        urlencoding::decode(&value).ok().map(|value| value.into_owned())
    })
}
