// Throwaway TMDB stand-in for handler tests
use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "test-secret-key-9f2c";

/// Deliberately odd spacing so byte-exact relaying is observable.
pub const POPULAR_BODY: &str =
    r#"{"page":1,  "results":[{"id":550,"title":"Fight Club","genre_ids":[18],"release_date":"1999-10-15","vote_average":8.433,"poster_path":"/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"}]}"#;
pub const GENRES_BODY: &str = r#"{"genres":[{"id":18,"name":"Drama"},{"id":28,"name":"Action"}]}"#;
pub const DETAIL_BODY: &str = r#"{"id":550,"title":"Fight Club","overview":"A ticking-time-bomb insomniac...","release_date":"1999-10-15","runtime":139,"vote_average":8.4,"backdrop_path":null,"poster_path":null,"genres":[{"id":18,"name":"Drama"}],"tagline":"Mischief. Mayhem. Soap."}"#;
pub const RESULTS_BODY: &str = r#"{"page":1,"results":[]}"#;

pub struct MockUpstream {
    /// Base URL including the `/3` API prefix
    pub base_url: String,
    /// Origin-form URIs (path + query) in arrival order
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn last_seen(&self) -> Option<String> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

pub async fn spawn_mock_upstream() -> MockUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().fallback(move |uri: Uri| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(uri.to_string());
            respond(uri.path())
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}/3", addr),
        seen,
    }
}

fn json(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn respond(path: &str) -> Response {
    match path {
        "/3/movie/popular" => json(StatusCode::OK, POPULAR_BODY),
        "/3/genre/movie/list" => json(StatusCode::OK, GENRES_BODY),
        "/3/search/movie" | "/3/discover/movie" => json(StatusCode::OK, RESULTS_BODY),
        "/3/movie/404" => json(
            StatusCode::NOT_FOUND,
            r#"{"success":false,"status_code":34,"status_message":"The resource you requested could not be found."}"#,
        ),
        "/3/movie/401" => json(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"status_code":7,"status_message":"Invalid API key: You must be granted a valid key."}"#,
        ),
        p if p.starts_with("/3/movie/") => json(StatusCode::OK, DETAIL_BODY),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
