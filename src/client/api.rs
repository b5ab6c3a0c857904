// Browsing client for the movie proxy
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::cache::{load_table, store_table, GenreCache};
use crate::client::error::ClientError;
use crate::models::{ClientConfig, GenreList, GenreTable, Movie, MovieDetails, MoviePage};
use crate::proxy::route::MovieQuery;

const FETCH_MOVIES_FAILED: &str = "Failed to fetch movies";
const SEARCH_FAILED: &str = "Failed to search movies";
const DISCOVER_FAILED: &str = "Failed to discover movies";
const DETAIL_FAILED: &str = "Failed to load movie details";
const GENRES_FAILED: &str = "Failed to fetch genres";

pub struct MovieArcClient {
    http_client: Client,
    proxy_base: Url,
}

impl MovieArcClient {
    pub fn new(proxy_base: Option<&str>, timeout_secs: u64) -> Result<Self, ClientError> {
        let raw = proxy_base
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(ClientError::MissingProxyBase)?;
        let proxy_base =
            Url::parse(raw).map_err(|e| ClientError::InvalidProxyBase(format!("{}: {}", raw, e)))?;

        Ok(Self {
            http_client: crate::utils::http::create_client(timeout_secs),
            proxy_base,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.proxy_base.as_deref(), config.request_timeout)
    }

    fn url_for(&self, query: &MovieQuery) -> Url {
        let mut url = self.proxy_base.clone();
        url.query_pairs_mut().extend_pairs(query.proxy_params());
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        query: &MovieQuery,
        failure: &'static str,
    ) -> Result<T, ClientError> {
        let url = self.url_for(query);
        tracing::debug!("GET {}", url);

        let result: Result<T, reqwest::Error> = async {
            self.http_client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        }
        .await;

        result.map_err(|e| {
            tracing::debug!("{} ({}): {}", failure, query.kind(), e);
            ClientError::fetch(failure, e)
        })
    }

    async fn get_movies(
        &self,
        query: &MovieQuery,
        failure: &'static str,
    ) -> Result<Vec<Movie>, ClientError> {
        let page: MoviePage = self.get_json(query, failure).await?;
        Ok(page.results)
    }

    pub async fn fetch_popular(&self) -> Result<Vec<Movie>, ClientError> {
        self.get_movies(&MovieQuery::Popular, FETCH_MOVIES_FAILED).await
    }

    pub async fn search(&self, title: &str) -> Result<Vec<Movie>, ClientError> {
        let query = MovieQuery::Search {
            term: title.to_string(),
        };
        self.get_movies(&query, SEARCH_FAILED).await
    }

    /// Home-page listing: a blank title shows the popular list.
    pub async fn browse(&self, title: &str) -> Result<Vec<Movie>, ClientError> {
        let query = if title.trim().is_empty() {
            MovieQuery::Popular
        } else {
            MovieQuery::Search {
                term: title.to_string(),
            }
        };
        self.get_movies(&query, FETCH_MOVIES_FAILED).await
    }

    pub async fn discover(
        &self,
        genre: Option<&str>,
        year: Option<&str>,
    ) -> Result<Vec<Movie>, ClientError> {
        let query = MovieQuery::Discover {
            genre: genre.map(str::to_string),
            year: year.map(str::to_string),
        };
        self.get_movies(&query, DISCOVER_FAILED).await
    }

    pub async fn fetch_detail(&self, id: &str) -> Result<MovieDetails, ClientError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ClientError::MissingMovieId);
        }
        let query = MovieQuery::Detail { id: id.to_string() };
        self.get_json(&query, DETAIL_FAILED).await
    }

    /// Live genre fetch, bypassing any cache
    pub async fn fetch_genres(&self) -> Result<GenreTable, ClientError> {
        let list: GenreList = self.get_json(&MovieQuery::GenreList, GENRES_FAILED).await?;
        Ok(list.into_table())
    }

    /// Cached genre table; a miss (or unreadable entry) refetches and
    /// overwrites the cache.
    pub async fn genre_table(&self, cache: &dyn GenreCache) -> Result<GenreTable, ClientError> {
        if let Some(table) = load_table(cache) {
            return Ok(table);
        }
        let table = self.fetch_genres().await?;
        store_table(cache, &table);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base() {
        assert!(matches!(
            MovieArcClient::new(None, 5),
            Err(ClientError::MissingProxyBase)
        ));
        assert!(matches!(
            MovieArcClient::new(Some("  "), 5),
            Err(ClientError::MissingProxyBase)
        ));
        assert_eq!(
            ClientError::MissingProxyBase.to_string(),
            "Proxy URL missing. Set MOVIEARC_PROXY_BASE to your proxy URL."
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            MovieArcClient::new(Some("not a url"), 5),
            Err(ClientError::InvalidProxyBase(_))
        ));
    }

    #[test]
    fn test_url_for_each_operation() {
        let client = MovieArcClient::new(Some("https://proxy.example.dev/"), 5).unwrap();

        assert_eq!(
            client.url_for(&MovieQuery::Popular).as_str(),
            "https://proxy.example.dev/?popular=1"
        );
        assert_eq!(
            client
                .url_for(&MovieQuery::Search {
                    term: "the dark knight".to_string()
                })
                .as_str(),
            "https://proxy.example.dev/?query=the+dark+knight"
        );
        assert_eq!(
            client
                .url_for(&MovieQuery::Discover {
                    genre: Some("35".to_string()),
                    year: Some("1994".to_string())
                })
                .as_str(),
            "https://proxy.example.dev/?genre=35&year=1994"
        );
        assert_eq!(
            client.url_for(&MovieQuery::GenreList).as_str(),
            "https://proxy.example.dev/?genres=1"
        );
        assert_eq!(
            client
                .url_for(&MovieQuery::Detail {
                    id: "27205".to_string()
                })
                .as_str(),
            "https://proxy.example.dev/?id=27205"
        );
    }

    #[tokio::test]
    async fn test_blank_detail_id() {
        let client = MovieArcClient::new(Some("http://127.0.0.1:1/"), 5).unwrap();
        let err = client.fetch_detail(" ").await.unwrap_err();
        assert_eq!(err.to_string(), "Missing movie id.");
    }

    #[tokio::test]
    async fn test_cached_table_skips_network() {
        // Port 1 is never listening; a network call would fail the test
        let client = MovieArcClient::new(Some("http://127.0.0.1:1/"), 5).unwrap();
        let cache = crate::client::cache::MemoryGenreCache::new();
        cache.set(r#"{"18":"Drama"}"#.to_string());

        let table = client.genre_table(&cache).await.unwrap();
        assert_eq!(table.get(&18).map(String::as_str), Some("Drama"));
    }

    #[tokio::test]
    async fn test_unreachable_proxy_message() {
        let client = MovieArcClient::new(Some("http://127.0.0.1:1/"), 5).unwrap();
        let err = client.search("alien").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to search movies");

        let err = client.browse("").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movies");
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_stays_quiet_at_warn() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = MovieArcClient::new(Some("http://127.0.0.1:1/"), 5).unwrap();
        let err = client.fetch_popular().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movies");

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.is_empty(), "unexpected log output: {}", output);
    }
}
