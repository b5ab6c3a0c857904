// Request routing
// Maps the proxy's query parameters onto exactly one upstream resource.

use std::fmt;

/// Raw proxy parameters. The first occurrence of each key wins and an
/// empty value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub id: Option<String>,
    pub query: Option<String>,
    pub popular: Option<String>,
    pub genres: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "id" => &mut params.id,
                "query" => &mut params.query,
                "popular" => &mut params.popular,
                "genres" => &mut params.genres,
                "genre" => &mut params.genre,
                "year" => &mut params.year,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        for slot in [
            &mut params.id,
            &mut params.query,
            &mut params.popular,
            &mut params.genres,
            &mut params.genre,
            &mut params.year,
        ] {
            if slot.as_deref() == Some("") {
                *slot = None;
            }
        }
        params
    }

    fn flag(value: &Option<String>) -> bool {
        value.as_deref() == Some("1")
    }
}

/// What the caller asked for, after precedence has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    Popular,
    Search { term: String },
    Discover { genre: Option<String>, year: Option<String> },
    Detail { id: String },
    GenreList,
}

type Rule = (&'static str, fn(&QueryParams) -> Option<MovieQuery>);

/// Evaluated top to bottom; the first rule that yields a query wins.
const RULES: &[Rule] = &[
    ("detail", detail_rule),
    ("genre-list", genre_list_rule),
    ("discover", discover_rule),
    ("popular", popular_rule),
    ("search", search_rule),
];

fn detail_rule(p: &QueryParams) -> Option<MovieQuery> {
    p.id.clone().map(|id| MovieQuery::Detail { id })
}

fn genre_list_rule(p: &QueryParams) -> Option<MovieQuery> {
    QueryParams::flag(&p.genres).then_some(MovieQuery::GenreList)
}

fn discover_rule(p: &QueryParams) -> Option<MovieQuery> {
    (p.genre.is_some() || p.year.is_some()).then(|| MovieQuery::Discover {
        genre: p.genre.clone(),
        year: p.year.clone(),
    })
}

fn popular_rule(p: &QueryParams) -> Option<MovieQuery> {
    (QueryParams::flag(&p.popular) || p.query.is_none()).then_some(MovieQuery::Popular)
}

fn search_rule(p: &QueryParams) -> Option<MovieQuery> {
    p.query.clone().map(|term| MovieQuery::Search { term })
}

impl MovieQuery {
    /// Resolve parameters through the rule table. Every combination
    /// resolves; unmatched input falls back to the popular list.
    pub fn resolve(params: &QueryParams) -> Self {
        RULES
            .iter()
            .find_map(|(name, rule)| {
                let matched = rule(params);
                if matched.is_some() {
                    tracing::debug!("Route matched rule: {}", name);
                }
                matched
            })
            .unwrap_or(MovieQuery::Popular)
    }

    pub fn from_raw_query(raw: Option<&str>) -> Self {
        Self::resolve(&QueryParams::parse(raw))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MovieQuery::Popular => "popular",
            MovieQuery::Search { .. } => "search",
            MovieQuery::Discover { .. } => "discover",
            MovieQuery::Detail { .. } => "detail",
            MovieQuery::GenreList => "genre-list",
        }
    }

    /// Upstream resource for this query, without credentials.
    pub fn upstream_target(&self) -> UpstreamTarget {
        match self {
            MovieQuery::Popular => UpstreamTarget::new(&["movie", "popular"]),
            MovieQuery::Search { term } => {
                UpstreamTarget::new(&["search", "movie"]).param("query", term)
            }
            MovieQuery::Discover { genre, year } => {
                let mut target = UpstreamTarget::new(&["discover", "movie"])
                    .param("sort_by", "popularity.desc");
                if let Some(genre) = genre {
                    target = target.param("with_genres", genre);
                }
                if let Some(year) = year {
                    target = target.param("primary_release_year", year);
                }
                target
            }
            MovieQuery::Detail { id } => UpstreamTarget::new(&["movie", id]),
            MovieQuery::GenreList => UpstreamTarget::new(&["genre", "movie", "list"]),
        }
    }

    /// Proxy query pairs that make the proxy resolve back to `self`.
    pub fn proxy_params(&self) -> Vec<(&'static str, String)> {
        match self {
            MovieQuery::Popular => vec![("popular", "1".to_string())],
            MovieQuery::Search { term } => vec![("query", term.clone())],
            MovieQuery::Discover { genre, year } => {
                let mut pairs = Vec::new();
                if let Some(genre) = genre {
                    pairs.push(("genre", genre.clone()));
                }
                if let Some(year) = year {
                    pairs.push(("year", year.clone()));
                }
                pairs
            }
            MovieQuery::Detail { id } => vec![("id", id.clone())],
            MovieQuery::GenreList => vec![("genres", "1".to_string())],
        }
    }
}

/// Path segments and query pairs relative to the upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub segments: Vec<String>,
    pub params: Vec<(&'static str, String)>,
}

impl UpstreamTarget {
    fn new(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: &str) -> Self {
        self.params.push((key, value.to_string()));
        self
    }
}

// Credential-free rendering, safe to log
impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if !self.params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
