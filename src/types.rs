use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Field deserializers for fixture records. A field of the wrong JSON type is
/// coerced or defaulted instead of failing the whole document.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Number, Value};

    fn to_string(v: Value) -> String {
        match v {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(to_string(Value::deserialize(d)?))
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter(|v| !v.is_null()).map(to_string).collect(),
            Value::String(s) => vec![s],
            _ => Vec::new(),
        })
    }

    /// Numbers, or numeric strings; anything else is the default.
    pub fn number<'de, D, T>(d: D) -> Result<T, D::Error>
    where D: Deserializer<'de>, T: DeserializeOwned + Default {
        let v = match Value::deserialize(d)? {
            Value::String(s) => s.trim().parse::<Number>().map(Value::Number).unwrap_or(Value::Null),
            other => other,
        };
        Ok(serde_json::from_value(v).unwrap_or_default())
    }
}

/// A game entry as served by `/all_games.json`.
///
/// `max_players` stays a string: the fixtures encode it that way and the
/// comparison view only displays it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub appid: String,
    #[serde(deserialize_with = "lenient::number")]
    pub total_reviews: u64,
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64, // percentage, 0-100
    #[serde(deserialize_with = "lenient::string")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub library_image: String,
    #[serde(deserialize_with = "lenient::string")]
    pub max_players: String,
}

/// A movie entry as served by `/all_movies.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieRecord {
    #[serde(deserialize_with = "lenient::number")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::number")]
    pub year: i32,
    #[serde(deserialize_with = "lenient::string")]
    pub director: String,
    #[serde(deserialize_with = "lenient::strings")]
    pub actors: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub plot: String,
    #[serde(deserialize_with = "lenient::string")]
    pub poster: String,
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64, // 0-10
}

/// A video entry, either from `/videos.json`, the local cache, or added by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub platform: String,
}

impl VideoRecord {
    pub fn new(id: impl Into<String>, url: impl Into<String>, platform: impl Into<String>) -> Self {
        Self { id: id.into(), url: url.into(), platform: platform.into() }
    }

    /// Build a record from a watch URL, recovering the platform id from it.
    /// Understands YouTube (`watch?v=`, `youtu.be/`, `/shorts/`, `/embed/`) and Vimeo.
    pub fn from_url(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let parsed = Url::parse(raw).with_context(|| format!("invalid video url: {raw}"))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(anyhow!("unsupported url scheme '{other}': {raw}")),
        }
        let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.strip_prefix("www.").or_else(|| host.strip_prefix("m.")).unwrap_or(&host);
        let segments = parsed.path_segments().map(|s| s.filter(|p| !p.is_empty()).collect::<Vec<_>>()).unwrap_or_default();

        let (id, platform) = match host {
            "youtube.com" => {
                let id = match segments.first().copied() {
                    Some("watch") => parsed.query_pairs().find(|(k, _)| k == "v").map(|(_, v)| v.into_owned()),
                    Some("shorts") | Some("embed") => segments.get(1).map(|s| s.to_string()),
                    _ => None,
                };
                (id, "youtube")
            }
            "youtu.be" => (segments.first().map(|s| s.to_string()), "youtube"),
            "vimeo.com" => {
                let id = segments.first().filter(|s| s.chars().all(|c| c.is_ascii_digit())).map(|s| s.to_string());
                (id, "vimeo")
            }
            _ => return Err(anyhow!("unrecognized video host: {raw}")),
        };

        match id.filter(|s| !s.trim().is_empty()) {
            Some(id) => Ok(Self::new(id, raw, platform)),
            None => Err(anyhow!("no video id found in url: {raw}")),
        }
    }
}

/// Outcome of `add_video`. Persistence failures are reported here instead of as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVideoResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddVideoResult {
    pub fn ok() -> Self { Self { success: true, error: None } }
    pub fn failed(error: impl Into<String>) -> Self { Self { success: false, error: Some(error.into()) } }
}
