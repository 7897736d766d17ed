use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use serde_json::Value;

use crate::config;

use super::GeoError;

const CLIENT_UA: &str = concat!("epicase/", env!("CARGO_PKG_VERSION"), " (field reporting)");

/// Administrative names resolved from a coordinate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Place {
    pub community: String,
    pub district: String,
    pub region: String,
}

/// One place-search suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Client for the reverse-geocoding and place-search services.
pub struct GeocodeClient {
    http: reqwest::Client,
    reverse_url: String,
    search_url: String,
}

impl GeocodeClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            reverse_url: config::DEFAULT_REVERSE_GEOCODE_URL.to_string(),
            search_url: config::DEFAULT_PLACE_SEARCH_URL.to_string(),
        }
    }

    pub fn with_urls(reverse_url: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            reverse_url: reverse_url.into(),
            search_url: search_url.into(),
        }
    }

    /// Resolve administrative names for a coordinate.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Place, GeoError> {
        let response = self
            .http
            .get(&self.reverse_url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", &lat.to_string()),
                ("lon", &lon.to_string()),
            ])
            .header(USER_AGENT, CLIENT_UA)
            .header(ACCEPT_LANGUAGE, "en")
            .send()
            .await?;

        let body: Value = response.json().await?;
        place_from_response(&body)
    }

    /// Live search suggestions. Queries shorter than 3 characters are not
    /// sent at all and yield no suggestions.
    pub async fn search(&self, query: &str) -> Result<Vec<Suggestion>, GeoError> {
        if query.chars().count() < 3 {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(&self.search_url)
            .query(&[("q", query), ("limit", "5"), ("lang", "en")])
            .header(USER_AGENT, CLIENT_UA)
            .send()
            .await?;

        let body: Value = response.json().await?;
        Ok(suggestions_from_response(&body))
    }
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a reverse-geocode response onto form fields. Several address keys
/// can describe each level; the first present wins.
fn place_from_response(body: &Value) -> Result<Place, GeoError> {
    let address = body.get("address").ok_or(GeoError::NoAddress)?;

    let pick = |keys: &[&str]| -> String {
        keys.iter()
            .find_map(|key| address.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    };

    Ok(Place {
        community: pick(&["village", "town", "suburb", "city"]),
        district: pick(&["district", "municipality", "county", "state_district", "city"]),
        region: pick(&["region", "state"]),
    })
}

fn suggestions_from_response(body: &Value) -> Vec<Suggestion> {
    let Some(features) = body.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };

    features
        .iter()
        .filter_map(|feature| {
            let coords = feature
                .pointer("/geometry/coordinates")
                .and_then(Value::as_array)?;
            let lon = coords.first().and_then(Value::as_f64)?;
            let lat = coords.get(1).and_then(Value::as_f64)?;

            let props = feature.get("properties")?;
            let text = |key: &str| props.get(key).and_then(Value::as_str).map(str::to_string);

            Some(Suggestion {
                name: text("name").or_else(|| text("city")).or_else(|| text("country"))?,
                lat,
                lon,
                city: text("city"),
                country: text("country"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_prefers_most_specific_names() {
        let body = serde_json::json!({
            "address": {
                "village": "Anwiankwanta",
                "town": "Bekwai",
                "municipality": "Bekwai Municipal",
                "state": "Ashanti Region"
            }
        });
        let place = place_from_response(&body).unwrap();
        assert_eq!(place.community, "Anwiankwanta");
        assert_eq!(place.district, "Bekwai Municipal");
        assert_eq!(place.region, "Ashanti Region");
    }

    #[test]
    fn city_backfills_community_and_district() {
        let body = serde_json::json!({ "address": { "city": "Kumasi", "state": "Ashanti" } });
        let place = place_from_response(&body).unwrap();
        assert_eq!(place.community, "Kumasi");
        assert_eq!(place.district, "Kumasi");
        assert_eq!(place.region, "Ashanti");
    }

    #[test]
    fn missing_address_is_an_error() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(place_from_response(&body), Err(GeoError::NoAddress)));
    }

    #[test]
    fn suggestions_parse_coordinates_and_labels() {
        let body = serde_json::json!({
            "features": [
                {
                    "geometry": { "coordinates": [-1.6163, 6.6885] },
                    "properties": { "name": "Komfo Anokye Hospital", "city": "Kumasi", "country": "Ghana" }
                },
                {
                    "geometry": { "coordinates": [0.0, 0.0] },
                    "properties": { "country": "Ghana" }
                }
            ]
        });
        let suggestions = suggestions_from_response(&body);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Komfo Anokye Hospital");
        assert_eq!(suggestions[0].lat, 6.6885);
        assert_eq!(suggestions[0].lon, -1.6163);
        // falls back through name -> city -> country
        assert_eq!(suggestions[1].name, "Ghana");
    }

    #[test]
    fn malformed_features_are_dropped() {
        let body = serde_json::json!({ "features": [ { "properties": { "name": "x" } } ] });
        assert!(suggestions_from_response(&body).is_empty());
    }

    #[tokio::test]
    async fn short_queries_are_not_sent() {
        // would panic on connection refused if it tried the network
        let client = GeocodeClient::with_urls("http://127.0.0.1:1", "http://127.0.0.1:1");
        assert!(client.search("ku").await.unwrap().is_empty());
    }
}
