use crate::api::models::AppError;
use crate::storage::review::tags_from_value;
use serde_json::{Map, Value};

const REQUIRED_FIELDS: &str = "movieTitle, director, reviewText, and rating are required";
const INVALID_RATING: &str = "rating must be a number between 1 and 10";

/// Validated body of a create request
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub movie_title: String,
    pub director: String,
    pub review_text: String,
    pub rating: f64,
    pub tags: Vec<String>,
}

/// Validated body of an update request. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub review_text: Option<String>,
    pub rating: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Decode a raw request body. An empty body is an empty object; a body that
/// is not a JSON object carries no fields.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(_) => Err(AppError::BadRequest("Invalid JSON body".to_string())),
    }
}

impl NewReview {
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, AppError> {
        let movie_title = required_text(body, "movieTitle");
        let director = required_text(body, "director");
        let review_text = required_text(body, "reviewText");
        let rating = body.get("rating");

        let (Some(movie_title), Some(director), Some(review_text), Some(rating)) =
            (movie_title, director, review_text, rating)
        else {
            return Err(AppError::BadRequest(REQUIRED_FIELDS.to_string()));
        };

        Ok(Self {
            movie_title,
            director,
            review_text,
            rating: parse_rating(rating)?,
            tags: normalize_tags(body.get("tags")),
        })
    }
}

impl ReviewPatch {
    /// Validate every present field before anything is applied
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, AppError> {
        let rating = body.get("rating").map(parse_rating).transpose()?;

        let review_text = match body.get("reviewText") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(AppError::BadRequest(
                    "reviewText must be a string".to_string(),
                ));
            }
        };

        let tags = body.get("tags").map(|t| normalize_tags(Some(t)));

        Ok(Self {
            review_text,
            rating,
            tags,
        })
    }
}

/// Accept a finite number in [1, 10], given as a JSON number or numeric string
pub fn parse_rating(value: &Value) -> Result<f64, AppError> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    rating
        .filter(|r| r.is_finite() && (1.0..=10.0).contains(r))
        .ok_or_else(|| AppError::BadRequest(INVALID_RATING.to_string()))
}

/// Tags given on create or update, normalized the way stored tags are
pub fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    value.map(tags_from_value).unwrap_or_default()
}

fn required_text(body: &Map<String, Value>, field: &str) -> Option<String> {
    match body.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
