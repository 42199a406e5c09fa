use crate::storage::Review;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// Query parameters accepted by the list endpoint
#[derive(Debug, Default)]
pub struct ListQuery {
    pub director: Option<String>,
    pub rating: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Rating,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse `field:direction`. Unknown fields yield `None`; the direction
    /// defaults to descending unless it reads `asc` (any case).
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':');
        let field = match parts.next()? {
            "rating" => SortField::Rating,
            "date" => SortField::Date,
            _ => return None,
        };
        let direction = match parts.next() {
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        Some(Self { field, direction })
    }
}

impl ListQuery {
    /// Build from raw query pairs. The first value of a repeated key wins,
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "director" => &mut query.director,
                "rating" => &mut query.rating,
                "tag" => &mut query.tag,
                "sort" => &mut query.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Filter (all conditions must hold) and optionally sort the collection
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let director = non_empty(&self.director).map(str::to_lowercase);
        let rating = non_empty(&self.rating).and_then(|r| r.trim().parse::<f64>().ok());
        let tag = non_empty(&self.tag).map(str::to_lowercase);

        let mut results: Vec<Review> = reviews
            .into_iter()
            .filter(|r| director.as_ref().is_none_or(|d| r.director.to_lowercase() == *d))
            .filter(|r| rating.is_none_or(|v| r.rating == v))
            .filter(|r| {
                tag.as_ref()
                    .is_none_or(|t| r.tags.iter().any(|x| x.to_lowercase() == *t))
            })
            .collect();

        if let Some(spec) = non_empty(&self.sort).and_then(SortSpec::parse) {
            sort_reviews(&mut results, spec);
        }

        results
    }
}

pub fn sort_reviews(reviews: &mut [Review], spec: SortSpec) {
    reviews.sort_by(|a, b| {
        let ord = match spec.field {
            SortField::Rating => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
            SortField::Date => created_at(a).cmp(&created_at(b)),
        };
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

// Unparseable timestamps order before every valid one.
fn created_at(review: &Review) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&review.created_at).ok()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
