//! Engagement wire types: view, like and rating calls.

use serde::{Deserialize, Serialize};

/// Response of `POST /catalog/:id/view`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    #[serde(rename = "viewCount")]
    pub view_count: u64,
}

/// Response of `POST|DELETE /catalog/:id/like`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    #[serde(rename = "likeCount")]
    pub like_count: u64,
}

/// Body of `POST /catalog/:id/rating`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub value: u8,
}

/// Response of `POST|DELETE /catalog/:id/rating`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    #[serde(rename = "avgRating")]
    pub avg_rating: f64,
    #[serde(rename = "myRating")]
    pub my_rating: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_response_wire_shape() {
        let resp: LikeResponse = serde_json::from_str(r#"{"liked":true,"likeCount":7}"#).unwrap();
        assert!(resp.liked);
        assert_eq!(resp.like_count, 7);
    }

    #[test]
    fn test_rating_response_wire_shape() {
        let resp: RatingResponse =
            serde_json::from_str(r#"{"avgRating":4.5,"myRating":null}"#).unwrap();
        assert_eq!(resp.avg_rating, 4.5);
        assert_eq!(resp.my_rating, None);
    }
}
