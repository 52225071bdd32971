//! HTTP client for view/like/rating telemetry.

use contracts::engagement::{LikeResponse, RatingRequest, RatingResponse, ViewResponse};
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use web_sys::RequestCredentials;

use crate::shared::api_utils::api_url;

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, String> {
    let response = request
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("request failed with status {}", response.status()));
    }
    response.json::<T>().await.map_err(|e| e.to_string())
}

pub async fn post_view(id: i64) -> Result<ViewResponse, String> {
    send_json(Request::post(&api_url(&format!("/catalog/{}/view", id)))).await
}

pub async fn post_like(id: i64) -> Result<LikeResponse, String> {
    send_json(Request::post(&api_url(&format!("/catalog/{}/like", id)))).await
}

pub async fn delete_like(id: i64) -> Result<LikeResponse, String> {
    send_json(Request::delete(&api_url(&format!("/catalog/{}/like", id)))).await
}

pub async fn post_rating(id: i64, value: u8) -> Result<RatingResponse, String> {
    let request = Request::post(&api_url(&format!("/catalog/{}/rating", id)))
        .credentials(RequestCredentials::Include)
        .json(&RatingRequest { value })
        .map_err(|e| e.to_string())?;
    let response = request.send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("request failed with status {}", response.status()));
    }
    response
        .json::<RatingResponse>()
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_rating(id: i64) -> Result<RatingResponse, String> {
    send_json(Request::delete(&api_url(&format!("/catalog/{}/rating", id)))).await
}

/// Server-known liked set, used for reconciliation on load.
pub async fn fetch_liked_ids() -> Result<Vec<i64>, String> {
    send_json(Request::get(&api_url("/catalog/likes"))).await
}
