pub mod api_utils;
pub mod storage;
pub mod url_state;
