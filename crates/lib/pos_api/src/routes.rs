//! Route paths.

pub const GET_ROOT: &str = "/";
pub const POST_LOGIN: &str = "/api/v1/login";
pub const GET_ITEMS: &str = "/api/v1/items";
pub const GET_ITEMS_ID: &str = "/api/v1/items/{id}";
pub const POST_USER: &str = "/api/v1/user";
