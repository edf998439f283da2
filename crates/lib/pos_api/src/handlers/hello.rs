/// `GET /` liveness check.
pub async fn ready() -> &'static str {
    "POS API Ready"
}
