use axum::Json;

use crate::domains::users::models::User;
use crate::server::middleware::CurrentUser;

/// GET /users/me
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
