use crate::TrackerError;
use crate::handlers::user::{delete_user, get_user, register_user};
use crate::router::{ModuleExports, RouterSpec};

pub fn user_router() -> RouterSpec {
    RouterSpec::new()
        .post("/register", "register_user", register_user)
        .get("/{user_id}", "get_user", get_user)
        .delete("/{user_id}", "delete_user", delete_user)
}

pub fn exports() -> Result<ModuleExports, TrackerError> {
    Ok(ModuleExports::new().export("user_router", user_router()))
}
