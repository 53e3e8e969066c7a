use crate::TrackerError;
use crate::handlers::emotion::{add_emotion, get_emotions};
use crate::router::{ModuleExports, RouterSpec};

pub fn emotion_router() -> RouterSpec {
    RouterSpec::new()
        .post("/add", "add_emotion", add_emotion)
        .get("/{user_id}", "get_emotions", get_emotions)
}

pub fn exports() -> Result<ModuleExports, TrackerError> {
    Ok(ModuleExports::new().export("emotion_router", emotion_router()))
}
