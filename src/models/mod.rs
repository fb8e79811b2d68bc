pub mod patch;
pub mod session;
pub mod task;
pub mod user;

pub use patch::Patch;
pub use session::Session;
pub use task::{Task, TaskInput, TaskPatch};
pub use user::{LoginRequest, NewUser, RegisterRequest, User};
