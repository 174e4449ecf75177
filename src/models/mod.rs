pub mod catalog;
pub mod donation;
pub mod item_request;
pub mod matching;
pub mod user;

pub use catalog::*;
pub use donation::*;
pub use item_request::*;
pub use matching::*;
pub use user::*;
