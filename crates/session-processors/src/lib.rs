mod types;
pub use types::*;

mod traits;
pub use traits::*;

mod auth;
pub use auth::*;

mod filename;
pub use filename::*;

mod metadata;
pub use metadata::*;

mod download;
pub use download::*;

mod workflow;
pub use workflow::*;

mod session;
pub use session::*;

#[cfg(test)]
mod mocks;
