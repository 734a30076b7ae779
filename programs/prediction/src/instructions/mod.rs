pub mod admin;
pub mod bet;
pub mod claim;
pub mod lifecycle;
pub mod oracle;

pub use admin::*;
pub use bet::*;
pub use claim::*;
pub use lifecycle::*;
pub use oracle::*;
