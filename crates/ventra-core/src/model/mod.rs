mod email;
mod session;
mod startup;

pub use email::*;
pub use session::*;
pub use startup::*;
