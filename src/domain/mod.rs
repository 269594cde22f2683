mod amount;
mod builder;
mod entry;
mod layout;
mod profile;
mod reference;

pub use amount::*;
pub use builder::*;
pub use entry::*;
pub use layout::*;
pub use profile::*;
pub use reference::*;
