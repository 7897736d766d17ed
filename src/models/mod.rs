pub mod case;
pub mod enums;
pub mod officer;
pub mod snapshot;
pub mod sop;

pub use case::*;
pub use enums::*;
pub use officer::*;
pub use snapshot::*;
pub use sop::*;
