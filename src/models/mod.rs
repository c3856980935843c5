pub mod feed;
pub mod observation;
pub mod summary;

pub use feed::*;
pub use observation::*;
pub use summary::*;
