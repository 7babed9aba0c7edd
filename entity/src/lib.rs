//! Domain records shared by the pipeline core and the server.

pub mod deal;
pub mod rep;
pub mod stage;

pub use deal::{Deal, Status};
pub use rep::Rep;
pub use stage::Stage;
