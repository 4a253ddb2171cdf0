pub mod actions;
pub mod details;
pub mod dispatch;
mod inflight;
pub mod session;
pub mod state;
pub mod stars;
pub mod update;

pub use details::DetailsController;
pub use dispatch::{Dispatcher, Inline, MainLoop};
pub use session::DetailsSessions;
pub use stars::{StarsController, StarsQuery};
pub use state::{DetailsView, LoadState, StarsView};
