//! Dashboard session: view state, the loaded dataset and the view models
//! produced from them.

pub mod controller;
pub mod state;
pub mod views;

pub use controller::Dashboard;
pub use state::{MessageKind, StatusMessage, View, ViewState};
pub use views::ViewModel;
