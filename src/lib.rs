pub mod app;
pub mod async_task;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod main_lib;
pub mod path;
pub mod screenshot;
pub mod summary;
pub mod tree;
pub mod ui;

pub use dashboard::RepoDashboard;
pub use error::{DashboardError, Result};
pub use tree::{PathTree, TreeNode, TreeShapeError};
