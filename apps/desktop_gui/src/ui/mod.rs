//! UI layer for the desktop GUI: the two-column price window and its alert dialog.

pub mod app;

pub use app::{DialogAlert, PriceClientApp};
