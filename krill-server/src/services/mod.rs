//! Service Module

pub mod notify;

pub use notify::{NotificationKind, NotificationService};
