pub mod client;
pub mod config;
pub mod control;
pub mod errors;
pub mod handler;
pub mod notice;
pub mod page;
pub mod ui;

pub use client::{EnrollmentApi, HttpEnrollmentApi};
pub use control::{Action, Control, CourseId, EnrollmentState};
pub use errors::{ErrorKind, ToggleError};
pub use handler::{ActivationEvent, EnrollmentToggleHandler, Outcome};
pub use notice::{Notice, NoticeBoard};
pub use page::Page;
