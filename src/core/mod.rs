pub mod ingest;
pub mod keys;
pub mod read;
pub mod render;

pub use crate::domain::model::{MailMessage, Record};
pub use crate::domain::ports::{Mailer, RecordStore, RecordStream};
pub use crate::utils::error::Result;
