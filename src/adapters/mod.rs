// Adapters layer: concrete implementations of the domain ports (storage backends, mail transport).

pub mod mail;
pub mod storage;
