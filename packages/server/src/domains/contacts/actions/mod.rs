mod sync_contacts;

pub use sync_contacts::{sync_contacts, SYNC_LIMIT};
