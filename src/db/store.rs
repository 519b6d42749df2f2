// db/store.rs
use super::{
    notificationdb::NotificationExt,
    servicerequestdb::ServiceRequestExt,
    supportdb::SupportExt,
    techniciandb::TechnicianExt,
};

/// Everything the dispute workflow reads or writes. Services hold an
/// `Arc<dyn MarketplaceStore>` so Postgres and the in-memory test store are
/// interchangeable.
pub trait MarketplaceStore:
    SupportExt + NotificationExt + TechnicianExt + ServiceRequestExt + std::fmt::Debug + Send + Sync
{
}

impl<T> MarketplaceStore for T where
    T: SupportExt + NotificationExt + TechnicianExt + ServiceRequestExt + std::fmt::Debug + Send + Sync
{
}
