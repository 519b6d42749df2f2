pub mod marketplacemodel;
pub mod notificationmodel;
pub mod supportmodel;
pub mod usermodel;
