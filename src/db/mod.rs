pub mod db;
pub mod notificationdb;
pub mod servicerequestdb;
pub mod store;
pub mod supportdb;
pub mod techniciandb;

#[cfg(test)]
pub mod memorydb;
