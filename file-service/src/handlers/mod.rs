pub mod file_delete;
pub mod file_download;
pub mod file_upload;
pub mod health;
pub mod shutdown;
