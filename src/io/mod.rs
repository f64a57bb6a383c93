pub mod config_io;
pub mod images;
pub mod remote;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod transfer;
