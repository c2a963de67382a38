pub mod fs_atomic;
pub mod logging;
pub mod slug;
