pub mod backend;
pub mod fetch_worker;
