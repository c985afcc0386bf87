pub mod credential_store;
