pub mod memory_token_store;
