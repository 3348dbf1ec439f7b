pub mod search_error;
