pub mod query_response;
