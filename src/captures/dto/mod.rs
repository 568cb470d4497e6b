pub mod capture_init_response;
