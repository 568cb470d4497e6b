pub mod capture_controller;
pub mod capture_service;
pub mod dto;
