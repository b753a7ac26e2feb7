pub mod add_service;
pub mod form;
pub mod home;
pub mod load;
pub mod login;
pub mod my_bookings;
pub mod my_services;
pub mod profile;
pub mod register;
pub mod service_detail;
pub mod services;
