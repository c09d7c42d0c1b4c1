pub mod address;
pub mod error;
pub mod executable_utils;
pub mod flow;
pub mod geocode;
pub mod location;
pub mod model;
pub mod payment;
pub mod resolver;
pub mod service;
pub mod storage;
