pub mod device_filter;
pub mod office_cache;
