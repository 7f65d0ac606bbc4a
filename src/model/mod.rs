pub mod attendance;
pub mod employee;
pub mod office;
pub mod review;
pub mod role;
pub mod salary;
