pub mod attendance;
pub mod bonus;
pub mod employee;
pub mod office;
pub mod review;
pub mod salary;
